//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// 创建产品请求
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "产品名称不能为空"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0.0, message = "产品价格不能为负数"))]
    pub price: f64,
}

/// 校验通过、等待写入存储的产品
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl CreateProductRequest {
    /// 校验请求并转换为 [`NewProduct`]，字段原样保留
    pub fn into_new_product(self) -> Result<NewProduct, CoreError> {
        self.validate()?;

        if self.name.trim().is_empty() {
            return Err(CoreError::BadRequest("产品名称不能为空".to_string()));
        }
        if !self.price.is_finite() {
            return Err(CoreError::BadRequest("产品价格必须是有限数值".to_string()));
        }

        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
        })
    }
}

impl NewProduct {
    /// 分配标识与创建时间
    pub fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            created_at: Utc::now(),
        }
    }
}
