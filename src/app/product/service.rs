//! 产品业务服务

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::model::{CreateProductRequest, Product};
use crate::core::error::CoreError;
use crate::infrastructure::store::ProductStore;

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product, CoreError> {
        let new_product = request.into_new_product()?;
        let product = self.store.insert(new_product).await?;
        info!("产品已创建: {} ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.store.list().await?)
    }

    /// 按标识查询产品，格式不合法的标识同样视为不存在
    pub async fn get_product(&self, id: &str) -> Result<Product, CoreError> {
        let not_found = || CoreError::NotFound(format!("产品 {} 不存在", id));

        let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;
        self.store.find(uuid).await?.ok_or_else(not_found)
    }
}
