//! 产品存储抽象

use async_trait::async_trait;
use uuid::Uuid;

use crate::app::product::model::{NewProduct, Product};

/// 存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("存储未连接")]
    Disconnected,
    #[cfg(feature = "database")]
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("存储错误: {0}")]
    Backend(String),
}

/// 产品存储
///
/// 连接建立之前，任何数据操作都返回 [`StoreError::Disconnected`]。
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 建立连接，重复调用无副作用
    async fn connect(&self) -> Result<(), StoreError>;

    /// 断开连接，未连接时无副作用
    async fn disconnect(&self) -> Result<(), StoreError>;

    async fn is_connected(&self) -> bool;

    /// 分配唯一标识并保存产品
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// 按写入顺序返回全部产品
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
}
