//! 基础设施：存储实现与日志

#[cfg(feature = "database")]
pub mod database;
pub mod logger;
pub mod memory;
pub mod store;

use std::sync::Arc;
use tracing::warn;

use crate::config::DatabaseConfig;
use memory::MemoryProductStore;
use store::ProductStore;

/// 按配置选择存储实现：配置了数据库连接串时使用 PostgreSQL，否则使用内存存储
pub fn store_from_config(config: &DatabaseConfig) -> Arc<dyn ProductStore> {
    match config.url.as_deref() {
        #[cfg(feature = "database")]
        Some(url) => Arc::new(database::PgProductStore::new(config.clone(), url)),
        #[cfg(not(feature = "database"))]
        Some(_) => {
            warn!("未启用 database 特性，忽略 DATABASE_URL，使用内存存储");
            Arc::new(MemoryProductStore::new())
        }
        None => {
            warn!("未配置 DATABASE_URL，使用内存存储");
            Arc::new(MemoryProductStore::new())
        }
    }
}
