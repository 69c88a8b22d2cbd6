//! 内存存储，测试和未配置数据库时使用

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::store::{ProductStore, StoreError};
use crate::app::product::model::{NewProduct, Product};

#[derive(Default)]
struct Inner {
    connected: bool,
    products: Vec<Product>,
    index: HashMap<Uuid, usize>,
}

/// 基于内存的产品存储
///
/// 断开连接不会清空数据，重新连接后仍可读到之前写入的产品。
#[derive(Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn connect(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.connected {
            inner.connected = true;
            info!("内存存储已连接，当前产品数: {}", inner.products.len());
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.connected {
            inner.connected = false;
            info!("内存存储已断开");
        }
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.inner.read().await.connected
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.connected {
            return Err(StoreError::Disconnected);
        }

        let mut id = Uuid::new_v4();
        while inner.index.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let product = product.into_product(id);
        let position = inner.products.len();
        inner.products.push(product.clone());
        inner.index.insert(id, position);

        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.read().await;
        if !inner.connected {
            return Err(StoreError::Disconnected);
        }
        Ok(inner.products.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.read().await;
        if !inner.connected {
            return Err(StoreError::Disconnected);
        }
        Ok(inner
            .index
            .get(&id)
            .and_then(|&position| inner.products.get(position))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn new_product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: format!("Description of {}", name),
            price,
        }
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let store = MemoryProductStore::new();
        assert!(!store.is_connected().await);

        assert!(matches!(
            store.insert(new_product("a", 1.0)).await,
            Err(StoreError::Disconnected)
        ));
        assert!(matches!(store.list().await, Err(StoreError::Disconnected)));
        assert!(matches!(
            store.find(Uuid::new_v4()).await,
            Err(StoreError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn test_insert_list_find() {
        let store = MemoryProductStore::new();
        store.connect().await.unwrap();

        let first = store.insert(new_product("Product 1", 10.0)).await.unwrap();
        let second = store.insert(new_product("Product 2", 20.5)).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all, vec![first.clone(), second.clone()]);

        assert_eq!(store.find(second.id).await.unwrap(), Some(second));
        assert_eq!(store.find(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_data_survives_reconnect() {
        let store = MemoryProductStore::new();
        store.connect().await.unwrap();
        let product = store.insert(new_product("kept", 3.0)).await.unwrap();

        store.disconnect().await.unwrap();
        assert!(!store.is_connected().await);
        store.connect().await.unwrap();

        assert_eq!(store.find(product.id).await.unwrap(), Some(product));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_unique_ids() {
        let store = Arc::new(MemoryProductStore::new());
        store.connect().await.unwrap();

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert(new_product(&format!("p{}", i), i as f64))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().id);
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(store.list().await.unwrap().len(), 64);
    }
}
