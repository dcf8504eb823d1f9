//! 内存存储，用于本地运行和测试

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::app::product::{
    model::{Product, ProductFields},
    repository::{ProductRepository, RepositoryError},
};

#[derive(Default)]
struct Store {
    next_id: i64,
    products: BTreeMap<i64, Product>,
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    store: RwLock<Store>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.products.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn create(&self, fields: &ProductFields) -> Result<Product, RepositoryError> {
        let mut store = self.store.write().await;
        store.next_id += 1;

        let now = Utc::now();
        let product = Product {
            id: store.next_id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            price: fields.price.clone(),
            created_at: now,
            updated_at: now,
        };
        store.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, fields: &ProductFields) -> Result<Product, RepositoryError> {
        let mut store = self.store.write().await;
        let product = store
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        product.apply(fields);
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        store
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
