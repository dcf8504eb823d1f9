//! 数据库基础设施

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::app::product::{
    model::{Product, ProductFields},
    repository::{ProductRepository, RepositoryError},
};
use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 创建产品表和 updated_at 触发器
    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        info!("创建数据库表...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(80) NOT NULL,
                description VARCHAR(150) NOT NULL,
                price NUMERIC NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE OR REPLACE FUNCTION update_updated_at_column()
            RETURNS TRIGGER AS $$
            BEGIN
                NEW.updated_at = NOW();
                RETURN NEW;
            END;
            $$ language 'plpgsql'
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("DROP TRIGGER IF EXISTS update_products_updated_at ON products")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TRIGGER update_products_updated_at
                BEFORE UPDATE ON products
                FOR EACH ROW
                EXECUTE FUNCTION update_updated_at_column()
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("数据库表创建完成");
        Ok(())
    }
}

const COLUMNS: &str = "id, name, description, price, created_at, updated_at";

/// 基于 PostgreSQL 的产品存储
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products =
            sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products ORDER BY id", COLUMNS))
                .fetch_all(&self.pool)
                .await?;
        Ok(products)
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        let product =
            sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE id = $1", COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(product)
    }

    async fn create(&self, fields: &ProductFields) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, description, price) VALUES ($1, $2, $3) RETURNING {}",
            COLUMNS
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    async fn update(&self, id: i64, fields: &ProductFields) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET name = $1, description = $2, price = $3 WHERE id = $4 RETURNING {}",
            COLUMNS
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
