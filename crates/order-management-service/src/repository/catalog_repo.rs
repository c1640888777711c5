//! 目录仓储
//!
//! 产品与经销商的只读数据访问，订单核心用于下单校验与展示

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::traits::CatalogRepositoryTrait;
use crate::error::Result;
use crate::models::{Dealer, Product};

/// 目录仓储
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 产品 ====================

    /// 根据 ID 获取产品
    pub async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, product_type, point, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// 批量获取产品
    pub async fn get_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, product_type, point, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// 列出全部产品
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, product_type, point, created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// 按产品类型列出产品
    pub async fn list_products_by_type(&self, product_type: &str) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, product_type, point, created_at, updated_at
            FROM products
            WHERE product_type = $1
            ORDER BY id
            "#,
        )
        .bind(product_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    // ==================== 经销商 ====================

    /// 根据 ID 获取经销商
    pub async fn get_dealer(&self, id: i64) -> Result<Option<Dealer>> {
        let dealer = sqlx::query_as::<_, Dealer>(
            r#"
            SELECT id, name, mobile, created_at, updated_at
            FROM dealers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dealer)
    }

    /// 列出全部经销商
    pub async fn list_dealers(&self) -> Result<Vec<Dealer>> {
        let dealers = sqlx::query_as::<_, Dealer>(
            r#"
            SELECT id, name, mobile, created_at, updated_at
            FROM dealers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(dealers)
    }

    /// 统计经销商数量
    pub async fn count_dealers(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM dealers")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }
}

#[async_trait]
impl CatalogRepositoryTrait for CatalogRepository {
    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        self.get_product(id).await
    }

    async fn get_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
        self.get_products_by_ids(ids).await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.list_products().await
    }

    async fn list_products_by_type(&self, product_type: &str) -> Result<Vec<Product>> {
        self.list_products_by_type(product_type).await
    }

    async fn get_dealer(&self, id: i64) -> Result<Option<Dealer>> {
        self.get_dealer(id).await
    }

    async fn list_dealers(&self) -> Result<Vec<Dealer>> {
        self.list_dealers().await
    }

    async fn count_dealers(&self) -> Result<i64> {
        self.count_dealers().await
    }
}
