//! 公司信息仓储
//!
//! 管理端维护的公司展示信息，全系统只保留一条记录

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::CompanyRepositoryTrait;
use crate::error::Result;
use crate::models::AdminCompanyDetail;

/// 公司信息仓储
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取公司信息
    pub async fn get_company_detail(&self) -> Result<Option<AdminCompanyDetail>> {
        let detail = sqlx::query_as::<_, AdminCompanyDetail>(
            r#"
            SELECT id, company_name, address, phone, email, created_at, updated_at
            FROM admin_company_details
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    /// 写入公司信息
    ///
    /// 已有记录时覆盖更新，否则新建
    pub async fn upsert_company_detail(
        &self,
        company_name: &str,
        address: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<AdminCompanyDetail> {
        if let Some(existing) = self.get_company_detail().await? {
            let detail = sqlx::query_as::<_, AdminCompanyDetail>(
                r#"
                UPDATE admin_company_details
                SET company_name = $2, address = $3, phone = $4, email = $5,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING id, company_name, address, phone, email, created_at, updated_at
                "#,
            )
            .bind(existing.id)
            .bind(company_name)
            .bind(address)
            .bind(phone)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

            Ok(detail)
        } else {
            let detail = sqlx::query_as::<_, AdminCompanyDetail>(
                r#"
                INSERT INTO admin_company_details (company_name, address, phone, email)
                VALUES ($1, $2, $3, $4)
                RETURNING id, company_name, address, phone, email, created_at, updated_at
                "#,
            )
            .bind(company_name)
            .bind(address)
            .bind(phone)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

            Ok(detail)
        }
    }
}

#[async_trait]
impl CompanyRepositoryTrait for CompanyRepository {
    async fn get_company_detail(&self) -> Result<Option<AdminCompanyDetail>> {
        self.get_company_detail().await
    }

    async fn upsert_company_detail<'a>(
        &self,
        company_name: &str,
        address: Option<&'a str>,
        phone: Option<&'a str>,
        email: Option<&'a str>,
    ) -> Result<AdminCompanyDetail> {
        self.upsert_company_detail(company_name, address, phone, email)
            .await
    }
}
