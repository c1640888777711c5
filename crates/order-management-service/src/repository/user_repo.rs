//! 用户仓储
//!
//! 用户账号与银行账户的数据访问

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::traits::UserRepositoryTrait;
use crate::error::Result;
use crate::models::{User, UserBankDetail, UserRole};

/// 用户仓储
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 用户 ====================

    /// 根据 ID 获取用户
    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, user_role, mobile_no,
                   firm_name, office_address, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// 根据邮箱获取用户
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, user_role, mobile_no,
                   firm_name, office_address, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// 创建用户
    ///
    /// 新用户默认为 normal 角色，返回完整的用户记录
    pub async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, user_role)
            VALUES ($1, $2, $3, 'normal')
            RETURNING id, name, email, password, user_role, mobile_no,
                      firm_name, office_address, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// 更新用户资料
    pub async fn update_profile(
        &self,
        id: i64,
        name: &str,
        mobile_no: Option<&str>,
        firm_name: Option<&str>,
        office_address: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, mobile_no = $3, firm_name = $4, office_address = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(mobile_no)
        .bind(firm_name)
        .bind(office_address)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 更新用户密码
    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 按角色统计用户数
    pub async fn count_by_role(&self, role: UserRole) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE user_role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    // ==================== 银行账户 ====================

    /// 获取用户的银行账户
    pub async fn get_bank_detail(&self, user_id: i64) -> Result<Option<UserBankDetail>> {
        let detail = sqlx::query_as::<_, UserBankDetail>(
            r#"
            SELECT id, user_id, account_no, ifsc_code, bank_name, created_at, updated_at
            FROM user_bank_details
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    /// 创建用户的银行账户
    pub async fn create_bank_detail(
        &self,
        user_id: i64,
        account_no: &str,
        ifsc_code: &str,
        bank_name: &str,
    ) -> Result<UserBankDetail> {
        let detail = sqlx::query_as::<_, UserBankDetail>(
            r#"
            INSERT INTO user_bank_details (user_id, account_no, ifsc_code, bank_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, account_no, ifsc_code, bank_name, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(account_no)
        .bind(ifsc_code)
        .bind(bank_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(detail)
    }

    /// 更新用户的银行账户
    ///
    /// 不存在时返回 None，由调用方决定返回 404 还是先创建
    pub async fn update_bank_detail(
        &self,
        user_id: i64,
        account_no: &str,
        ifsc_code: &str,
        bank_name: &str,
    ) -> Result<Option<UserBankDetail>> {
        let detail = sqlx::query_as::<_, UserBankDetail>(
            r#"
            UPDATE user_bank_details
            SET account_no = $2, ifsc_code = $3, bank_name = $4, updated_at = NOW()
            WHERE user_id = $1
            RETURNING id, user_id, account_no, ifsc_code, bank_name, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(account_no)
        .bind(ifsc_code)
        .bind(bank_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.get_user(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email(email).await
    }

    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        self.create_user(name, email, password_hash).await
    }

    async fn update_profile<'a>(
        &self,
        id: i64,
        name: &str,
        mobile_no: Option<&'a str>,
        firm_name: Option<&'a str>,
        office_address: Option<&'a str>,
    ) -> Result<()> {
        self.update_profile(id, name, mobile_no, firm_name, office_address)
            .await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        self.update_password(id, password_hash).await
    }

    async fn count_by_role(&self, role: UserRole) -> Result<i64> {
        self.count_by_role(role).await
    }

    async fn get_bank_detail(&self, user_id: i64) -> Result<Option<UserBankDetail>> {
        self.get_bank_detail(user_id).await
    }

    async fn create_bank_detail(
        &self,
        user_id: i64,
        account_no: &str,
        ifsc_code: &str,
        bank_name: &str,
    ) -> Result<UserBankDetail> {
        self.create_bank_detail(user_id, account_no, ifsc_code, bank_name)
            .await
    }

    async fn update_bank_detail(
        &self,
        user_id: i64,
        account_no: &str,
        ifsc_code: &str,
        bank_name: &str,
    ) -> Result<Option<UserBankDetail>> {
        self.update_bank_detail(user_id, account_no, ifsc_code, bank_name)
            .await
    }
}
