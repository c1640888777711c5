//! 奖励积分流水仓储
//!
//! 流水只追加不修改，余额由带符号的积分变动折叠得出

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};

use super::traits::LedgerRepositoryTrait;
use crate::error::Result;
use crate::models::{BonusLedgerEntry, NewLedgerEntry};

/// 奖励积分流水仓储
///
/// 发放与追回都是新增行，已写入的行不会被修改或删除
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 写入一条流水，返回插入行的 ID
    pub async fn create(&self, entry: &NewLedgerEntry) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO bonus_point_ledger (user_id, redeem_points, redeem_point_status, description)
            VALUES ($1, $2, 0, $3)
            RETURNING id
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.redeem_points)
        .bind(&entry.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// 在事务中创建流水条目
    pub async fn create_in_tx(tx: &mut PgConnection, entry: &NewLedgerEntry) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO bonus_point_ledger (user_id, redeem_points, redeem_point_status, description)
            VALUES ($1, $2, 0, $3)
            RETURNING id
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.redeem_points)
        .bind(&entry.description)
        .fetch_one(tx)
        .await?;

        Ok(row.get("id"))
    }

    /// 列出用户的流水条目
    ///
    /// 按时间倒序排列，最新的在前
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<BonusLedgerEntry>> {
        let entries = sqlx::query_as::<_, BonusLedgerEntry>(
            r#"
            SELECT id, user_id, redeem_points, redeem_point_status, description, created_at
            FROM bonus_point_ledger
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// 获取用户的流水余额
    ///
    /// 对带符号的积分变动求和，如无记录返回 0
    pub async fn get_balance(&self, user_id: i64) -> Result<i64> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(redeem_points), 0)::BIGINT AS balance
            FROM bonus_point_ledger
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("balance"))
    }

    /// 在事务中查找用户未兑换的发放条目
    ///
    /// 追回前必须确认存在未兑换的同额发放，已追回或已兑换的不再追回
    pub async fn find_unredeemed_grant_in_tx(
        tx: &mut PgConnection,
        user_id: i64,
        points: i32,
    ) -> Result<Option<BonusLedgerEntry>> {
        let entry = sqlx::query_as::<_, BonusLedgerEntry>(
            r#"
            SELECT id, user_id, redeem_points, redeem_point_status, description, created_at
            FROM bonus_point_ledger
            WHERE user_id = $1 AND redeem_points = $2 AND redeem_point_status = 0
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(points)
        .fetch_optional(tx)
        .await?;

        Ok(entry)
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn create(&self, entry: &NewLedgerEntry) -> Result<i64> {
        self.create(entry).await
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<BonusLedgerEntry>> {
        self.list_by_user(user_id).await
    }

    async fn get_balance(&self, user_id: i64) -> Result<i64> {
        self.get_balance(user_id).await
    }
}
