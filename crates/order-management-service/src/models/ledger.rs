//! 奖励积分流水实体定义
//!
//! 流水只追加不修改，余额由带符号的 redeem_points 折叠（SUM）得出

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 奖励积分流水条目
///
/// redeem_points 带符号：正数为发放，负数为追回。
/// 任何冲正都是新的负数行，已写入的行不会被修改或删除。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BonusLedgerEntry {
    pub id: i64,
    /// 用户 ID
    pub user_id: i64,
    /// 积分变动（带符号）
    pub redeem_points: i32,
    /// 兑换标记（0 = 未兑换，1 = 已兑换）
    pub redeem_point_status: i16,
    /// 变动说明，区分发放与追回
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl BonusLedgerEntry {
    /// 检查是否为发放条目
    pub fn is_grant(&self) -> bool {
        self.redeem_points > 0
    }

    /// 检查积分是否已兑换
    pub fn is_redeemed(&self) -> bool {
        self.redeem_point_status == 1
    }
}

/// 新建流水条目载荷
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub user_id: i64,
    pub redeem_points: i32,
    pub description: String,
}

impl NewLedgerEntry {
    /// 创建发放条目
    pub fn grant(user_id: i64, points: i32, description: impl Into<String>) -> Self {
        Self {
            user_id,
            redeem_points: points,
            description: description.into(),
        }
    }

    /// 创建追回条目（取相反数）
    pub fn retraction(user_id: i64, points: i32, description: impl Into<String>) -> Self {
        Self {
            user_id,
            redeem_points: -points,
            description: description.into(),
        }
    }
}
