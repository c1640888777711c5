//! 状态与角色枚举
//!
//! 数据库和 JSON 用同一拼写：订单状态为 SCREAMING 形式，
//! 角色与积分流水枚举为小写

use serde::{Deserialize, Serialize};

/// 订单状态
///
/// 订单生命周期状态机，DELIVERED 和 CANCELLED 为终态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// 待确认 - 下单后的初始状态
    #[default]
    Pending,
    /// 已确认 - 管理员确认，等待发货
    Confirm,
    /// 已送达 - 履约完成（终态）
    Delivered,
    /// 已取消 - 用户或管理员取消（终态）
    Cancelled,
}

impl OrderStatus {
    /// 判断是否为终态
    ///
    /// 终态订单不允许任何后续状态流转
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// 判断能否流转到目标状态
    ///
    /// PENDING → CONFIRM / DELIVERED / CANCELLED
    /// CONFIRM → DELIVERED / CANCELLED
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match self {
            Self::Pending => matches!(
                next,
                Self::Confirm | Self::Delivered | Self::Cancelled
            ),
            Self::Confirm => matches!(next, Self::Delivered | Self::Cancelled),
            Self::Delivered | Self::Cancelled => false,
        }
    }

    /// 返回数据库存储形式的状态名
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirm => "CONFIRM",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// 用户角色
///
/// 区分管理员和普通用户，管理端接口仅对 admin 开放
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum UserRole {
    /// 管理员
    Admin,
    /// 普通用户
    #[default]
    Normal,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// 返回数据库存储形式的角色名
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Normal => "normal",
        }
    }
}

/// 积分明细条目类型
///
/// 积分汇总视图中的条目分类：gain 表示获得，redeem 表示已兑换/扣减
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointEntryType {
    /// 获得积分
    Gain,
    /// 兑换或扣减积分
    Redeem,
}

/// 积分明细条目状态
///
/// 订单来源的条目按订单是否取消区分展示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointEntryStatus {
    /// 正常完成
    Completed,
    /// 已取消
    Cancelled,
}
