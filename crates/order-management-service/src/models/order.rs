//! 订单相关实体定义
//!
//! 包含订单行、新建订单载荷和连表详情视图

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::OrderStatus;

/// 订单行
///
/// 一次下单请求按产品行拆分为多条订单，同批订单共享 batch_id 和 order_date
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    /// 下单用户 ID
    pub user_id: i64,
    /// 产品 ID
    pub product_id: i64,
    /// 经销商 ID
    pub dealer_id: i64,
    /// 同一下单请求的批次标识
    pub batch_id: Uuid,
    /// 订购数量
    pub quantity: i32,
    /// 本行可兑换积分（取消后清零）
    pub redeem_points: i32,
    /// 订单状态
    pub order_status: OrderStatus,
    /// 管理员确认标记（0/1）
    pub admin_confirm: i16,
    /// 积分兑换标记（0 = 未兑换，1 = 已兑换）
    pub redeem_point_status: i16,
    /// 业务下单时间，同批订单相同
    pub order_date: DateTime<Utc>,
    /// 取消原因（仅取消后有值）
    #[sqlx(default)]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 检查是否已取消
    pub fn is_cancelled(&self) -> bool {
        self.order_status == OrderStatus::Cancelled
    }

    /// 检查管理员是否已确认
    pub fn is_confirmed(&self) -> bool {
        self.admin_confirm == 1
    }

    /// 检查积分是否已兑换
    pub fn is_redeemed(&self) -> bool {
        self.redeem_point_status == 1
    }

    /// 检查两条订单是否属于同一下单批次
    pub fn in_same_batch(&self, other: &Order) -> bool {
        self.user_id == other.user_id && self.batch_id == other.batch_id
    }
}

/// 新建订单载荷
///
/// 下单服务按产品行构造，插入后由数据库生成 id 和时间戳
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub product_id: i64,
    pub dealer_id: i64,
    pub batch_id: Uuid,
    pub quantity: i32,
    pub redeem_points: i32,
    pub order_date: DateTime<Utc>,
}

/// 订单详情视图（连表查询投影）
///
/// 在订单行基础上补充用户、产品、经销商的展示字段，非数据库实体
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: i64,
    pub user_id: i64,
    /// 下单用户姓名
    pub user_name: String,
    /// 下单用户邮箱
    pub user_email: String,
    pub product_id: i64,
    /// 产品名称
    pub product_name: String,
    /// 产品编码
    pub product_code: String,
    /// 产品类型（物料类别）
    pub product_type: String,
    pub dealer_id: i64,
    /// 经销商名称
    pub dealer_name: String,
    /// 经销商联系电话
    pub dealer_mobile: Option<String>,
    pub batch_id: Uuid,
    pub quantity: i32,
    pub redeem_points: i32,
    pub order_status: OrderStatus,
    pub admin_confirm: i16,
    pub redeem_point_status: i16,
    pub order_date: DateTime<Utc>,
    #[sqlx(default)]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
