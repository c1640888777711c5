//! 服务层出入参
//!
//! 与领域模型分开定义，API 层拼装这些结构而不触碰模型内部

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{OrderStatus, PointEntryStatus, PointEntryType};

/// 订单行
///
/// 一次下单请求中的单个产品行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i32,
}

/// 下单请求
///
/// `user_id` 来自认证后的调用方身份，不从请求体反序列化
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: i64,
    pub dealer_id: i64,
    pub lines: Vec<OrderLine>,
}

impl PlaceOrderRequest {
    pub fn new(user_id: i64, dealer_id: i64, lines: Vec<OrderLine>) -> Self {
        Self {
            user_id,
            dealer_id,
            lines,
        }
    }
}

/// 已创建订单 DTO
///
/// 下单响应中的单行订单，产品与经销商展示字段在下单时已解析完成
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrderDto {
    pub id: i64,
    pub batch_id: Uuid,
    pub product_id: i64,
    pub product_name: String,
    pub product_code: String,
    pub product_type: String,
    pub dealer_name: String,
    pub quantity: i32,
    pub redeem_points: i32,
    pub order_status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

/// 下单响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub batch_id: Uuid,
    /// 本次下单是否触发首单奖励
    pub bonus_granted: bool,
    pub orders: Vec<PlacedOrderDto>,
}

/// 取消订单请求
///
/// 管理员可取消任意订单，普通用户仅能取消本人订单
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_id: i64,
    /// 发起人用户 ID
    pub actor_id: i64,
    /// 发起人是否为管理员
    pub admin: bool,
    pub reason: String,
}

impl CancelOrderRequest {
    /// 用户取消本人订单
    pub fn by_user(order_id: i64, user_id: i64, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            actor_id: user_id,
            admin: false,
            reason: reason.into(),
        }
    }

    /// 管理员取消订单
    pub fn by_admin(order_id: i64, admin_id: i64, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            actor_id: admin_id,
            admin: true,
            reason: reason.into(),
        }
    }
}

/// 积分明细条目 DTO
///
/// 积分汇总接口的统一条目，订单积分与奖励流水合并后返回
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointEntryDto {
    /// 积分变动值，负数表示扣减
    pub points: i32,
    #[serde(rename = "type")]
    pub entry_type: PointEntryType,
    /// 变动绝对值
    pub redemption_amount: i32,
    pub description: String,
    pub status: PointEntryStatus,
}

/// 订单历史条目 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryEntryDto {
    pub id: i64,
    /// 下单日期，格式 YYYY-MM-DD
    pub order_placed_date: String,
    /// 物料类别（产品类型）
    pub material_name: String,
    pub product_name: String,
    pub product_code: String,
    pub dealer_name: String,
    pub quantity: i32,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_line_deserialization() {
        let line: OrderLine = serde_json::from_str(r#"{"productId": 101, "quantity": 60}"#).unwrap();
        assert_eq!(line.product_id, 101);
        assert_eq!(line.quantity, 60);
    }

    #[test]
    fn test_cancel_request_by_user() {
        let request = CancelOrderRequest::by_user(5, 42, "wrong item");
        assert_eq!(request.order_id, 5);
        assert_eq!(request.actor_id, 42);
        assert!(!request.admin);
        assert_eq!(request.reason, "wrong item");
    }

    #[test]
    fn test_cancel_request_by_admin() {
        let request = CancelOrderRequest::by_admin(5, 1, "stock issue");
        assert!(request.admin);
        assert_eq!(request.actor_id, 1);
    }

    #[test]
    fn test_point_entry_dto_serialization() {
        let dto = PointEntryDto {
            points: -2100,
            entry_type: PointEntryType::Redeem,
            redemption_amount: 2100,
            description: "First order bonus reversal on cancellation".to_string(),
            status: PointEntryStatus::Completed,
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["points"], -2100);
        // entry_type 序列化为 type 字段
        assert_eq!(json["type"], "redeem");
        assert_eq!(json["redemptionAmount"], 2100);
        assert_eq!(json["status"], "completed");
    }

    #[test]
    fn test_order_history_entry_serialization() {
        let dto = OrderHistoryEntryDto {
            id: 7,
            order_placed_date: "2025-06-10".to_string(),
            material_name: "Cement".to_string(),
            product_name: "UltraGrip 50kg".to_string(),
            product_code: "UG-50".to_string(),
            dealer_name: "Acme Traders".to_string(),
            quantity: 60,
            status: OrderStatus::Pending,
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["orderPlacedDate"], "2025-06-10");
        assert_eq!(json["materialName"], "Cement");
        assert_eq!(json["status"], "PENDING");
    }

    #[test]
    fn test_place_order_response_serialization() {
        let batch_id = Uuid::new_v4();
        let response = PlaceOrderResponse {
            batch_id,
            bonus_granted: true,
            orders: vec![],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["batchId"], batch_id.to_string());
        assert_eq!(json["bonusGranted"], true);
        assert!(json["orders"].is_array());
    }
}
