//! C端/管理端响应 DTO 定义
//!
//! 所有 REST API 的响应体结构，字段统一 camelCase。
//! 历史客户端依赖的展示字段名（fullName、materialName 等）在此处固定。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use order_management::{AdminCompanyDetail, Dealer, OrderDetail, Product, User, UserBankDetail};
use serde::{Deserialize, Serialize};

/// 订单时间展示格式，沿用既有客户端约定
const ORDER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// API 统一响应信封
///
/// `status` 与 HTTP 状态行一致；`data` 为空时不序列化该字段
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 200 成功响应
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 200,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 201 创建成功响应
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 201,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// 200 成功响应（无数据）
    pub fn message(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            status: 200,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

// ============================================
// 目录 DTO
// ============================================

/// 产品响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub product_type: String,
    pub point: i32,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            code: product.code,
            product_type: product.product_type,
            point: product.point,
        }
    }
}

/// 产品下拉选项 DTO
///
/// name 为展示标签："名称 - 编码 - 积分"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionDto {
    pub id: i64,
    pub name: String,
}

impl From<Product> for ProductOptionDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.display_label(),
        }
    }
}

/// 经销商响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerDto {
    pub id: i64,
    pub name: String,
    pub mobile: Option<String>,
}

impl From<Dealer> for DealerDto {
    fn from(dealer: Dealer) -> Self {
        Self {
            id: dealer.id,
            name: dealer.name,
            mobile: dealer.mobile,
        }
    }
}

// ============================================
// 个人资料 DTO
// ============================================

/// 用户资料响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub mobile_number: Option<String>,
    pub firm_name: Option<String>,
    pub office_address: Option<String>,
    pub user_role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.name,
            email: user.email,
            mobile_number: user.mobile_no,
            firm_name: user.firm_name,
            office_address: user.office_address,
            user_role: user.user_role.as_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 银行账户响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetailDto {
    pub id: i64,
    pub user_id: i64,
    pub account_no: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserBankDetail> for BankDetailDto {
    fn from(detail: UserBankDetail) -> Self {
        Self {
            id: detail.id,
            user_id: detail.user_id,
            account_no: detail.account_no,
            ifsc_code: detail.ifsc_code,
            bank_name: detail.bank_name,
            created_at: detail.created_at,
            updated_at: detail.updated_at,
        }
    }
}

/// 公司信息响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailDto {
    pub id: i64,
    pub company_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdminCompanyDetail> for CompanyDetailDto {
    fn from(detail: AdminCompanyDetail) -> Self {
        Self {
            id: detail.id,
            company_name: detail.company_name,
            address: detail.address,
            phone: detail.phone,
            email: detail.email,
            updated_at: detail.updated_at,
        }
    }
}

// ============================================
// 管理端订单 DTO
// ============================================

/// 管理端仪表盘统计
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub total_orders: i64,
    pub total_pending_orders: i64,
    pub total_architects: i64,
    pub total_dealers: i64,
}

/// 管理端订单列表行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderDto {
    pub id: i64,
    pub architect_name: String,
    pub architect_email: String,
    pub product_name: String,
    pub product_code: String,
    pub product_type: String,
    pub dealer_name: String,
    pub dealer_mobile: Option<String>,
    pub quantity: i32,
    pub redeem_points: i32,
    pub order_status: String,
    pub admin_confirm: i16,
    pub redeem_point_status: i16,
    pub order_date: String,
    pub created_at: String,
}

impl From<&OrderDetail> for AdminOrderDto {
    fn from(detail: &OrderDetail) -> Self {
        Self {
            id: detail.id,
            architect_name: detail.user_name.clone(),
            architect_email: detail.user_email.clone(),
            product_name: detail.product_name.clone(),
            product_code: detail.product_code.clone(),
            product_type: detail.product_type.clone(),
            dealer_name: detail.dealer_name.clone(),
            dealer_mobile: detail.dealer_mobile.clone(),
            quantity: detail.quantity,
            redeem_points: detail.redeem_points,
            order_status: detail.order_status.as_str().to_string(),
            admin_confirm: detail.admin_confirm,
            redeem_point_status: detail.redeem_point_status,
            order_date: detail.order_date.format(ORDER_DATETIME_FORMAT).to_string(),
            created_at: detail.created_at.format(ORDER_DATETIME_FORMAT).to_string(),
        }
    }
}

/// 管理端订单列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderListDto {
    pub orders: Vec<AdminOrderDto>,
    pub total_count: i64,
}

/// 管理端生命周期操作结果
///
/// 确认/发货/取消共用一个结构，按动作填充对应的时间与操作人字段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderActionDto {
    pub id: i64,
    pub architect_name: String,
    pub architect_email: String,
    pub product_name: String,
    pub product_code: String,
    pub dealer_name: String,
    pub quantity: i32,
    pub redeem_points: i32,
    pub order_status: String,
    pub admin_confirm: i16,
    pub order_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl OrderActionDto {
    fn base(detail: &OrderDetail) -> Self {
        Self {
            id: detail.id,
            architect_name: detail.user_name.clone(),
            architect_email: detail.user_email.clone(),
            product_name: detail.product_name.clone(),
            product_code: detail.product_code.clone(),
            dealer_name: detail.dealer_name.clone(),
            quantity: detail.quantity,
            redeem_points: detail.redeem_points,
            order_status: detail.order_status.as_str().to_string(),
            admin_confirm: detail.admin_confirm,
            order_date: detail.order_date.format(ORDER_DATETIME_FORMAT).to_string(),
            confirmed_at: None,
            confirmed_by: None,
            delivered_at: None,
            delivered_by: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
        }
    }

    /// 确认操作结果
    pub fn confirmed(detail: &OrderDetail, operator: &str) -> Self {
        let mut dto = Self::base(detail);
        dto.confirmed_at = Some(Utc::now().format(ORDER_DATETIME_FORMAT).to_string());
        dto.confirmed_by = Some(operator.to_string());
        dto
    }

    /// 发货操作结果
    pub fn delivered(detail: &OrderDetail, operator: &str) -> Self {
        let mut dto = Self::base(detail);
        dto.delivered_at = Some(Utc::now().format(ORDER_DATETIME_FORMAT).to_string());
        dto.delivered_by = Some(operator.to_string());
        dto
    }

    /// 取消操作结果
    pub fn cancelled(detail: &OrderDetail, operator: &str) -> Self {
        let mut dto = Self::base(detail);
        dto.cancelled_at = Some(Utc::now().format(ORDER_DATETIME_FORMAT).to_string());
        dto.cancelled_by = Some(operator.to_string());
        dto.cancellation_reason = detail.cancellation_reason.clone();
        dto
    }
}
