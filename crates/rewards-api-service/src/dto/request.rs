//! C端/管理端请求 DTO 定义
//!
//! 所有 REST API 的请求体结构，校验失败统一返回 422

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 更新个人资料请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "The full name field is required."))]
    pub full_name: String,
    #[validate(length(max = 15, message = "The mobile number may not be greater than 15 characters."))]
    pub mobile_number: Option<String>,
    #[validate(length(max = 255, message = "The firm name may not be greater than 255 characters."))]
    pub firm_name: Option<String>,
    #[validate(length(max = 255, message = "The office address may not be greater than 255 characters."))]
    pub office_address: Option<String>,
}

/// 修改密码请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "The old password field is required."))]
    pub old_password: String,
    #[validate(
        length(min = 6, message = "The new password must be at least 6 characters."),
        must_match(other = "new_password_confirmation", message = "The new password confirmation does not match.")
    )]
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// 新增/更新银行账户请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BankDetailRequest {
    #[validate(length(min = 1, max = 20, message = "The account no field is required."))]
    pub account_no: String,
    #[validate(length(min = 1, max = 11, message = "The ifsc code field is required."))]
    pub ifsc_code: String,
    #[validate(length(min = 1, max = 255, message = "The bank name field is required."))]
    pub bank_name: String,
}

/// 更新公司信息请求（管理端）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailRequest {
    #[validate(length(min = 1, max = 255, message = "The company name field is required."))]
    pub company_name: String,
    #[validate(length(max = 500, message = "The address may not be greater than 500 characters."))]
    pub address: Option<String>,
    #[validate(length(max = 20, message = "The phone may not be greater than 20 characters."))]
    pub phone: Option<String>,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: Option<String>,
}

/// 下单请求行
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: i64,
    #[validate(range(min = 1, message = "The quantity must be at least 1."))]
    pub quantity: i32,
}

/// 下单请求
///
/// 一次请求可包含多个产品行，全部行写入同一批次
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderHttpRequest {
    pub dealer_id: i64,
    #[validate(length(min = 1, message = "The products field is required."), nested)]
    pub products: Vec<OrderLineRequest>,
}

/// 取消订单请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderHttpRequest {
    #[validate(length(min = 1, max = 500, message = "The cancellation reason field is required."))]
    pub cancellation_reason: String,
}
