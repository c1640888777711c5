//! 管理端处理器
//!
//! 提供仪表盘统计、订单审核（确认/发货/取消）和公司信息管理的 API

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use order_management::OrderError;
use order_management::dto::CancelOrderRequest;
use order_management::models::{OrderStatus, UserRole};
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{
    AdminOrderDto, AdminOrderListDto, ApiResponse, CancelOrderHttpRequest, CompanyDetailDto,
    CompanyDetailRequest, DashboardTotals, OrderActionDto,
};
use crate::error::{ApiError, Result};
use crate::handlers::orders::cancel_error;
use crate::state::AppState;

/// 确认操作的状态冲突消息映射
fn confirm_error(err: OrderError) -> ApiError {
    if let OrderError::InvalidOrderStatus { current_status, .. } = &err {
        if current_status == "CANCELLED" {
            return ApiError::Conflict("Cannot confirm a cancelled order.".to_string());
        }
    }
    err.into()
}

/// 发货操作的状态冲突消息映射
fn deliver_error(err: OrderError) -> ApiError {
    if let OrderError::InvalidOrderStatus { current_status, .. } = &err {
        match current_status.as_str() {
            "DELIVERED" => {
                return ApiError::Conflict("Order is already marked as delivered.".to_string());
            }
            "CANCELLED" => {
                return ApiError::Conflict(
                    "Cannot mark a cancelled order as delivered.".to_string(),
                );
            }
            _ => {}
        }
    }
    err.into()
}

/// 仪表盘统计
///
/// GET /api/admin/dashboard
pub async fn dashboard(State(state): State<AppState>) -> Result<ApiResponse<DashboardTotals>> {
    let total_orders = state.order_repo.count_orders().await?;
    let total_pending_orders = state.order_repo.count_by_status(OrderStatus::Pending).await?;
    let total_architects = state.user_repo.count_by_role(UserRole::Normal).await?;
    let total_dealers = state.catalog_repo.count_dealers().await?;

    Ok(ApiResponse::ok(
        "Dashboard totals retrieved successfully",
        DashboardTotals {
            total_orders,
            total_pending_orders,
            total_architects,
            total_dealers,
        },
    ))
}

/// 全量订单列表
///
/// GET /api/admin/orders
pub async fn list_orders(State(state): State<AppState>) -> Result<ApiResponse<AdminOrderListDto>> {
    let details = state.order_repo.list_details().await?;
    let orders: Vec<AdminOrderDto> = details.iter().map(AdminOrderDto::from).collect();
    let total_count = orders.len() as i64;

    Ok(ApiResponse::ok(
        "All orders retrieved successfully",
        AdminOrderListDto {
            orders,
            total_count,
        },
    ))
}

/// 确认订单
///
/// POST /api/admin/orders/{id}/confirm
pub async fn confirm_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
) -> Result<ApiResponse<OrderActionDto>> {
    let detail = state
        .lifecycle_service
        .confirm_order(order_id)
        .await
        .map_err(confirm_error)?;

    Ok(ApiResponse::ok(
        "Order confirmed successfully.",
        OrderActionDto::confirmed(&detail, &claims.name),
    ))
}

/// 标记发货
///
/// POST /api/admin/orders/{id}/deliver
pub async fn deliver_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
) -> Result<ApiResponse<OrderActionDto>> {
    let detail = state
        .lifecycle_service
        .mark_delivered(order_id)
        .await
        .map_err(deliver_error)?;

    Ok(ApiResponse::ok(
        "Order marked as delivered successfully.",
        OrderActionDto::delivered(&detail, &claims.name),
    ))
}

/// 管理员取消订单
///
/// POST /api/admin/orders/{id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
    Json(req): Json<CancelOrderHttpRequest>,
) -> Result<ApiResponse<OrderActionDto>> {
    req.validate()?;

    let admin_id = claims.user_id()?;
    let detail = state
        .lifecycle_service
        .cancel_order(CancelOrderRequest::by_admin(
            order_id,
            admin_id,
            req.cancellation_reason,
        ))
        .await
        .map_err(cancel_error)?;

    Ok(ApiResponse::ok(
        "Order cancelled successfully.",
        OrderActionDto::cancelled(&detail, &claims.name),
    ))
}

/// 查询公司信息
///
/// GET /api/admin/company-details
pub async fn get_company_details(
    State(state): State<AppState>,
) -> Result<ApiResponse<CompanyDetailDto>> {
    let detail = state
        .company_repo
        .get_company_detail()
        .await?
        .ok_or_else(|| ApiError::NotFound("No company details found.".to_string()))?;

    Ok(ApiResponse::ok(
        "Company details fetched successfully.",
        CompanyDetailDto::from(detail),
    ))
}

/// 更新公司信息
///
/// PUT /api/admin/company-details
///
/// 单行配置，不存在时创建
pub async fn update_company_details(
    State(state): State<AppState>,
    Json(req): Json<CompanyDetailRequest>,
) -> Result<ApiResponse<CompanyDetailDto>> {
    req.validate()?;

    let detail = state
        .company_repo
        .upsert_company_detail(
            &req.company_name,
            req.address.as_deref(),
            req.phone.as_deref(),
            req.email.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(
        "Company details updated successfully.",
        CompanyDetailDto::from(detail),
    ))
}
