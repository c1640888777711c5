//! 订单相关的 HTTP 处理器
//!
//! 提供下单、取消、订单历史和积分明细的 API

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use order_management::OrderError;
use order_management::dto::{
    CancelOrderRequest, OrderHistoryEntryDto, OrderLine, PlaceOrderRequest, PlaceOrderResponse,
    PointEntryDto,
};
use order_management::models::OrderDetail;
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{ApiResponse, CancelOrderHttpRequest, PlaceOrderHttpRequest};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 取消操作的状态冲突消息映射
///
/// 终态订单的取消请求按当前状态给出具体提示
pub(crate) fn cancel_error(err: OrderError) -> ApiError {
    if let OrderError::InvalidOrderStatus { current_status, .. } = &err {
        match current_status.as_str() {
            "CANCELLED" => {
                return ApiError::Conflict("Order is already cancelled.".to_string());
            }
            "DELIVERED" => {
                return ApiError::Conflict("Cannot cancel a delivered order.".to_string());
            }
            _ => {}
        }
    }
    err.into()
}

/// 下单
///
/// POST /api/orders
///
/// 同一请求内的所有产品行共享一个批次，响应含批次号与各行订单
pub async fn place_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PlaceOrderHttpRequest>,
) -> Result<ApiResponse<PlaceOrderResponse>> {
    req.validate()?;

    let user_id = claims.user_id()?;
    let lines = req
        .products
        .iter()
        .map(|line| OrderLine {
            product_id: line.product_id,
            quantity: line.quantity,
        })
        .collect();

    let response = state
        .placement_service
        .place_order(PlaceOrderRequest::new(user_id, req.dealer_id, lines))
        .await?;

    Ok(ApiResponse::ok("Orders placed successfully.", response))
}

/// 取消订单
///
/// POST /api/orders/{id}/cancel
///
/// 本人或管理员可取消；管理员取消不受归属校验限制
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i64>,
    Json(req): Json<CancelOrderHttpRequest>,
) -> Result<ApiResponse<OrderDetail>> {
    req.validate()?;

    let actor_id = claims.user_id()?;
    let request = if claims.is_admin() {
        CancelOrderRequest::by_admin(order_id, actor_id, req.cancellation_reason)
    } else {
        CancelOrderRequest::by_user(order_id, actor_id, req.cancellation_reason)
    };

    let detail = state
        .lifecycle_service
        .cancel_order(request)
        .await
        .map_err(cancel_error)?;

    Ok(ApiResponse::ok("Order cancelled successfully.", detail))
}

/// 订单历史
///
/// GET /api/orders/history
pub async fn order_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<ApiResponse<Vec<OrderHistoryEntryDto>>> {
    let user_id = claims.user_id()?;
    let entries = state.summary_service.get_order_history(user_id).await?;

    Ok(ApiResponse::ok(
        "Order history retrieved successfully.",
        entries,
    ))
}

/// 积分明细
///
/// GET /api/orders/point-summary
///
/// 合并奖励流水与订单积分，流水在前订单在后
pub async fn point_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<ApiResponse<Vec<PointEntryDto>>> {
    let user_id = claims.user_id()?;
    let entries = state.summary_service.get_point_summary(user_id).await?;

    Ok(ApiResponse::ok(
        "Point summary retrieved successfully.",
        entries,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_error_terminal_states() {
        let err = cancel_error(OrderError::InvalidOrderStatus {
            order_id: 1,
            current_status: "CANCELLED".to_string(),
        });
        assert_eq!(err.client_message(), "Order is already cancelled.");

        let err = cancel_error(OrderError::InvalidOrderStatus {
            order_id: 1,
            current_status: "DELIVERED".to_string(),
        });
        assert_eq!(err.client_message(), "Cannot cancel a delivered order.");
    }

    #[test]
    fn test_cancel_error_passthrough() {
        let err = cancel_error(OrderError::OrderNotFound(9));
        assert_eq!(err.client_message(), "Order not found.");

        let err = cancel_error(OrderError::Forbidden(
            "Access denied. You can only cancel your own orders.".to_string(),
        ));
        assert_eq!(
            err.client_message(),
            "Access denied. You can only cancel your own orders."
        );
    }

    #[test]
    fn test_place_order_request_validation() {
        let valid = PlaceOrderHttpRequest {
            dealer_id: 1,
            products: vec![crate::dto::OrderLineRequest {
                product_id: 2,
                quantity: 10,
            }],
        };
        assert!(valid.validate().is_ok());

        let no_lines = PlaceOrderHttpRequest {
            dealer_id: 1,
            products: vec![],
        };
        assert!(no_lines.validate().is_err());
    }
}
