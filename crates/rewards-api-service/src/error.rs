//! API 服务错误类型
//!
//! 定义 HTTP 层错误及其到统一响应信封的映射。
//! 系统错误（数据库、内部故障）对客户端脱敏，仅记录日志。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use order_management::OrderError;
use serde_json::{Value, json};
use thiserror::Error;

/// API 错误类型
#[derive(Debug, Error)]
pub enum ApiError {
    // === 认证与授权 ===
    #[error("未认证: {0}")]
    Unauthorized(String),

    #[error("无权访问: {0}")]
    Forbidden(String),

    // === 请求校验 ===
    #[error("请求无效: {0}")]
    BadRequest(String),

    #[error("请求体校验失败: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("邮箱已被注册")]
    EmailTaken,

    // === 资源与状态 ===
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("操作与当前状态冲突: {0}")]
    Conflict(String),

    // === 基础设施 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// API 层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// 映射到 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) | Self::EmailTaken => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 客户端可见的错误消息
    ///
    /// 系统错误统一脱敏，具体原因只进日志
    pub fn client_message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Validation(_) => "Validation failed.".to_string(),
            Self::EmailTaken => "The email has already been taken.".to_string(),
            Self::Database(_) | Self::Internal(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "请求处理失败");
        }

        let mut body = json!({
            "status": status.as_u16(),
            "message": self.client_message(),
        });

        // 422 保留逐字段校验明细
        if let Self::Validation(errors) = &self {
            body["errors"] = serde_json::to_value(errors).unwrap_or(Value::Null);
        }

        (status, Json(body)).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(msg) => Self::BadRequest(msg),
            OrderError::DealerNotFound(_) => {
                Self::BadRequest("The selected dealer is invalid.".to_string())
            }
            OrderError::ProductNotFound(_) => {
                Self::BadRequest("The selected product is invalid.".to_string())
            }
            OrderError::OrderNotFound(_) => Self::NotFound("Order not found.".to_string()),
            OrderError::UserNotFound(_) => Self::NotFound("User not found.".to_string()),
            OrderError::Forbidden(msg) => Self::Forbidden(msg),
            OrderError::AlreadyConfirmed(_) => {
                Self::Conflict("Order is already confirmed.".to_string())
            }
            OrderError::InvalidOrderStatus { current_status, .. } => Self::Conflict(format!(
                "The order cannot be modified in its current state ({current_status})."
            )),
            OrderError::ConcurrencyConflict => Self::Conflict(
                "The order is being processed by another request. Please retry.".to_string(),
            ),
            OrderError::LockFailed(msg) => Self::Internal(msg),
            OrderError::Database(e) => Self::Database(e),
            OrderError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct SampleRequest {
        #[validate(length(min = 1, message = "The reason field is required."))]
        reason: String,
    }

    fn validation_errors() -> validator::ValidationErrors {
        SampleRequest {
            reason: String::new(),
        }
        .validate()
        .unwrap_err()
    }

    fn all_error_variants() -> Vec<ApiError> {
        vec![
            ApiError::Unauthorized("Unauthenticated.".to_string()),
            ApiError::Forbidden("Access denied. Admin privileges required.".to_string()),
            ApiError::BadRequest("The selected dealer is invalid.".to_string()),
            ApiError::Validation(validation_errors()),
            ApiError::EmailTaken,
            ApiError::NotFound("Order not found.".to_string()),
            ApiError::Conflict("Order is already confirmed.".to_string()),
            ApiError::Database(sqlx::Error::PoolClosed),
            ApiError::Internal("lock backend unavailable".to_string()),
        ]
    }

    #[test]
    fn test_all_variants_covered() {
        // 新增变体时同步更新此处和 all_error_variants
        assert_eq!(all_error_variants().len(), 9);
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ApiError::Unauthorized("x".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Forbidden("x".to_string()), StatusCode::FORBIDDEN),
            (
                ApiError::BadRequest("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Validation(validation_errors()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ApiError::EmailTaken, StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".to_string()), StatusCode::CONFLICT),
            (
                ApiError::Database(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Internal("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "variant: {:?}", error);
        }
    }

    #[test]
    fn test_system_errors_hide_details() {
        let error = ApiError::Database(sqlx::Error::PoolClosed);
        assert_eq!(
            error.client_message(),
            "Something went wrong. Please try again later."
        );

        let error = ApiError::Internal("redis connection refused at 10.0.0.3".to_string());
        let message = error.client_message();
        assert!(!message.contains("10.0.0.3"));
        assert!(!message.contains("redis"));
    }

    #[test]
    fn test_business_errors_keep_message() {
        let error = ApiError::Conflict("Order is already cancelled.".to_string());
        assert_eq!(error.client_message(), "Order is already cancelled.");

        let error = ApiError::NotFound("No bank details found.".to_string());
        assert_eq!(error.client_message(), "No bank details found.");
    }

    #[tokio::test]
    async fn test_into_response_envelope() {
        let response = ApiError::Conflict("Order is already confirmed.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["status"], 409);
        assert_eq!(body["message"], "Order is already confirmed.");
        assert!(body.get("data").is_none());
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_validation_response_carries_field_errors() {
        let response = ApiError::Validation(validation_errors()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["message"], "Validation failed.");
        assert!(body["errors"]["reason"].is_array());
    }

    #[test]
    fn test_from_order_error_mappings() {
        let error: ApiError = OrderError::OrderNotFound(42).into();
        assert!(matches!(error, ApiError::NotFound(_)));
        assert_eq!(error.client_message(), "Order not found.");

        let error: ApiError = OrderError::DealerNotFound(3).into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);

        let error: ApiError = OrderError::AlreadyConfirmed(42).into();
        assert_eq!(error.client_message(), "Order is already confirmed.");

        let error: ApiError = OrderError::Forbidden(
            "Access denied. You can only cancel your own orders.".to_string(),
        )
        .into();
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);

        let error: ApiError = OrderError::InvalidOrderStatus {
            order_id: 42,
            current_status: "CANCELLED".to_string(),
        }
        .into();
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert!(error.client_message().contains("CANCELLED"));

        let error: ApiError = OrderError::LockFailed("redis down".to_string()).into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!error.client_message().contains("redis"));
    }

    #[test]
    fn test_from_validator_errors() {
        let error: ApiError = validation_errors().into();
        assert!(matches!(error, ApiError::Validation(_)));
        assert_eq!(error.client_message(), "Validation failed.");
    }
}
