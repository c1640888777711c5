//! 订单域错误
//!
//! 业务错误带 4xx 语义可直接外露，系统错误在 API 层脱敏。

use thiserror::Error;

/// 订单域错误
#[derive(Debug, Error)]
pub enum OrderError {
    // === 校验与资源错误 ===
    #[error("入参校验失败: {0}")]
    Validation(String),

    #[error("经销商不存在: {0}")]
    DealerNotFound(i64),

    #[error("产品不存在: {0}")]
    ProductNotFound(i64),

    #[error("订单不存在: {0}")]
    OrderNotFound(i64),

    #[error("用户不存在: {0}")]
    UserNotFound(i64),

    #[error("无权执行此操作: {0}")]
    Forbidden(String),

    // === 订单状态错误 ===
    #[error("订单 {order_id} 当前状态 {current_status} 不允许该操作")]
    InvalidOrderStatus {
        order_id: i64,
        current_status: String,
    },

    #[error("订单已确认，无法重复操作: {0}")]
    AlreadyConfirmed(i64),

    // === 基础设施 ===
    #[error("并发更新冲突，可重试")]
    ConcurrencyConflict,

    #[error("获取分布式锁失败: {0}")]
    LockFailed(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 订单服务 Result 类型别名
pub type Result<T> = std::result::Result<T, OrderError>;

impl OrderError {
    /// 业务错误的信息可原样外露，其余错误脱敏后再返回
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::ConcurrencyConflict | Self::LockFailed(_) | Self::Database(_) | Self::Internal(_)
        )
    }

    /// 稳定错误码，API 层按码选响应映射
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DealerNotFound(_) => "DEALER_NOT_FOUND",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidOrderStatus { .. } => "INVALID_ORDER_STATUS",
            Self::AlreadyConfirmed(_) => "ALREADY_CONFIRMED",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            Self::LockFailed(_) => "LOCK_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_business_error() {
        assert!(OrderError::DealerNotFound(1).is_business_error());
        assert!(OrderError::Validation("quantity 必须为正数".to_string()).is_business_error());
        assert!(
            OrderError::InvalidOrderStatus {
                order_id: 1,
                current_status: "DELIVERED".to_string()
            }
            .is_business_error()
        );
        assert!(!OrderError::Internal("panic".to_string()).is_business_error());
        assert!(!OrderError::ConcurrencyConflict.is_business_error());
        assert!(!OrderError::LockFailed("redis down".to_string()).is_business_error());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(OrderError::OrderNotFound(1).error_code(), "ORDER_NOT_FOUND");
        assert_eq!(
            OrderError::InvalidOrderStatus {
                order_id: 1,
                current_status: "CANCELLED".to_string()
            }
            .error_code(),
            "INVALID_ORDER_STATUS"
        );
        assert_eq!(
            OrderError::ConcurrencyConflict.error_code(),
            "CONCURRENCY_CONFLICT"
        );
    }

    #[test]
    fn test_error_display() {
        let err = OrderError::InvalidOrderStatus {
            order_id: 42,
            current_status: "DELIVERED".to_string(),
        };
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("DELIVERED"));

        let err = OrderError::Forbidden("仅管理员可确认订单".to_string());
        assert!(err.to_string().contains("仅管理员"));
    }
}
