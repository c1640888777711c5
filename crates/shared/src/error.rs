//! 基础设施层错误
//!
//! 数据库、缓存、配置等共享组件的错误类型。
//! 业务语义的错误由各服务自己定义，这里只覆盖基础设施。

use thiserror::Error;

/// 基础设施错误
#[derive(Debug, Error)]
pub enum SharedError {
    // ==================== 存储 ====================
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} 未找到: id={id}")]
    NotFound { entity: String, id: String },

    // ==================== 缓存与配置 ====================
    #[error("缓存操作失败: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    // ==================== 其他 ====================
    #[error("校验失败: {0}")]
    Validation(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 共享层的 Result 别名
pub type Result<T> = std::result::Result<T, SharedError>;

impl SharedError {
    /// 稳定的错误码，日志与告警按此聚合
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Redis(_) => "REDIS_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 瞬态故障，调用方可以重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Redis(_))
    }
}
