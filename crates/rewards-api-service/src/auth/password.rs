//! bcrypt 密码散列
//!
//! 明文不落库，存储和比对都走散列

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error::ApiError;

/// 以 bcrypt 默认代价散列密码
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    hash(password, DEFAULT_COST).map_err(|e| ApiError::Internal(format!("密码哈希失败: {}", e)))
}

/// 比对明文与存储的散列
///
/// 散列本身无法解析时返回内部错误而非 false
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    verify(password, hash).map_err(|e| ApiError::Internal(format!("密码验证失败: {}", e)))
}
