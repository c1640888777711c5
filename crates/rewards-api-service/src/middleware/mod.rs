//! 中间件模块
//!
//! 提供认证和管理员权限检查中间件

mod admin;
mod auth;

pub use admin::require_admin;
pub use auth::auth_middleware;
