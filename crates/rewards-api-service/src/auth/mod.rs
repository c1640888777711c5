//! 认证模块
//!
//! JWT 的签发与校验，以及 bcrypt 密码散列。
//! 登录颁发的 Token 内嵌用户身份与角色，中间件据此鉴权。

mod jwt;
mod password;

pub use jwt::{Claims, JwtConfig, JwtManager};
pub use password::{hash_password, verify_password};
