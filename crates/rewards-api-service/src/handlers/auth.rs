//! 注册、登录、登出与当前用户
//!
//! 登录成功即签发 JWT，登出是无状态的客户端丢弃语义

use axum::{Extension, Json, extract::State};
use order_management::models::User;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::auth::{Claims, hash_password, verify_password};
use crate::dto::ApiResponse;
use crate::error::{ApiError, Result};
use crate::state::AppState;

// ============================================
// 请求/响应 DTO
// ============================================

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    #[validate(
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email may not be greater than 255 characters.")
    )]
    pub email: String,
    #[validate(
        length(min = 6, message = "The password must be at least 6 characters."),
        must_match(other = "password_confirmation", message = "The password confirmation does not match.")
    )]
    pub password: String,
    pub password_confirmation: String,
}

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

/// 认证响应（注册/登录共用）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
    pub expires_at: i64,
}

/// 用户摘要 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub user_role: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            user_role: user.user_role.as_str().to_string(),
        }
    }
}

// ============================================
// API 处理器
// ============================================

/// 用户注册
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<ApiResponse<AuthResponse>> {
    req.validate()?;

    // 邮箱唯一性检查
    if state.user_repo.get_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::EmailTaken);
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .user_repo
        .create_user(&req.name, &req.email, &password_hash)
        .await?;

    let (token, expires_at) = state.jwt_manager.generate_token(&user)?;
    info!(user_id = user.id, email = %user.email, "用户注册成功");

    Ok(ApiResponse::created(
        "Registered successfully.",
        AuthResponse {
            token,
            user: UserDto::from(&user),
            expires_at,
        },
    ))
}

/// 用户登录
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>> {
    req.validate()?;

    // 未知邮箱与密码错误返回相同的 401，不泄露账号是否存在
    let user = state
        .user_repo
        .get_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    if !verify_password(&req.password, &user.password)? {
        return Err(ApiError::Unauthorized("Unauthorized".to_string()));
    }

    let (token, expires_at) = state.jwt_manager.generate_token(&user)?;
    info!(user_id = user.id, "用户登录成功");

    Ok(ApiResponse::ok(
        "Logged in successfully.",
        AuthResponse {
            token,
            user: UserDto::from(&user),
            expires_at,
        },
    ))
}

/// 用户登出
///
/// POST /api/auth/logout
///
/// JWT 无服务端会话，登出由客户端丢弃 Token 完成
pub async fn logout(Extension(claims): Extension<Claims>) -> Result<ApiResponse<()>> {
    info!(user_id = %claims.sub, "用户登出");
    Ok(ApiResponse::message("Logged out successfully"))
}

/// 获取当前用户
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<ApiResponse<UserDto>> {
    let user_id = claims.user_id()?;
    let user = state
        .user_repo
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(ApiResponse::ok(
        "User profile fetched successfully.",
        UserDto::from(&user),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(password: &str, confirmation: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register_request("secret1", "secret1").validate().is_ok());

        // 密码过短
        assert!(register_request("abc", "abc").validate().is_err());

        // 两次密码不一致
        assert!(register_request("secret1", "secret2").validate().is_err());

        // 非法邮箱
        let mut invalid = register_request("secret1", "secret1");
        invalid.email = "not-an-email".to_string();
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_register_request_camel_case_keys() {
        let json = r#"{
            "name": "Asha Verma",
            "email": "asha@example.com",
            "password": "secret1",
            "passwordConfirmation": "secret1"
        }"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.password_confirmation, "secret1");
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "asha@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_password = LoginRequest {
            email: "asha@example.com".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_user_dto_hides_password() {
        use chrono::Utc;
        use order_management::models::UserRole;

        let user = User {
            id: 7,
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            password: "$2b$12$secret-hash".to_string(),
            user_role: UserRole::Normal,
            mobile_no: None,
            firm_name: None,
            office_address: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserDto::from(&user)).unwrap();
        assert!(json.contains("\"userRole\":\"normal\""));
        assert!(!json.contains("secret-hash"));
    }
}
