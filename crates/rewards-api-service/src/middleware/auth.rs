//! 请求鉴权
//!
//! 校验 Bearer Token，把解出的身份放进请求扩展给处理器用

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AppState;

/// 免鉴权路径前缀
const PUBLIC_PATHS: [&str; 4] = [
    "/api/auth/register",
    "/api/auth/login",
    "/health",
    "/ready",
];

/// 鉴权中间件
///
/// 注册、登录与探活路径直接放行，其余请求必须携带有效的
/// Bearer Token，解出的 Claims 注入请求扩展。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if PUBLIC_PATHS.iter().any(|p| path.starts_with(p)) {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return ApiError::Unauthorized("Unauthenticated.".to_string()).into_response();
        }
    };

    match state.jwt_manager.verify_token(token) {
        Ok(claims) => {
            // 处理器通过 Extension<Claims> 取当前用户
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
