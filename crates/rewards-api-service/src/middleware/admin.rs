//! 管理员权限中间件
//!
//! 在认证中间件之后运行，校验请求扩展中的 Claims 是否具备管理员角色

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::Claims;
use crate::error::ApiError;

/// 管理员权限检查
///
/// 非管理员返回 403，未注入 Claims（认证中间件未运行）返回 401
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<Claims>() {
        Some(claims) if claims.is_admin() => next.run(request).await,
        Some(_) => {
            ApiError::Forbidden("Access denied. Admin privileges required.".to_string())
                .into_response()
        }
        None => ApiError::Unauthorized("Unauthenticated.".to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    fn claims(role: &str) -> Claims {
        Claims {
            sub: "1".to_string(),
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            role: role.to_string(),
            iat: 0,
            exp: i64::MAX,
            iss: "rewards-api-service".to_string(),
        }
    }

    fn admin_router() -> Router {
        Router::new()
            .route("/admin/dashboard", get(|| async { "ok" }))
            .layer(middleware::from_fn(require_admin))
    }

    async fn call_with_claims(claims: Option<Claims>) -> axum::http::StatusCode {
        let mut request = Request::builder()
            .uri("/admin/dashboard")
            .body(Body::empty())
            .unwrap();
        if let Some(c) = claims {
            request.extensions_mut().insert(c);
        }

        let response = admin_router().oneshot(request).await.unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_admin_passes() {
        assert_eq!(call_with_claims(Some(claims("admin"))).await, 200);
    }

    #[tokio::test]
    async fn test_normal_user_forbidden() {
        assert_eq!(call_with_claims(Some(claims("normal"))).await, 403);
    }

    #[tokio::test]
    async fn test_missing_claims_unauthorized() {
        assert_eq!(call_with_claims(None).await, 401);
    }
}
