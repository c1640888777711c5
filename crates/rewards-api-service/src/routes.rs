//! 路由表
//!
//! URL 到处理器的映射，管理端子树额外挂角色检查

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{handlers, middleware::require_admin, state::AppState};

/// 构建认证相关的路由
///
/// 注册与登录为公开路由，登出与当前用户查询需要认证
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// 构建产品与经销商目录路由
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::catalog::list_products))
        .route(
            "/products/by-type/{product_type}",
            get(handlers::catalog::list_products_by_type),
        )
        .route("/dealers", get(handlers::catalog::list_dealers))
}

/// 构建个人资料与银行账户路由
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handlers::profile::get_profile))
        .route("/profile", put(handlers::profile::update_profile))
        .route(
            "/profile/change-password",
            post(handlers::profile::change_password),
        )
        .route(
            "/profile/bank-details",
            post(handlers::profile::add_bank_details),
        )
        .route(
            "/profile/bank-details",
            get(handlers::profile::get_bank_details),
        )
        .route(
            "/profile/bank-details",
            put(handlers::profile::update_bank_details),
        )
}

/// 构建订单路由
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(handlers::orders::place_order))
        .route("/orders/history", get(handlers::orders::order_history))
        .route(
            "/orders/point-summary",
            get(handlers::orders::point_summary),
        )
        .route("/orders/{id}/cancel", post(handlers::orders::cancel_order))
}

/// 构建管理端路由
///
/// 整组套用管理员权限中间件
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(handlers::admin::dashboard))
        .route("/admin/orders", get(handlers::admin::list_orders))
        .route(
            "/admin/orders/{id}/confirm",
            post(handlers::admin::confirm_order),
        )
        .route(
            "/admin/orders/{id}/deliver",
            post(handlers::admin::deliver_order),
        )
        .route(
            "/admin/orders/{id}/cancel",
            post(handlers::admin::cancel_order),
        )
        .route(
            "/admin/company-details",
            get(handlers::admin::get_company_details),
        )
        .route(
            "/admin/company-details",
            put(handlers::admin::update_company_details),
        )
        .layer(middleware::from_fn(require_admin))
}

/// 组装全部业务路由
///
/// 路径不带 `/api` 前缀，由 main.rs 统一 nest
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(profile_routes())
        .merge(order_routes())
        .merge(admin_routes())
}
