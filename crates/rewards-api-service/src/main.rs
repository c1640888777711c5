//! 积分奖励订货 API 服务
//!
//! 面向建筑师用户与管理员的 REST API。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Request,
    http::HeaderValue,
    middleware,
    middleware::Next,
    response::Response,
    routing::get,
};
use rewards_api_service::{auth::JwtConfig, middleware::auth_middleware, routes, state::AppState};
use rewards_shared::{
    cache::Cache,
    config::AppConfig,
    database::Database,
    observability::{self, middleware as obs_middleware},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：配置文件 + REWARDS_ 前缀环境变量，缺失项落默认值
    let config = AppConfig::load("rewards-api-service").unwrap_or_default();

    // 可观测性参数取自配置的 observability 段，服务名单独注入
    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!("Starting rewards-api-service on {}", config.server_addr());

    // 初始化基础设施
    let db = Database::connect(&config.database).await?;
    let cache = Arc::new(Cache::new(&config.redis)?);

    // 启动时执行数据库迁移，保证表结构与代码一致
    order_management::run_migrations(db.pool()).await?;
    info!("Database migrations applied");

    // 分布式锁的 Redis 客户端：创建失败不阻止启动，锁退回数据库锁表
    let redis_client = match redis::Client::open(config.redis.url.as_str()) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(
                "Failed to create Redis client for locking: {}. Falling back to database locks.",
                e
            );
            None
        }
    };

    // JWT 密钥：生产环境必须通过环境变量注入，开发环境使用默认值
    let jwt_secret = match std::env::var("REWARDS_JWT_SECRET") {
        Ok(secret) => secret,
        Err(_) if config.is_production() => {
            anyhow::bail!("REWARDS_JWT_SECRET must be set in production");
        }
        Err(_) => {
            warn!("Using default JWT secret - set REWARDS_JWT_SECRET for production");
            "rewards-api-secret-key-change-in-production".to_string()
        }
    };

    let jwt_expires = std::env::var("REWARDS_JWT_EXPIRES_SECS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(86400);

    let jwt_config = JwtConfig {
        secret: jwt_secret,
        expires_in_secs: jwt_expires,
        issuer: "rewards-api-service".to_string(),
    };

    let state = AppState::new(db.pool().clone(), cache.clone(), redis_client, jwt_config);

    // 允许的跨域来源由 REWARDS_CORS_ORIGINS 控制，
    // 缺省只放行本地前端开发端口，生产环境必须显式配置
    let allowed_origins = std::env::var("REWARDS_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    let cors = if allowed_origins == "*" {
        if config.is_production() {
            warn!("REWARDS_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", get(health_check))
        .route(
            "/ready",
            get({
                let db_for_ready = db.clone();
                let cache_for_ready = cache;
                move || readiness_check(db_for_ready.clone(), cache_for_ready.clone())
            }),
        )
        // 安全响应头在应用层补齐，不依赖反向代理
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        // JWT 鉴权，公开路径在中间件内放行
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        // 请求级 span 与指标
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 收到退出信号后不再接收新连接，在途请求处理完才退出
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// 所有响应统一附加的浏览器安全头
///
/// nosniff 禁止 Content-Type 猜测；DENY 禁止 iframe 嵌入；
/// HSTS 强制后续访问走 HTTPS；x-xss-protection 置 0 关闭旧式
/// 过滤器，XSS 防护交给 CSP。
const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    ("x-xss-protection", "0"),
];

/// 为所有响应注入 HTTP 安全头，不依赖上游反向代理的配置
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

/// 等待 SIGTERM（容器编排下线实例）或 Ctrl+C（本地开发），
/// 返回即进入优雅关闭
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("安装 Ctrl+C 信号处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("安装 SIGTERM 信号处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 存活探针，进程活着就算通过
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rewards-api-service"
    }))
}

/// 就绪探针，探活数据库与 Redis
///
/// 任一依赖不可用时上报 degraded，编排侧据此摘除流量。
async fn readiness_check(db: Database, cache: Arc<Cache>) -> Json<serde_json::Value> {
    let db_ok = db.health_check().await.is_ok();
    let cache_ok = cache.health_check().await.is_ok();
    let all_ok = db_ok && cache_ok;

    Json(serde_json::json!({
        "status": if all_ok { "ok" } else { "degraded" },
        "service": "rewards-api-service",
        "checks": {
            "database": if db_ok { "ok" } else { "fail" },
            "redis": if cache_ok { "ok" } else { "fail" }
        }
    }))
}
