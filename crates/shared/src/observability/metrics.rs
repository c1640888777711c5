//! Prometheus 指标导出
//!
//! 业务代码通过 metrics 宏记录，metrics-exporter-prometheus 负责导出。
//! 导出服务监听独立端口，/metrics 由 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// 全局 handle，渲染 /metrics 文本
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// 指标导出资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 安装 Prometheus recorder 并启动导出服务
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder()?;

    // 留一份全局引用，按需渲染指标快照
    let _ = PROMETHEUS_HANDLE.set(handle.clone());

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 预注册指标描述
fn register_common_metrics(service_name: &str) {
    // 描述文本出现在导出端点的 HELP 注释中

    metrics::describe_counter!("http_requests_total", "Total HTTP requests served");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );

    metrics::describe_counter!("orders_placed_total", "Total number of orders placed");
    metrics::describe_histogram!(
        "order_placement_duration_seconds",
        "Order placement duration in seconds"
    );

    metrics::describe_counter!(
        "order_cancellations_total",
        "Total number of order cancellations"
    );
    metrics::describe_counter!(
        "order_status_transitions_total",
        "Total number of order status transitions"
    );

    metrics::describe_counter!(
        "bonus_point_entries_total",
        "Total number of bonus point ledger entries"
    );
    metrics::describe_counter!(
        "user_lock_conflicts_total",
        "Total number of per-user lock acquisition conflicts"
    );

    // 服务启动计数
    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动导出 HTTP 服务，暴露 /metrics 与自身的 /health
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics exporter listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics exporter error: {}", e);
        }
    });

    Ok(server_handle)
}

/// 全局 Prometheus handle
pub fn get_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

// ============================================================================
// 指标记录函数
// ============================================================================

/// 记录一次 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录下单
#[inline]
pub fn record_order_placed(status: &str, first_batch_bonus: bool, duration_secs: f64) {
    metrics::counter!(
        "orders_placed_total",
        "status" => status.to_string(),
        "first_batch_bonus" => first_batch_bonus.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "order_placement_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration_secs);
}

/// 记录订单取消
#[inline]
pub fn record_order_cancellation(actor: &str, status: &str) {
    metrics::counter!(
        "order_cancellations_total",
        "actor" => actor.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录订单状态流转
#[inline]
pub fn record_status_transition(from: &str, to: &str) {
    metrics::counter!(
        "order_status_transitions_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// 记录奖励积分流水写入（grant / retraction）
#[inline]
pub fn record_bonus_entry(entry_type: &str) {
    metrics::counter!(
        "bonus_point_entries_total",
        "entry_type" => entry_type.to_string()
    )
    .increment(1);
}

/// 记录用户级锁竞争失败
#[inline]
pub fn record_lock_conflict(resource: &str) {
    metrics::counter!(
        "user_lock_conflicts_total",
        "resource" => resource.to_string()
    )
    .increment(1);
}
