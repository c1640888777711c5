//! 可观测性入口
//!
//! 日志、追踪、指标经由单一入口初始化，保证指标命名和
//! 标签口径在各处一致。

pub mod metrics;
pub mod middleware;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;
use serde::Deserialize;

/// 可观测性初始化参数
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// 追踪与指标上报时标注的服务名
    pub service_name: String,

    /// OTLP collector 地址（Jaeger 等）
    /// 缺省时不导出分布式追踪
    pub otlp_endpoint: Option<String>,

    /// Prometheus 导出服务监听端口
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// 日志级别，同时作为 EnvFilter 的缺省指令
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 日志以 JSON 输出，便于采集端解析
    #[serde(default)]
    pub json_logs: bool,
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown-service".to_string(),
            otlp_endpoint: None,
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl crate::config::ObservabilityConfig {
    /// 将应用配置中的可观测性段转换为初始化配置，并注入服务名
    pub fn with_service_name(&self, service_name: &str) -> ObservabilityConfig {
        ObservabilityConfig {
            service_name: service_name.to_string(),
            otlp_endpoint: if self.tracing_enabled {
                self.tracing_endpoint.clone()
            } else {
                None
            },
            metrics_port: self.metrics_port,
            log_level: self.log_level.clone(),
            json_logs: self.log_format == "json",
        }
    }
}

/// 持有追踪 provider 与指标导出任务的句柄。
/// drop 时关闭 provider，把尚未发送的 span 刷出去。
pub struct ObservabilityGuard {
    _metrics_handle: Option<metrics::MetricsHandle>,
    _tracing_guard: Option<tracing::TracingGuard>,
}

impl ObservabilityGuard {
    /// 不持有任何资源的 Guard，测试或关闭可观测性时使用
    pub fn empty() -> Self {
        Self {
            _metrics_handle: None,
            _tracing_guard: None,
        }
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        info!("Shutting down observability...");
    }
}

/// 初始化日志、追踪与指标，返回的 Guard 存活期间导出持续运行
///
/// # Example
///
/// ```ignore
/// use rewards_shared::observability::{init, ObservabilityConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let _guard = init(&ObservabilityConfig::default()).await?;
///     // 应用逻辑
///     Ok(())
/// }
/// ```
pub async fn init(config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    // 先装好日志层，metrics 初始化过程中的日志才有出口
    let tracing_guard = tracing::init(config)?;
    let metrics_handle = metrics::init(config).await?;

    info!(
        service = %config.service_name,
        metrics_port = %config.metrics_port,
        otlp_endpoint = ?config.otlp_endpoint,
        "Observability initialized"
    );

    Ok(ObservabilityGuard {
        _metrics_handle: Some(metrics_handle),
        _tracing_guard: Some(tracing_guard),
    })
}
