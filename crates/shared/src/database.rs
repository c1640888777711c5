//! PostgreSQL 连接池管理
//!
//! 按配置建立连接池，并暴露就绪检查和优雅关闭入口。

use crate::config::DatabaseConfig;
use crate::error::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// PostgreSQL 连接池句柄
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 按配置建立连接池
    ///
    /// 连接失败（地址不可达、认证失败）时直接返回错误，由调用方
    /// 决定是否终止启动。
    #[instrument(skip(config))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database pool ready"
        );

        Ok(Self { pool })
    }

    /// 连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 就绪检查，向数据库发送一次往返查询
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// 关闭连接池，等待在途查询完成
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
