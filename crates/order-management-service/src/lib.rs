//! 订单管理服务
//!
//! 提供订单下单、生命周期流转、积分结算等核心功能。
//!
//! ## 核心功能
//!
//! - **订单下单**：按产品行批量创建订单，同一次请求共享 batch_id
//! - **首批奖励**：用户首次下单且任一行数量达到阈值时发放奖励积分
//! - **生命周期流转**：PENDING → CONFIRM → DELIVERED / CANCELLED 状态机
//! - **取消结算**：取消订单时清零积分，并按批次规则追回首批奖励
//! - **积分汇总**：合并订单积分与奖励流水，生成积分明细与余额
//! - **分布式锁**：同一用户的下单/取消串行化，防止并发重复发放
//!
//! ## 模块结构
//!
//! - `models`: 订单、用户、产品与积分流水的领域模型
//! - `error`: 业务错误，含状态冲突语义
//! - `repository`: SQLx 仓储与可 mock 的接口
//! - `service`: 下单、生命周期流转、积分汇总
//! - `lock`: 用户粒度分布式锁

pub mod error;
pub mod lock;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{OrderError, Result};
pub use lock::{LockConfig, LockGuard, LockManager};
pub use models::*;
pub use repository::{
    CatalogRepository, CompanyRepository, LedgerRepository, OrderRepository, UserRepository,
};
pub use service::{LifecycleService, PlacementService, SummaryService, dto};

/// 运行数据库迁移
///
/// 迁移文件位于 `migrations/` 目录，按时间戳顺序执行。
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| OrderError::Database(e.into()))?;
    Ok(())
}
