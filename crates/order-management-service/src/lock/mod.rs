//! 分布式锁模块
//!
//! 下单和取消都以用户为粒度加锁，同一用户的读后写序列
//! （首单判定、同批扫描、奖励回收）在锁内串行执行。
//!
//! ## 后端选择
//!
//! - 配置了 Redis 时在 Redis 上竞争（SET NX PX）
//! - Redis 不可用时退回 `distributed_locks` 表
//! - `LockGuard` 以 RAII 方式跟踪持有状态，释放需显式调用 `release()`
//!
//! ## 使用示例
//!
//! ```ignore
//! let lock_manager = LockManager::with_defaults(redis_client, pool);
//!
//! let guard = lock_manager.acquire(&user_order_key(42), None).await?;
//! // 串行化的读后写逻辑
//! guard.release().await?;
//! ```

mod lock_manager;

pub use lock_manager::{LockConfig, LockGuard, LockManager};

/// 用户级订单锁的 key
///
/// 下单与取消共用同一把锁，保证批次写入和奖励回收互斥。
pub fn user_order_key(user_id: i64) -> String {
    format!("order:user:{}", user_id)
}
