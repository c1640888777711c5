//! 分布式锁管理器
//!
//! Redis 可用时在 Redis 上竞争锁，Redis 出错时退回 distributed_locks 表。

use crate::error::{OrderError, Result};
use chrono::Utc;
use redis::Client as RedisClient;
use rewards_shared::observability::metrics;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// 校验 owner 后删除锁的 Lua 脚本，比较和删除在 Redis 内原子完成
const RELEASE_SCRIPT: &str = r#"
    if redis.call("get", KEYS[1]) == ARGV[1] then
        return redis.call("del", KEYS[1])
    else
        return 0
    end
"#;

/// 锁配置
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// 默认锁超时时间
    pub default_ttl: Duration,
    /// 获取锁的最大尝试次数
    pub retry_count: u32,
    /// 两次尝试之间的等待时间
    pub retry_delay: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(30),
            retry_count: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

/// 分布式锁管理器
///
/// 同一把锁的持有者由 `owner` 字符串标识，格式为 `instance_id:uuid`，
/// 释放时校验 owner，避免误删其他实例或已被接管的锁。
pub struct LockManager {
    redis_client: Option<RedisClient>,
    pool: PgPool,
    config: LockConfig,
    /// 实例标识，作为锁 owner 的前缀，便于排查锁被哪个实例持有
    instance_id: String,
}

impl LockManager {
    /// 创建锁管理器
    ///
    /// `redis_client` 为 None 时只使用数据库锁。
    pub fn new(redis_client: Option<RedisClient>, pool: PgPool, config: LockConfig) -> Self {
        Self {
            redis_client,
            pool,
            config,
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// 按默认的 TTL 与重试参数构造
    pub fn with_defaults(redis_client: Option<RedisClient>, pool: PgPool) -> Self {
        Self::new(redis_client, pool, LockConfig::default())
    }

    /// 获取锁
    ///
    /// 每次尝试优先走 Redis；Redis 传输出错时当次立即改试数据库，
    /// 并且本次调用后续的尝试不再回到 Redis。重试耗尽仍未获取则
    /// 返回 `LockFailed`。
    ///
    /// `ttl` 为 None 时使用配置中的 `default_ttl`。
    #[instrument(skip(self), fields(instance_id = %self.instance_id))]
    pub async fn acquire(&self, key: &str, ttl: Option<Duration>) -> Result<LockGuard> {
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        let owner = format!("{}:{}", self.instance_id, Uuid::new_v4());
        // 降级状态只对本次 acquire 调用生效
        let mut redis = self.redis_client.as_ref();

        for attempt in 0..self.config.retry_count {
            let guard = match redis {
                Some(client) => match self.redis_try_acquire(client, key, &owner, ttl).await {
                    Ok(guard) => guard,
                    Err(e) => {
                        warn!(key = %key, error = %e, "Redis lock failed, falling back to database");
                        redis = None;
                        self.db_try_acquire(key, &owner, ttl).await?
                    }
                },
                None => self.db_try_acquire(key, &owner, ttl).await?,
            };

            if let Some(guard) = guard {
                debug!(key = %key, owner = %owner, attempt = attempt, "Lock acquired");
                return Ok(guard);
            }

            metrics::record_lock_conflict(key);
            debug!(key = %key, attempt = attempt, "Lock contended");
            if attempt + 1 < self.config.retry_count {
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }

        Err(OrderError::LockFailed(key.to_string()))
    }

    /// 以 SET NX PX 在 Redis 上竞争一次
    ///
    /// 返回 None 表示锁被其他持有者占用；传输错误交由调用方降级处理。
    async fn redis_try_acquire(
        &self,
        client: &RedisClient,
        key: &str,
        owner: &str,
        ttl: Duration,
    ) -> redis::RedisResult<Option<LockGuard>> {
        let mut conn = client.get_multiplexed_async_connection().await?;

        // NX: 仅当 key 不存在时写入; PX: 毫秒级过期
        let outcome: Option<String> = redis::cmd("SET")
            .arg(format!("lock:{}", key))
            .arg(owner)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await?;

        Ok(outcome.map(|_| {
            LockGuard::held(
                key.to_string(),
                owner.to_string(),
                LockBackend::Redis(client.clone()),
            )
        }))
    }

    /// 在 distributed_locks 表上竞争一次
    ///
    /// 单条 upsert 完成获取：行不存在时插入，行已过期时接管 owner，
    /// 行未过期时不修改任何内容，rows_affected 为 0 即竞争失败。
    async fn db_try_acquire(
        &self,
        key: &str,
        owner: &str,
        ttl: Duration,
    ) -> Result<Option<LockGuard>> {
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl).map_err(|e| OrderError::Internal(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO distributed_locks (lock_key, owner_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (lock_key) DO UPDATE
                SET owner_id = EXCLUDED.owner_id, expires_at = EXCLUDED.expires_at
                WHERE distributed_locks.expires_at < NOW()
            "#,
        )
        .bind(key)
        .bind(owner)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(LockGuard::held(
            key.to_string(),
            owner.to_string(),
            LockBackend::Database(self.pool.clone()),
        )))
    }
}

enum LockBackend {
    Redis(RedisClient),
    Database(PgPool),
}

/// 锁守卫
///
/// 持有锁的 RAII 包装器。Drop 无法执行异步释放，只会记录警告并
/// 依赖 TTL 过期兜底，临界区结束后应调用 `release()` 显式释放。
pub struct LockGuard {
    key: String,
    owner: String,
    backend: LockBackend,
    /// 已显式释放的标记，抑制 Drop 时的警告
    released: bool,
}

impl LockGuard {
    fn held(key: String, owner: String, backend: LockBackend) -> Self {
        Self {
            key,
            owner,
            backend,
            released: false,
        }
    }

    /// 锁的 key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 锁的 owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// 显式释放锁
    #[instrument(skip(self))]
    pub async fn release(mut self) -> Result<()> {
        self.released = true;

        let removed = match &self.backend {
            LockBackend::Redis(client) => {
                let mut conn = client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| OrderError::LockFailed(e.to_string()))?;

                let deleted: i32 = redis::Script::new(RELEASE_SCRIPT)
                    .key(format!("lock:{}", self.key))
                    .arg(&self.owner)
                    .invoke_async(&mut conn)
                    .await
                    .map_err(|e| OrderError::LockFailed(e.to_string()))?;
                deleted > 0
            }
            LockBackend::Database(pool) => {
                let result = sqlx::query(
                    r#"DELETE FROM distributed_locks WHERE lock_key = $1 AND owner_id = $2"#,
                )
                .bind(&self.key)
                .bind(&self.owner)
                .execute(pool)
                .await?;
                result.rows_affected() > 0
            }
        };

        if removed {
            debug!(key = %self.key, "Lock released");
        } else {
            // 锁已过期或被其他持有者接管
            warn!(
                key = %self.key,
                owner = %self.owner,
                "Lock was already released or taken over"
            );
        }

        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                lock_key = %self.key,
                owner = %self.owner,
                "LockGuard dropped without explicit release - lock will expire via TTL"
            );
        }
    }
}
