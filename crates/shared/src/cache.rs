//! Redis 缓存封装
//!
//! 目录类数据（产品、经销商）读多写少，以 JSON 序列化后短 TTL 缓存。
//! 缓存不可用时调用方自行回退数据源，这里只负责读写本身。

use crate::config::RedisConfig;
use crate::error::{Result, SharedError};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{info, instrument};

/// Redis 缓存，值以 JSON 序列化存取
#[derive(Clone)]
pub struct Cache {
    client: Client,
}

impl Cache {
    /// 解析连接串，连接在首次操作时惰性建立
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        info!("Redis client created");
        Ok(Self { client })
    }

    async fn get_conn(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(SharedError::from)
    }

    /// 就绪检查，执行一次 PING
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(SharedError::from)
    }

    /// 读取并反序列化缓存值，key 不存在时返回 None
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.get_conn().await?;
        let raw: Option<String> = conn.get(key).await?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| SharedError::Internal(format!("缓存值解析失败 key={}: {}", key, e)))
        })
        .transpose()
    }

    /// 序列化并写入缓存值，带过期时间
    #[instrument(skip(self, value))]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| SharedError::Internal(format!("缓存值序列化失败 key={}: {}", key, e)))?;

        let mut conn = self.get_conn().await?;
        let _: () = conn.set_ex(key, json, ttl.as_secs()).await?;
        Ok(())
    }
}

/// 缓存键生成器
///
/// 目录缓存的 key 统一在这里拼接，避免各处手写字符串不一致。
pub struct CacheKey;

impl CacheKey {
    pub fn products() -> String {
        "catalog:products".to_string()
    }

    pub fn products_by_type(product_type: &str) -> String {
        format!("catalog:products:type:{}", product_type)
    }

    pub fn dealers() -> String {
        "catalog:dealers".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_generation() {
        assert_eq!(CacheKey::products(), "catalog:products");
        assert_eq!(
            CacheKey::products_by_type("cement"),
            "catalog:products:type:cement"
        );
        assert_eq!(CacheKey::dealers(), "catalog:dealers");
    }
}
