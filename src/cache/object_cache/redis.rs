use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult, aio::MultiplexedConnection};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const SCAN_BATCH: usize = 200;

/// Redis 缓存，所有键带统一前缀，复用一条多路复用连接
pub struct RedisObjectCache {
    client: redis::Client,
    conn: Mutex<Option<MultiplexedConnection>>,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时探测一次，失败则由启动流程回退到内存缓存
        let mut probe = client
            .get_connection_with_timeout(CONNECT_TIMEOUT)
            .map_err(|e| format!("Redis unreachable at {}: {e}", redis_config.url))?;
        redis::cmd("PING")
            .query::<String>(&mut probe)
            .map_err(|e| format!("Redis ping failed: {e}"))?;

        debug!(
            "RedisObjectCache ready, prefix '{}', default TTL {}s",
            redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            conn: Mutex::new(None),
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> RedisResult<MultiplexedConnection> {
        if let Some(conn) = self.cached_connection() {
            return Ok(conn);
        }
        let conn = self.client.get_multiplexed_async_connection().await?;
        if let Ok(mut slot) = self.conn.lock() {
            *slot = Some(conn.clone());
        }
        Ok(conn)
    }

    fn cached_connection(&self) -> Option<MultiplexedConnection> {
        self.conn.lock().ok().and_then(|slot| slot.clone())
    }

    // 出错后丢弃连接，下次重新建立
    fn reset_connection(&self) {
        if let Ok(mut slot) = self.conn.lock() {
            *slot = None;
        }
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn effective_ttl(&self, ttl: u64) -> u64 {
        if ttl == 0 { self.default_ttl } else { ttl }
    }

    async fn clear_prefix(&self) -> RedisResult<usize> {
        let mut conn = self.connection().await?;
        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            if !keys.is_empty() {
                removed += conn.del::<_, usize>(keys).await?;
            }
            if next == 0 {
                return Ok(removed);
            }
            cursor = next;
        }
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let result: RedisResult<Option<String>> = match self.connection().await {
            Ok(mut conn) => conn.get(self.prefixed(key)).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(Some(value)) => CacheResult::Found(value),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Redis GET '{}' failed: {}", key, e);
                self.reset_connection();
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = self.effective_ttl(ttl);
        let result: RedisResult<()> = match self.connection().await {
            Ok(mut conn) => conn.set_ex(self.prefixed(&key), value, ttl).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!("Redis SETEX '{}' failed: {}", key, e);
            self.reset_connection();
        }
    }

    async fn remove(&self, key: &str) {
        let result: RedisResult<usize> = match self.connection().await {
            Ok(mut conn) => conn.del(self.prefixed(key)).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!("Redis DEL '{}' failed: {}", key, e);
            self.reset_connection();
        }
    }

    /// 只清理本应用前缀下的键，共享实例中的其他数据不受影响
    async fn invalidate_all(&self) {
        match self.clear_prefix().await {
            Ok(count) => debug!("Invalidated {} cached keys", count),
            Err(e) => {
                error!("Failed to invalidate cached keys: {}", e);
                self.reset_connection();
            }
        }
    }
}
