use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::DatabaseConfig;

/// 자동 재연결되는 멀티플렉스 연결을 공유하는 Redis 클라이언트
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

fn json_error(description: &'static str, e: serde_json::Error) -> RedisError {
    RedisError::from((redis::ErrorKind::TypeError, description, e.to_string()))
}

impl RedisClient {
    pub async fn new() -> Result<Self, RedisError> {
        let client = Client::open(DatabaseConfig::redis_url())?;
        let mut manager = ConnectionManager::new(client).await?;

        redis::cmd("PING").query_async::<()>(&mut manager).await?;
        log::info!("✅ Redis 연결 성공");

        Ok(Self { manager })
    }

    fn conn(&self) -> ConnectionManager {
        self.manager.clone()
    }

    /// JSON으로 저장된 값 조회
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RedisError> {
        match self.get_string(key).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| json_error("Deserialization failed", e)),
            None => Ok(None),
        }
    }

    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), RedisError> {
        let json = serde_json::to_string(value).map_err(|e| json_error("Serialization failed", e))?;
        self.setex(key, seconds, &json).await
    }

    /// 원시 문자열 저장 (TTL 포함)
    pub async fn setex(&self, key: &str, seconds: u64, value: &str) -> Result<(), RedisError> {
        self.conn().set_ex(key, value, seconds).await
    }

    pub async fn get_string(&self, key: &str) -> Result<Option<String>, RedisError> {
        self.conn().get(key).await
    }

    pub async fn exists(&self, key: &str) -> Result<bool, RedisError> {
        self.conn().exists(key).await
    }

    pub async fn del(&self, key: &str) -> Result<(), RedisError> {
        self.conn().del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        self.conn().del(keys).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, RedisError> {
        self.conn().keys(pattern).await
    }
}
