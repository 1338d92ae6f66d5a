//! 데이터 저장소, 서버 및 환경 설정
//!
//! 모든 값은 환경 변수에서 읽고, 없으면 개발용 기본값을 사용합니다.

use std::env;

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 환경 변수 기준 (미설정 시 Production)
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// bcrypt 해싱 비용 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// `BCRYPT_COST`(4~15)가 유효하면 그 값을, 아니면 환경별 기본값을 사용
    pub fn bcrypt_cost() -> u32 {
        env::var("BCRYPT_COST")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(&Environment::current()))
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development | Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        parse_env("PORT", 8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    pub fn workers() -> usize {
        parse_env("SERVER_WORKERS", 4)
    }

    /// CORS 허용 Origin 목록 (쉼표 구분)
    pub fn allowed_origins() -> Vec<String> {
        env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

pub struct DatabaseConfig;

impl DatabaseConfig {
    pub fn mongodb_uri() -> String {
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    pub fn database_name() -> String {
        env::var("DATABASE_NAME").unwrap_or_else(|_| "scolab_dev".to_string())
    }

    pub fn redis_url() -> String {
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// 사용자 조회 캐시 TTL (초)
    pub fn cache_ttl_seconds() -> u64 {
        parse_env("CACHE_TTL_SECONDS", 600)
    }
}

/// actix-governor 요청 제한 설정
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            per_second: parse_env("RATE_LIMIT_PER_SECOND", 100),
            burst_size: parse_env("RATE_LIMIT_BURST_SIZE", 200),
        }
    }
}

/// 업로드 파일 저장소 설정
pub struct StorageConfig;

impl StorageConfig {
    pub fn upload_dir() -> String {
        env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string())
    }

    pub fn max_upload_bytes() -> usize {
        parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("dev"), Environment::Development);
        assert_eq!(Environment::from_str("TESTING"), Environment::Test);
        assert_eq!(Environment::from_str("stage"), Environment::Staging);
        assert_eq!(Environment::from_str("anything"), Environment::Production);
        assert_eq!(Environment::from_str("prod"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_parse_env_falls_back_on_garbage() {
        assert_eq!(parse_env("SCOLAB_TEST_SURELY_UNSET_VARIABLE", 17u16), 17);
    }

    #[test]
    fn test_defaults_when_unset() {
        if env::var("UPLOAD_DIR").is_err() {
            assert_eq!(StorageConfig::upload_dir(), "uploads");
        }
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }
        if env::var("CORS_ALLOWED_ORIGINS").is_err() {
            assert_eq!(ServerConfig::allowed_origins().len(), 2);
        }
    }
}
