//! Redis 캐시 계층
//!
//! 리프레시 토큰, 로그아웃 블랙리스트, 사용자 조회 캐시를 저장합니다.
//! 값은 JSON 문자열로 직렬화됩니다.
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
