//! 사용자 리포지토리 (Redis 캐싱 포함)

pub mod user_repo;

pub use user_repo::UserRepository;
