//! 애플리케이션 설정
//!
//! `.env.dev` / `.env.prod`(`PROFILE`에 따라 선택)에서 로드된 환경 변수를
//! 타입이 있는 접근자로 노출합니다. 모든 접근자는 호출 시점에 환경 변수를 읽습니다.

pub mod auth_config;
pub mod data_config;
pub mod mail_config;

pub use auth_config::*;
pub use data_config::*;
pub use mail_config::*;
