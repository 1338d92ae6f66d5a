//! 비즈니스 로직 계층
//!
//! 모든 서비스는 `#[service]` 싱글톤이며 `Arc<T>` 필드로 선언한 리포지토리/서비스가
//! `ServiceLocator`를 통해 주입됩니다. 서비스 사이 의존은 한 방향으로만 흐릅니다.
//!
//! ```text
//! auth ─► users ─► files
//!  └────► notifications (email)
//! student ─► tasks, deliverables ─► files, email
//! admin ─► users
//! ```

pub mod auth;
pub mod deliverables;
pub mod files;
pub mod groups;
pub mod messaging;
pub mod notifications;
pub mod projects;
pub mod users;
