//! MongoDB 문서 엔티티
//!
//! 모든 엔티티는 `_id: Option<ObjectId>`를 가지며, 다른 문서 참조는 16진수 ID 문자열로 보관합니다.

pub mod deliverables;
pub mod groups;
pub mod messaging;
pub mod notifications;
pub mod projects;
pub mod tokens;
pub mod users;

pub use deliverables::*;
pub use groups::*;
pub use messaging::*;
pub use notifications::*;
pub use projects::*;
pub use tokens::*;
pub use users::*;
