//! # Core
//!
//! 싱글톤 컴포넌트 레지스트리입니다.
//!
//! `#[service]` / `#[repository]` 매크로가 생성하는 코드는 이 모듈의
//! [`registry::ServiceLocator`], [`registry::Service`], [`registry::Repository`]를
//! 절대 경로(`crate::core::registry`)로 참조하므로 경로를 바꾸지 마세요.
//!
//! | 구성 요소 | 역할 |
//! |-----------|------|
//! | `ServiceLocator` | 타입 기반 인스턴스 조회 및 지연 생성 |
//! | `ServiceRegistration` / `RepositoryRegistration` | `inventory` 컴파일 타임 등록 항목 |
//! | `Service` / `Repository` | 매크로가 구현하는 메타데이터 trait |

pub mod registry;

pub use registry::*;
