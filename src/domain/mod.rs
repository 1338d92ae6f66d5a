//! # Domain Layer
//!
//! ```text
//! domain/
//! ├── entities/  - MongoDB에 저장되는 문서와 상태 전이 규칙
//! ├── dto/       - HTTP 요청/응답 계약 (validator 검증 포함)
//! └── models/    - 저장되지 않는 인증/OAuth/토큰 모델
//! ```
//!
//! 엔티티는 `bson::DateTime`을, 응답 DTO는 `chrono::DateTime<Utc>`를 사용하며
//! 변환은 [`crate::utils::time_utils`]에서 담당합니다. 상태 전이(산출물, 태스크)와
//! 진행률 계산 같은 순수 규칙은 엔티티 메서드로 두어 저장소 없이 테스트합니다.

pub mod dto;
pub mod entities;
pub mod models;
