//! Scolab 백엔드
//!
//! 대학 프로젝트 관리 플랫폼의 REST API 서버입니다.
//! 교수는 프로젝트와 태스크를 만들고 학생 그룹에 배정하며, 학생은 산출물을 제출하고
//! 교수는 이를 평가합니다. 그룹 메시징과 이메일 알림을 함께 제공합니다.
//!
//! # Features
//!
//! - **인증**: 이메일/비밀번호 + Google OAuth 2.0, JWT 액세스/리프레시 토큰
//! - **역할**: ETUDIANT / ENSEIGNANT / ADMIN 경로별 접근 제어
//! - **프로젝트/태스크**: 상태, 진행률, 보관, 지연 조회
//! - **산출물**: 제출 → 평가 → 수정 상태 머신, 평가 점수
//! - **그룹/메시징**: 그룹-교수 대화방, 읽음 표시
//! - **알림**: 저장형 알림 + SMTP 이메일
//! - **파일**: multipart 업로드, `/uploads` 정적 서빙
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← 역할별 스코프 + AuthMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 규칙, 권한 검사
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use scolab_backend::services::projects::ProjectService;
//!
//! let projects = ProjectService::instance().late().await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
