//! # HTTP 핸들러
//!
//! 요청 DTO를 검증하고 싱글톤 서비스를 호출한 뒤 JSON 응답을 만드는 얇은 계층입니다.
//! 비즈니스 규칙과 권한 판단(소유자 확인 등)은 서비스에 있고, 경로 단위 역할 확인은
//! [`AuthMiddleware`](crate::middlewares::AuthMiddleware)가 맡습니다.
//!
//! ```rust,ignore
//! #[get("/{id}")]
//! pub async fn get_project(id: web::Path<String>) -> Result<HttpResponse, AppError> {
//!     let project = ProjectService::instance().get(&id).await?;
//!     Ok(HttpResponse::Ok().json(project))
//! }
//! ```
//!
//! ```text
//! handlers/
//! ├── auth.rs           # /auth/**
//! ├── users.rs          # /api/utilisateurs/**
//! ├── admin.rs          # /admin/users/**, /api/admin/**
//! ├── students.rs       # /api/etudiants/**
//! ├── projects.rs       # /api/projets/**
//! ├── tasks.rs          # /api/taches/**
//! ├── teachers.rs       # /api/enseignants/**
//! ├── deliverables.rs   # /api/livrables/**
//! ├── groups.rs         # /api/groupes/**
//! ├── messaging.rs      # /api/messagerie/**
//! ├── notifications.rs  # /api/notifications/**
//! ├── files.rs          # /api/fichiers/**
//! └── upload.rs         # multipart 파일 필드 읽기
//! ```

pub mod admin;
pub mod auth;
pub mod deliverables;
pub mod files;
pub mod groups;
pub mod messaging;
pub mod notifications;
pub mod projects;
pub mod students;
pub mod tasks;
pub mod teachers;
pub mod upload;
pub mod users;
