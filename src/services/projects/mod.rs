pub mod project_service;
pub mod task_service;

pub use project_service::ProjectService;
pub use task_service::TaskService;
