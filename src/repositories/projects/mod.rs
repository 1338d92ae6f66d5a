pub mod project_repo;
pub mod task_repo;

pub use project_repo::ProjectRepository;
pub use task_repo::TaskRepository;
