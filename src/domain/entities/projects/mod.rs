pub mod project;
pub mod task;

pub use project::{Project, ProjectStats, ProjectStatus};
pub use task::{Priority, Task, TaskStatus};
