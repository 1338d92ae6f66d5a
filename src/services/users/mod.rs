pub mod admin_service;
pub mod student_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use student_service::StudentService;
pub use user_service::UserService;
