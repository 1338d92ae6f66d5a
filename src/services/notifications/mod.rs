//! 메일 발송과 알림 배포

pub mod email_service;
pub mod email_templates;
pub mod notification_service;

pub use email_service::EmailService;
pub use email_templates::EmailTemplate;
pub use notification_service::NotificationService;
