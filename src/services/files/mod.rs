pub mod file_storage_service;

pub use file_storage_service::{FileStorageService, UPLOAD_URL_PREFIX};
