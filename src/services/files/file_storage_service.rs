//! 로컬 디스크 파일 저장소
//!
//! 업로드 파일은 `UPLOAD_DIR` 아래에 `{uuid}_{정리된 원본 파일명}`으로 저장되고
//! `/uploads/{저장 파일명}` URL로 제공됩니다.

use std::path::{Path, PathBuf};

use singleton_macro::service;
use uuid::Uuid;

use crate::{
    config::StorageConfig,
    domain::entities::deliverables::StoredFile,
    errors::{AppError, ErrorContext},
    utils::string_utils::sanitize_file_name,
};

pub const UPLOAD_URL_PREFIX: &str = "/uploads/";

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[service(name = "filestorage")]
pub struct FileStorageService {}

/// 디렉터리 탈출이 불가능한 단일 파일명인지 확인
fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains(['/', '\\'])
}

fn is_image(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

impl FileStorageService {
    fn root(&self) -> PathBuf {
        PathBuf::from(StorageConfig::upload_dir())
    }

    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, AppError> {
        self.store_at(&self.root(), original_name, bytes).await
    }

    /// 프로필 사진용. jpg/jpeg/png/gif만 허용
    pub async fn store_image(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, AppError> {
        if !is_image(original_name) {
            return Err(AppError::ValidationError(
                "Seules les images (jpg, jpeg, png, gif) sont acceptées".to_string(),
            ));
        }
        self.store(original_name, bytes).await
    }

    pub async fn delete_by_url(&self, url: &str) -> Result<bool, AppError> {
        self.delete_by_url_at(&self.root(), url).await
    }

    /// 저장 파일명에 해당하는 디스크 경로. 안전하지 않은 이름이면 `NotFound`
    pub fn resolve(&self, stored_name: &str) -> Result<PathBuf, AppError> {
        if !is_safe_name(stored_name) {
            return Err(AppError::NotFound(format!("Fichier introuvable : {}", stored_name)));
        }
        Ok(self.root().join(stored_name))
    }

    async fn store_at(&self, root: &Path, original_name: &str, bytes: &[u8]) -> Result<StoredFile, AppError> {
        if bytes.is_empty() {
            return Err(AppError::ValidationError("Le fichier est vide".to_string()));
        }
        if bytes.len() > StorageConfig::max_upload_bytes() {
            return Err(AppError::ValidationError(format!(
                "Le fichier dépasse la taille maximale autorisée ({} octets)",
                StorageConfig::max_upload_bytes()
            )));
        }

        let original_name = sanitize_file_name(original_name);
        let stored_name = format!("{}_{}", Uuid::new_v4(), original_name);

        tokio::fs::create_dir_all(root)
            .await
            .context("업로드 디렉터리 생성 실패")?;
        tokio::fs::write(root.join(&stored_name), bytes)
            .await
            .with_context(|| format!("파일 쓰기 실패: {}", stored_name))?;

        log::info!("파일 저장 - {} ({} bytes)", stored_name, bytes.len());

        Ok(StoredFile::new(
            original_name,
            format!("{}{}", UPLOAD_URL_PREFIX, stored_name),
            bytes.len() as i64,
        ))
    }

    /// 파일이 없으면 `false`
    async fn delete_by_url_at(&self, root: &Path, url: &str) -> Result<bool, AppError> {
        let name = url.strip_prefix(UPLOAD_URL_PREFIX).unwrap_or(url);
        if !is_safe_name(name) {
            log::warn!("안전하지 않은 파일 삭제 요청 무시: {}", url);
            return Ok(false);
        }

        match tokio::fs::remove_file(root.join(name)).await {
            Ok(()) => {
                log::info!("파일 삭제 - {}", name);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("파일 삭제 실패: {}", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_store_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let service = FileStorageService::instance();

        let stored = service
            .store_at(dir.path(), "../rapport final.pdf", b"%PDF-1.4")
            .await
            .unwrap();

        assert_eq!(stored.name, "rapport final.pdf");
        assert_eq!(stored.file_type, "pdf");
        assert_eq!(stored.size, 8);
        assert!(stored.url.starts_with(UPLOAD_URL_PREFIX));
        assert!(stored.stored_name().ends_with("_rapport final.pdf"));
        assert!(dir.path().join(stored.stored_name()).exists());

        assert!(service.delete_by_url_at(dir.path(), &stored.url).await.unwrap());
        assert!(!service.delete_by_url_at(dir.path(), &stored.url).await.unwrap());
    }

    #[actix_web::test]
    async fn test_empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileStorageService::instance()
            .store_at(dir.path(), "vide.txt", b"")
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_delete_refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let service = FileStorageService::instance();
        assert!(!service.delete_by_url_at(dir.path(), "/uploads/../Cargo.toml").await.unwrap());
        assert!(!service.delete_by_url_at(dir.path(), "/uploads/a/b.txt").await.unwrap());
    }

    #[test]
    fn test_image_detection() {
        assert!(is_image("photo.JPG"));
        assert!(is_image("avatar.png"));
        assert!(!is_image("cv.pdf"));
        assert!(!is_image("gif"));
    }

    #[test]
    fn test_resolve_rejects_unsafe_names() {
        let service = FileStorageService::instance();
        assert!(service.resolve("abc_rapport.pdf").is_ok());
        assert!(matches!(service.resolve("../secret"), Err(AppError::NotFound(_))));
        assert!(service.resolve("").is_err());
    }
}
