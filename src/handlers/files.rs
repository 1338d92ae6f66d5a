//! 파일 다운로드 (`/api/fichiers/{name}`)
//!
//! `/uploads/{name}`은 `actix_files::Files`가 그대로 서빙하고, 이 핸들러는
//! `Content-Disposition: attachment`로 내려줍니다.

use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, web};

use crate::{errors::AppError, services::files::FileStorageService};

/// 저장 이름 `{uuid}_{원본}`에서 원본 이름 부분
fn download_name(stored_name: &str) -> &str {
    stored_name
        .split_once('_')
        .map(|(_, original)| original)
        .filter(|original| !original.is_empty())
        .unwrap_or(stored_name)
}

#[get("/{name}")]
pub async fn download(name: web::Path<String>) -> Result<NamedFile, AppError> {
    let path = FileStorageService::instance().resolve(&name)?;

    let file = NamedFile::open_async(&path).await.map_err(|e| {
        log::debug!("파일 열기 실패 - {}: {}", path.display(), e);
        AppError::NotFound(format!("Fichier introuvable : {}", name))
    })?;

    Ok(file.set_content_disposition(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(download_name(&name).to_string())],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_name_strips_uuid_prefix() {
        assert_eq!(
            download_name("3f2b8c1e-0000-4000-8000-000000000000_rapport_final.pdf"),
            "rapport_final.pdf"
        );
        assert_eq!(download_name("sans-prefixe.pdf"), "sans-prefixe.pdf");
        assert_eq!(download_name("abc_"), "abc_");
    }
}
