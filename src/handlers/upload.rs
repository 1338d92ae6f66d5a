//! multipart 업로드에서 파일 필드 하나 읽기

use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::config::StorageConfig;
use crate::errors::AppError;

/// 업로드된 파일 원본 이름과 내용
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::ValidationError(format!("Requête multipart invalide : {}", e))
}

/// `field_name` 필드만 읽고 나머지 필드는 건너뜀. 크기 제한을 넘으면 즉시 중단
pub async fn read_file_field(mut payload: Multipart, field_name: &str) -> Result<UploadedFile, AppError> {
    let max_bytes = StorageConfig::max_upload_bytes();

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let Some(disposition) = field.content_disposition() else {
            continue;
        };
        if disposition.get_name() != Some(field_name) {
            continue;
        }
        let name = disposition.get_filename().unwrap_or_default().to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::ValidationError(format!(
                    "Le fichier dépasse la taille maximale autorisée ({} octets)",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(UploadedFile { name, bytes });
    }

    Err(AppError::ValidationError(format!(
        "Le champ fichier « {} » est obligatoire",
        field_name
    )))
}
