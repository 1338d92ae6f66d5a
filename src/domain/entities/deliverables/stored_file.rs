use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// 업로드되어 `uploads/` 아래에 저장된 파일 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    /// 원본 파일명
    pub name: String,
    /// `/uploads/{uuid}_{name}`
    pub url: String,
    pub size: i64,
    pub file_type: String,
    pub uploaded_at: DateTime,
}

impl StoredFile {
    pub fn new(name: String, url: String, size: i64) -> Self {
        let file_type = Self::detect_type(&name);
        Self {
            name,
            url,
            size,
            file_type,
            uploaded_at: DateTime::now(),
        }
    }

    /// 확장자로 파일 분류
    pub fn detect_type(name: &str) -> String {
        let extension = match name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
            _ => return "unknown".to_string(),
        };

        match extension.as_str() {
            "pdf" => "pdf",
            "doc" | "docx" => "document",
            "zip" | "rar" | "7z" => "archive",
            "jpg" | "jpeg" | "png" | "gif" => "image",
            "txt" => "text",
            "xls" | "xlsx" => "excel",
            other => return other.to_string(),
        }
        .to_string()
    }

    /// `512 B`, `1.5 KB`, `2.0 MB`
    pub fn formatted_size(&self) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = 1024.0 * 1024.0;

        let size = self.size.max(0) as f64;
        if size < KB {
            format!("{} B", self.size.max(0))
        } else if size < MB {
            format!("{:.1} KB", size / KB)
        } else {
            format!("{:.1} MB", size / MB)
        }
    }

    /// URL의 마지막 경로 조각 (디스크상의 파일명)
    pub fn stored_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_type() {
        assert_eq!(StoredFile::detect_type("rapport.PDF"), "pdf");
        assert_eq!(StoredFile::detect_type("cv.docx"), "document");
        assert_eq!(StoredFile::detect_type("code.7z"), "archive");
        assert_eq!(StoredFile::detect_type("photo.jpeg"), "image");
        assert_eq!(StoredFile::detect_type("notes.txt"), "text");
        assert_eq!(StoredFile::detect_type("budget.xlsx"), "excel");
        assert_eq!(StoredFile::detect_type("schema.sql"), "sql");
        assert_eq!(StoredFile::detect_type("Makefile"), "unknown");
        assert_eq!(StoredFile::detect_type(""), "unknown");
    }

    #[test]
    fn test_formatted_size() {
        let mut file = StoredFile::new("a.pdf".into(), "/uploads/x_a.pdf".into(), 512);
        assert_eq!(file.formatted_size(), "512 B");

        file.size = 1536;
        assert_eq!(file.formatted_size(), "1.5 KB");

        file.size = 2 * 1024 * 1024;
        assert_eq!(file.formatted_size(), "2.0 MB");
    }

    #[test]
    fn test_stored_name() {
        let file = StoredFile::new("a.pdf".into(), "/uploads/123_a.pdf".into(), 1);
        assert_eq!(file.stored_name(), "123_a.pdf");
        assert_eq!(file.file_type, "pdf");
    }
}
