//! 요청 문자열 정리 유틸리티

use serde::Deserialize;

use crate::errors::AppError;

/// 앞뒤 공백을 제거한 필수 문자열, 비어 있으면 `ValidationError`
pub fn require_text(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!(
            "Le champ '{}' est obligatoire",
            field_name
        )));
    }
    Ok(trimmed.to_string())
}

/// 공백뿐인 값은 `None`으로 취급
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// 부분 수정 DTO용: `""`/`"   "`/`null`은 "변경 없음"으로 역직렬화
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 업로드 파일명에서 경로 구분자와 제어 문자를 제거
///
/// 결과가 비면 `"fichier"`를 반환합니다.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        "fichier".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("  Projet A ", "nom").unwrap(), "Projet A");
        assert!(matches!(require_text(" \t", "nom"), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  L3 ".to_string())), Some("L3".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            nom: Option<String>,
        }

        let patch: Patch = serde_json::from_str(r#"{"nom": "  Dupont "}"#).unwrap();
        assert_eq!(patch.nom.as_deref(), Some("Dupont"));

        let patch: Patch = serde_json::from_str(r#"{"nom": "  "}"#).unwrap();
        assert_eq!(patch.nom, None);

        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.nom, None);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Univ.FR "), "alice@univ.fr");
    }

    #[test]
    fn test_sanitize_file_name_strips_paths() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\rapport final.pdf"), "rapport final.pdf");
        assert_eq!(sanitize_file_name("a:b?.txt"), "a_b_.txt");
        assert_eq!(sanitize_file_name(".."), "fichier");
        assert_eq!(sanitize_file_name(""), "fichier");
    }
}
