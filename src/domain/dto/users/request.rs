use serde::Deserialize;
use validator::Validate;

use crate::domain::dto::auth::request::validate_role;
use crate::utils::string_utils::deserialize_optional_string;

/// 관리자/교수의 사용자 부분 수정. 비어 있는 필드는 변경하지 않음
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 100, message = "Le nom est trop long"))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 100, message = "Le prénom est trop long"))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub faculty: Option<String>,

    #[serde(default)]
    pub departments: Option<Vec<String>>,

    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub level: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub field_of_study: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub specialty: Option<String>,
}

/// 본인 프로필 수정
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 100, message = "Le nom est trop long"))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 100, message = "Le prénom est trop long"))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub faculty: Option<String>,

    #[serde(default)]
    pub departments: Option<Vec<String>>,
}

impl From<UpdateProfileRequest> for UpdateUserRequest {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            last_name: request.last_name,
            first_name: request.first_name,
            phone: request.phone,
            faculty: request.faculty,
            departments: request.departments,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, message = "Le mot-clé est obligatoire"))]
    pub keyword: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_fields_mean_unchanged() {
        let request: UpdateUserRequest = serde_json::from_value(json!({
            "last_name": "",
            "first_name": "Awa",
            "is_active": false,
        }))
        .unwrap();

        assert!(request.last_name.is_none());
        assert_eq!(request.first_name.as_deref(), Some("Awa"));
        assert_eq!(request.is_active, Some(false));
        assert!(request.departments.is_none());
    }

    #[test]
    fn test_profile_update_never_touches_status() {
        let profile = UpdateProfileRequest {
            phone: Some("0600000000".into()),
            ..Default::default()
        };
        let update = UpdateUserRequest::from(profile);
        assert_eq!(update.phone.as_deref(), Some("0600000000"));
        assert!(update.is_active.is_none());
    }

    #[test]
    fn test_change_role_validation() {
        assert!(ChangeRoleRequest { role: "admin".into() }.validate().is_ok());
        assert!(ChangeRoleRequest { role: "ROLE_ETUDIANT".into() }.validate().is_ok());
        assert!(ChangeRoleRequest { role: "invité".into() }.validate().is_err());
    }
}
