use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Le nom du groupe est obligatoire"))]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,

    /// 생성과 동시에 추가할 학생
    #[serde(default)]
    pub student_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 100, message = "Le nom du groupe est trop long"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_group_validation() {
        let request: CreateGroupRequest =
            serde_json::from_value(json!({ "name": "Groupe A", "student_ids": ["e1"] })).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.student_ids, vec!["e1".to_string()]);

        let blank: CreateGroupRequest = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(blank.validate().is_err());
    }
}
