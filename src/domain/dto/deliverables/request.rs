use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

/// 마감일을 생략하면 생성 시점 + 7일
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeliverableRequest {
    #[validate(length(min = 1, max = 200, message = "Le nom du livrable est obligatoire"))]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Le projet est obligatoire"))]
    pub project_id: String,

    #[validate(length(min = 1, message = "Le groupe est obligatoire"))]
    pub group_id: String,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvaluateDeliverableRequest {
    #[validate(
        required(message = "La note est obligatoire"),
        range(min = 0.0, max = 20.0, message = "La note doit être comprise entre 0 et 20")
    )]
    pub note: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000, message = "Le commentaire est trop long"))]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_evaluation_note_bounds() {
        let evaluate = |body| serde_json::from_value::<EvaluateDeliverableRequest>(body).unwrap();

        assert!(evaluate(json!({ "note": 15.5, "comments": "Bon travail" })).validate().is_ok());
        assert!(evaluate(json!({ "note": 0 })).validate().is_ok());
        assert!(evaluate(json!({ "note": 20.5 })).validate().is_err());
        assert!(evaluate(json!({ "note": -1 })).validate().is_err());
        assert!(evaluate(json!({ "comments": "sans note" })).validate().is_err());
    }

    #[test]
    fn test_create_requires_links() {
        let request: CreateDeliverableRequest = serde_json::from_value(json!({
            "name": "Rapport final",
            "project_id": "",
            "group_id": "g1",
        }))
        .unwrap();
        assert!(request.validate().is_err());
        assert!(request.due_date.is_none());
    }
}
