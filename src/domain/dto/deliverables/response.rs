use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::Serialize;

use crate::domain::entities::deliverables::{Deliverable, DeliverableStatus, Evaluation, StoredFile};
use crate::utils::time_utils::{opt_to_chrono, to_chrono};

#[derive(Debug, Clone, Serialize)]
pub struct StoredFileResponse {
    pub name: String,
    pub url: String,
    pub size: i64,
    pub formatted_size: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<StoredFile> for StoredFileResponse {
    fn from(file: StoredFile) -> Self {
        let formatted_size = file.formatted_size();
        Self {
            name: file.name,
            url: file.url,
            size: file.size,
            formatted_size,
            file_type: file.file_type,
            uploaded_at: to_chrono(file.uploaded_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResponse {
    pub note: Option<f64>,
    pub comments: Option<String>,
    pub appreciation: &'static str,
    pub evaluated_at: DateTime<Utc>,
    pub evaluator_id: String,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            appreciation: evaluation.appreciation(),
            note: evaluation.note,
            comments: evaluation.comments,
            evaluated_at: to_chrono(evaluation.evaluated_at),
            evaluator_id: evaluation.evaluator_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliverableResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub file: Option<StoredFileResponse>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    pub project_id: String,
    pub group_id: String,
    pub status: DeliverableStatus,
    pub evaluation: Option<EvaluationResponse>,
    pub evaluations: Vec<EvaluationResponse>,
    pub created_at: DateTime<Utc>,
    pub late: bool,
}

impl From<Deliverable> for DeliverableResponse {
    fn from(deliverable: Deliverable) -> Self {
        let late = deliverable.is_late(bson::DateTime::now());
        Self {
            id: deliverable.id_string().unwrap_or_default(),
            name: deliverable.name,
            description: deliverable.description,
            file: deliverable.file.map(StoredFileResponse::from),
            submitted_at: opt_to_chrono(deliverable.submitted_at),
            due_date: to_chrono(deliverable.due_date),
            project_id: deliverable.project_id,
            group_id: deliverable.group_id,
            status: deliverable.status,
            evaluation: deliverable.evaluation.map(EvaluationResponse::from),
            evaluations: deliverable
                .evaluations
                .into_iter()
                .map(EvaluationResponse::from)
                .collect(),
            created_at: to_chrono(deliverable.created_at),
            late,
        }
    }
}

/// 학생에게 보여주는 평가 코멘트
#[derive(Debug, Serialize)]
pub struct DeliverableCommentsResponse {
    pub deliverable_id: String,
    pub status: DeliverableStatus,
    pub current: Option<EvaluationResponse>,
    pub history: Vec<EvaluationResponse>,
}

impl From<Deliverable> for DeliverableCommentsResponse {
    fn from(deliverable: Deliverable) -> Self {
        Self {
            deliverable_id: deliverable.id_string().unwrap_or_default(),
            status: deliverable.status,
            current: deliverable.evaluation.map(EvaluationResponse::from),
            history: deliverable
                .evaluations
                .into_iter()
                .map(EvaluationResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_response_formats_size() {
        let file = StoredFile::new("rapport.pdf".into(), "/uploads/abc_rapport.pdf".into(), 2048);
        let response = StoredFileResponse::from(file);
        assert_eq!(response.formatted_size, "2.0 KB");
        assert_eq!(response.file_type, "pdf");
    }

    #[test]
    fn test_evaluation_response_carries_appreciation() {
        let evaluation = Evaluation::new(Some(14.5), Some("Clair".into()), "prof".into());
        let response = EvaluationResponse::from(evaluation);
        assert_eq!(response.appreciation, "Bien");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["note"], 14.5);
    }
}
