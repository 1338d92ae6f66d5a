//! 산출물(livrable) 엔티티와 상태 전이
//!
//! ```text
//! A_SOUMETTRE ─submit─► SOUMIS ─evaluate─► EVALUE ─start_correction─► EN_CORRECTION
//!                        ▲  │                                            │    │
//!                        └──┘ resubmit                      evaluate ◄───┘    └─mark_corrected─► CORRIGE
//! (any) ─reject─► REJETE
//! ```

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::evaluation::Evaluation;
use super::stored_file::StoredFile;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliverableStatus {
    ASoumettre,
    Soumis,
    EnCorrection,
    Corrige,
    Evalue,
    Rejete,
}

impl Default for DeliverableStatus {
    fn default() -> Self {
        DeliverableStatus::ASoumettre
    }
}

impl DeliverableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliverableStatus::ASoumettre => "A_SOUMETTRE",
            DeliverableStatus::Soumis => "SOUMIS",
            DeliverableStatus::EnCorrection => "EN_CORRECTION",
            DeliverableStatus::Corrige => "CORRIGE",
            DeliverableStatus::Evalue => "EVALUE",
            DeliverableStatus::Rejete => "REJETE",
        }
    }
}

/// 허용되지 않는 상태 전이
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("Le livrable ne peut plus être soumis (statut actuel : {0:?})")]
    NotSubmittable(DeliverableStatus),

    #[error("La date limite de soumission est dépassée")]
    PastDue,

    #[error("Le livrable doit être soumis ou en correction pour être évalué (statut actuel : {0:?})")]
    NotEvaluable(DeliverableStatus),

    #[error("Aucun fichier n'a été soumis pour ce livrable")]
    MissingSubmission,

    #[error("La note doit être comprise entre 0 et 20")]
    InvalidNote,

    #[error("Seul un livrable évalué peut être renvoyé en correction")]
    NotEvaluated,

    #[error("Seul un livrable en correction peut être marqué corrigé")]
    NotInCorrection,
}

impl From<TransitionError> for AppError {
    fn from(error: TransitionError) -> Self {
        AppError::ValidationError(error.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deliverable {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub file: Option<StoredFile>,
    pub submitted_at: Option<DateTime>,
    pub due_date: DateTime,
    pub project_id: String,
    pub group_id: String,
    #[serde(default)]
    pub status: DeliverableStatus,
    /// 가장 최근 평가
    pub evaluation: Option<Evaluation>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
    pub created_at: DateTime,
}

impl Deliverable {
    pub fn new(name: String, project_id: String, group_id: String, due_date: DateTime) -> Self {
        Self {
            id: None,
            name,
            description: None,
            file: None,
            submitted_at: None,
            due_date,
            project_id,
            group_id,
            status: DeliverableStatus::ASoumettre,
            evaluation: None,
            evaluations: Vec::new(),
            created_at: DateTime::now(),
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 마감일이 지났고 아직 제출 단계(A_SOUMETTRE/SOUMIS)에 있음
    pub fn is_late(&self, now: DateTime) -> bool {
        self.due_date < now
            && matches!(
                self.status,
                DeliverableStatus::ASoumettre | DeliverableStatus::Soumis
            )
    }

    /// 파일 제출 (재제출 허용). 교체된 이전 파일을 돌려줌
    pub fn submit(
        &mut self,
        file: StoredFile,
        now: DateTime,
    ) -> Result<Option<StoredFile>, TransitionError> {
        if !matches!(
            self.status,
            DeliverableStatus::ASoumettre | DeliverableStatus::Soumis
        ) {
            return Err(TransitionError::NotSubmittable(self.status));
        }
        if self.due_date < now {
            return Err(TransitionError::PastDue);
        }

        let previous = self.file.replace(file);
        self.submitted_at = Some(now);
        self.status = DeliverableStatus::Soumis;
        Ok(previous)
    }

    pub fn evaluate(&mut self, evaluation: Evaluation) -> Result<(), TransitionError> {
        if !matches!(
            self.status,
            DeliverableStatus::Soumis | DeliverableStatus::EnCorrection
        ) {
            return Err(TransitionError::NotEvaluable(self.status));
        }
        if self.file.is_none() || self.submitted_at.is_none() {
            return Err(TransitionError::MissingSubmission);
        }
        if !evaluation.is_valid() {
            return Err(TransitionError::InvalidNote);
        }

        self.evaluations.push(evaluation.clone());
        self.evaluation = Some(evaluation);
        self.status = DeliverableStatus::Evalue;
        Ok(())
    }

    pub fn start_correction(&mut self) -> Result<(), TransitionError> {
        if self.status != DeliverableStatus::Evalue {
            return Err(TransitionError::NotEvaluated);
        }
        self.status = DeliverableStatus::EnCorrection;
        Ok(())
    }

    pub fn mark_corrected(&mut self) -> Result<(), TransitionError> {
        if self.status != DeliverableStatus::EnCorrection {
            return Err(TransitionError::NotInCorrection);
        }
        self.status = DeliverableStatus::Corrige;
        Ok(())
    }

    /// 어떤 상태에서든 거절 가능. 제출 파일과 제출 시각을 비우고 비운 파일을 돌려줌
    pub fn reject(&mut self) -> Option<StoredFile> {
        self.status = DeliverableStatus::Rejete;
        self.submitted_at = None;
        self.file.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime {
        DateTime::from_millis(millis)
    }

    fn deliverable(due: i64) -> Deliverable {
        Deliverable::new("Rapport".into(), "p1".into(), "g1".into(), at(due))
    }

    fn file(name: &str) -> StoredFile {
        StoredFile::new(name.into(), format!("/uploads/x_{}", name), 10)
    }

    fn graded(note: f64) -> Evaluation {
        Evaluation::new(Some(note), Some("ok".into()), "prof".into())
    }

    #[test]
    fn test_submit_sets_status_and_time() {
        let mut d = deliverable(10_000);
        assert_eq!(d.submit(file("v1.pdf"), at(1_000)), Ok(None));
        assert_eq!(d.status, DeliverableStatus::Soumis);
        assert_eq!(d.submitted_at, Some(at(1_000)));
    }

    #[test]
    fn test_resubmission_replaces_file() {
        let mut d = deliverable(10_000);
        d.submit(file("v1.pdf"), at(1_000)).unwrap();
        let previous = d.submit(file("v2.pdf"), at(2_000)).unwrap();
        assert_eq!(previous.map(|f| f.name), Some("v1.pdf".to_string()));
        assert_eq!(d.file.as_ref().map(|f| f.name.as_str()), Some("v2.pdf"));
    }

    #[test]
    fn test_submit_after_due_date_is_rejected() {
        let mut d = deliverable(1_000);
        assert_eq!(d.submit(file("late.pdf"), at(2_000)), Err(TransitionError::PastDue));
        assert_eq!(d.status, DeliverableStatus::ASoumettre);
    }

    #[test]
    fn test_submit_after_evaluation_is_rejected() {
        let mut d = deliverable(10_000);
        d.submit(file("v1.pdf"), at(1_000)).unwrap();
        d.evaluate(graded(14.0)).unwrap();
        assert_eq!(
            d.submit(file("v2.pdf"), at(2_000)),
            Err(TransitionError::NotSubmittable(DeliverableStatus::Evalue))
        );
    }

    #[test]
    fn test_evaluate_requires_submission() {
        let mut d = deliverable(10_000);
        assert_eq!(
            d.evaluate(graded(12.0)),
            Err(TransitionError::NotEvaluable(DeliverableStatus::ASoumettre))
        );

        d.status = DeliverableStatus::Soumis;
        assert_eq!(d.evaluate(graded(12.0)), Err(TransitionError::MissingSubmission));
    }

    #[test]
    fn test_evaluate_rejects_out_of_range_note() {
        let mut d = deliverable(10_000);
        d.submit(file("v1.pdf"), at(1_000)).unwrap();
        assert_eq!(d.evaluate(graded(21.0)), Err(TransitionError::InvalidNote));
        assert_eq!(
            d.evaluate(Evaluation::new(None, None, "prof".into())),
            Err(TransitionError::InvalidNote)
        );
        assert_eq!(d.status, DeliverableStatus::Soumis);
    }

    #[test]
    fn test_correction_cycle_keeps_history() {
        let mut d = deliverable(10_000);
        d.submit(file("v1.pdf"), at(1_000)).unwrap();
        d.evaluate(graded(8.0)).unwrap();

        d.start_correction().unwrap();
        assert_eq!(d.status, DeliverableStatus::EnCorrection);

        d.evaluate(graded(13.0)).unwrap();
        assert_eq!(d.status, DeliverableStatus::Evalue);
        assert_eq!(d.evaluations.len(), 2);
        assert_eq!(d.evaluation.as_ref().and_then(|e| e.note), Some(13.0));
    }

    #[test]
    fn test_correction_transitions_are_guarded() {
        let mut d = deliverable(10_000);
        assert_eq!(d.start_correction(), Err(TransitionError::NotEvaluated));
        assert_eq!(d.mark_corrected(), Err(TransitionError::NotInCorrection));

        d.submit(file("v1.pdf"), at(1_000)).unwrap();
        d.evaluate(graded(11.0)).unwrap();
        d.start_correction().unwrap();
        d.mark_corrected().unwrap();
        assert_eq!(d.status, DeliverableStatus::Corrige);
    }

    #[test]
    fn test_reject_clears_submission() {
        let mut d = deliverable(10_000);
        d.submit(file("v1.pdf"), at(1_000)).unwrap();
        let removed = d.reject();
        assert_eq!(removed.map(|f| f.name), Some("v1.pdf".to_string()));
        assert_eq!(d.status, DeliverableStatus::Rejete);
        assert!(d.file.is_none());
        assert!(d.submitted_at.is_none());
    }

    #[test]
    fn test_lateness_only_while_pending() {
        let mut d = deliverable(1_000);
        assert!(d.is_late(at(2_000)));
        assert!(!d.is_late(at(500)));

        d.status = DeliverableStatus::Evalue;
        assert!(!d.is_late(at(2_000)));
    }

    #[test]
    fn test_transition_error_maps_to_validation() {
        let error: AppError = TransitionError::PastDue.into();
        assert!(matches!(error, AppError::ValidationError(_)));
    }

    #[test]
    fn test_status_tags_match_serde() {
        for status in [
            DeliverableStatus::ASoumettre,
            DeliverableStatus::Soumis,
            DeliverableStatus::EnCorrection,
            DeliverableStatus::Corrige,
            DeliverableStatus::Evalue,
            DeliverableStatus::Rejete,
        ] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
    }
}
