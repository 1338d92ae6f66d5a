use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

pub const MIN_NOTE: f64 = 0.0;
pub const MAX_NOTE: f64 = 20.0;

/// 교수의 산출물 평가 (0 ~ 20점)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub note: Option<f64>,
    pub comments: Option<String>,
    pub evaluated_at: DateTime,
    pub evaluator_id: String,
}

impl Evaluation {
    pub fn new(note: Option<f64>, comments: Option<String>, evaluator_id: String) -> Self {
        Self {
            note,
            comments,
            evaluated_at: DateTime::now(),
            evaluator_id,
        }
    }

    /// 점수가 있고 0 이상 20 이하
    pub fn is_valid(&self) -> bool {
        self.note
            .map(|note| (MIN_NOTE..=MAX_NOTE).contains(&note))
            .unwrap_or(false)
    }

    pub fn appreciation(&self) -> &'static str {
        match self.note {
            None => "Non évalué",
            Some(note) if note >= 16.0 => "Très bien",
            Some(note) if note >= 14.0 => "Bien",
            Some(note) if note >= 12.0 => "Assez bien",
            Some(note) if note >= 10.0 => "Passable",
            Some(_) => "Insuffisant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_note(note: Option<f64>) -> Evaluation {
        Evaluation::new(note, None, "prof".into())
    }

    #[test]
    fn test_validity_bounds() {
        assert!(with_note(Some(0.0)).is_valid());
        assert!(with_note(Some(20.0)).is_valid());
        assert!(with_note(Some(12.5)).is_valid());
        assert!(!with_note(Some(-0.5)).is_valid());
        assert!(!with_note(Some(20.01)).is_valid());
        assert!(!with_note(None).is_valid());
    }

    #[test]
    fn test_appreciation_bands() {
        assert_eq!(with_note(Some(18.0)).appreciation(), "Très bien");
        assert_eq!(with_note(Some(16.0)).appreciation(), "Très bien");
        assert_eq!(with_note(Some(15.9)).appreciation(), "Bien");
        assert_eq!(with_note(Some(12.0)).appreciation(), "Assez bien");
        assert_eq!(with_note(Some(10.0)).appreciation(), "Passable");
        assert_eq!(with_note(Some(9.99)).appreciation(), "Insuffisant");
        assert_eq!(with_note(None).appreciation(), "Non évalué");
    }
}
