//! BSON ↔ chrono 날짜 변환
//!
//! 엔티티는 `bson::DateTime`으로 저장하고, API 요청/응답은 RFC 3339 문자열
//! (`chrono::DateTime<Utc>`)을 사용합니다.

use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::DateTime;

pub fn to_chrono(value: DateTime) -> ChronoDateTime<Utc> {
    ChronoDateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

pub fn from_chrono(value: ChronoDateTime<Utc>) -> DateTime {
    DateTime::from_millis(value.timestamp_millis())
}

pub fn opt_to_chrono(value: Option<DateTime>) -> Option<ChronoDateTime<Utc>> {
    value.map(to_chrono)
}

/// `now`에서 `duration`만큼 지난 시각
pub fn add_duration(now: DateTime, duration: chrono::Duration) -> DateTime {
    DateTime::from_millis(now.timestamp_millis() + duration.num_milliseconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_millisecond_precision() {
        let original = DateTime::from_millis(1_717_171_717_123);
        assert_eq!(from_chrono(to_chrono(original)), original);
    }

    #[test]
    fn test_add_duration() {
        let start = DateTime::from_millis(0);
        let later = add_duration(start, chrono::Duration::days(7));
        assert_eq!(later.timestamp_millis(), 7 * 24 * 3600 * 1000);
    }
}
