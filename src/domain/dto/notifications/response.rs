use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::notifications::Notification;
use crate::utils::time_utils::to_chrono;

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: notification.title,
            message: notification.message,
            created_at: to_chrono(notification.created_at),
            read: notification.read,
        }
    }
}

/// 발송 결과. 개별 실패는 로그로만 남기고 계속 진행
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchReport {
    pub recipients: usize,
    pub sent: usize,
    pub failed: usize,
}

impl DispatchReport {
    pub fn record(&mut self, delivered: bool) {
        self.recipients += 1;
        if delivered {
            self.sent += 1;
        } else {
            self.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_report_counts() {
        let mut report = DispatchReport::default();
        report.record(true);
        report.record(false);
        report.record(true);
        assert_eq!(
            report,
            DispatchReport {
                recipients: 3,
                sent: 2,
                failed: 1
            }
        );
    }
}
