use std::sync::Arc;

use singleton_macro::service;

use super::email_templates::EmailTemplate;
use crate::{
    domain::{
        dto::notifications::{
            CustomNotificationRequest, DispatchReport, NotificationResponse, ProjectNotificationRequest,
        },
        entities::{groups::Group, notifications::Notification, users::User},
    },
    errors::AppError,
    repositories::{
        groups::GroupRepository, notifications::NotificationRepository, projects::ProjectRepository,
        users::UserRepository,
    },
    services::notifications::EmailService,
    utils::time_utils::opt_to_chrono,
};

/// 메일 알림 배포와 앱 내 알림
///
/// 수신자마다 앱 내 알림을 저장한 뒤 메일을 보냅니다. 한 수신자의 실패는
/// 로그로 남기고 다음 수신자로 넘어가며, 재시도는 하지 않습니다.
#[service(name = "notification")]
pub struct NotificationService {
    user_repo: Arc<UserRepository>,
    group_repo: Arc<GroupRepository>,
    project_repo: Arc<ProjectRepository>,
    notification_repo: Arc<NotificationRepository>,
    email_service: Arc<EmailService>,
}

/// 여러 그룹에 속한 학생 ID (중복 제거, 처음 나온 순서 유지)
fn distinct_students(groups: &[Group]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in groups.iter().flat_map(|g| g.student_ids.iter()) {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

fn format_date(date: Option<chrono::DateTime<chrono::Utc>>) -> Option<String> {
    date.map(|d| d.format("%d/%m/%Y").to_string())
}

impl NotificationService {
    async fn group_students(&self, group_ids: &[String]) -> Result<Vec<User>, AppError> {
        let groups = self.group_repo.find_by_ids(group_ids).await?;
        if groups.is_empty() {
            return Err(AppError::NotFound("Aucun groupe trouvé".to_string()));
        }
        self.user_repo.find_by_ids(&distinct_students(&groups)).await
    }

    /// 앱 내 알림 저장 후 메일 발송. 둘 다 성공해야 `true`
    async fn deliver(&self, user: &User, template: &EmailTemplate<'_>, summary: String) -> bool {
        let Some(user_id) = user.id_string() else {
            return false;
        };

        let stored = match self
            .notification_repo
            .create(Notification::new(user_id, template.subject(), summary))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                log::error!("앱 내 알림 저장 실패 - to: {}, 에러: {}", user.email, e);
                false
            }
        };

        let sent = self.email_service.send_logged(&user.email, template).await;
        stored && sent
    }

    pub async fn notify_project_created(
        &self,
        request: ProjectNotificationRequest,
    ) -> Result<DispatchReport, AppError> {
        let project = self.project_repo.get_by_id(&request.project_id).await?;
        let students = self.group_students(&request.group_ids).await?;

        let start = format_date(opt_to_chrono(project.start_date));
        let end = format_date(opt_to_chrono(project.end_date));

        let mut report = DispatchReport::default();
        for student in &students {
            let template = EmailTemplate::ProjectCreated {
                first_name: &student.first_name,
                project_name: &project.name,
                start: start.clone(),
                end: end.clone(),
            };
            let summary = format!("Le projet {} vous a été attribué.", project.name);
            report.record(self.deliver(student, &template, summary).await);
        }

        log::info!(
            "프로젝트 생성 알림 - project: {}, 수신 {}명, 성공 {}, 실패 {}",
            project.name,
            report.recipients,
            report.sent,
            report.failed
        );
        Ok(report)
    }

    /// `deadline`이 없으면 프로젝트 종료일 사용
    pub async fn notify_project_deadline(
        &self,
        request: ProjectNotificationRequest,
    ) -> Result<DispatchReport, AppError> {
        let project = self.project_repo.get_by_id(&request.project_id).await?;
        let students = self.group_students(&request.group_ids).await?;

        let deadline = format_date(request.deadline.or_else(|| opt_to_chrono(project.end_date)));

        let mut report = DispatchReport::default();
        for student in &students {
            let template = EmailTemplate::ProjectDeadline {
                first_name: &student.first_name,
                project_name: &project.name,
                deadline: deadline.clone(),
            };
            let summary = format!(
                "L'échéance du projet {} approche ({}).",
                project.name,
                deadline.as_deref().unwrap_or("date non définie")
            );
            report.record(self.deliver(student, &template, summary).await);
        }

        log::info!(
            "마감 알림 - project: {}, 수신 {}명, 실패 {}",
            project.name,
            report.recipients,
            report.failed
        );
        Ok(report)
    }

    /// 존재하지 않는 수신자는 실패로 집계
    pub async fn notify_custom(&self, request: CustomNotificationRequest) -> Result<DispatchReport, AppError> {
        let users = self.user_repo.find_by_ids(&request.recipient_ids).await?;

        let mut report = DispatchReport::default();
        for user in &users {
            let template = EmailTemplate::Custom {
                first_name: &user.first_name,
                title: &request.title,
                message: &request.message,
            };
            report.record(self.deliver(user, &template, request.message.clone()).await);
        }

        let missing = request.recipient_ids.len().saturating_sub(users.len());
        for _ in 0..missing {
            report.record(false);
        }
        if missing > 0 {
            log::warn!("알림 수신자 {}명을 찾을 수 없음", missing);
        }

        Ok(report)
    }

    /// 최신순
    pub async fn list_for(&self, user_id: &str) -> Result<Vec<NotificationResponse>, AppError> {
        let notifications = self.notification_repo.find_by_recipient(user_id).await?;
        Ok(notifications.into_iter().map(NotificationResponse::from).collect())
    }

    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<(), AppError> {
        if !self.notification_repo.mark_read(id, user_id).await? {
            return Err(AppError::NotFound(format!("Notification introuvable : {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn group(students: &[&str]) -> Group {
        let mut group = Group::new("G".into(), None);
        for s in students {
            group.add_student(s);
        }
        group
    }

    #[test]
    fn test_distinct_students_across_groups() {
        let groups = vec![group(&["s1", "s2"]), group(&["s2", "s3"]), group(&[])];
        assert_eq!(distinct_students(&groups), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn test_format_date() {
        let date = chrono::Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
        assert_eq!(format_date(Some(date)).as_deref(), Some("30/06/2025"));
        assert_eq!(format_date(None), None);
    }
}
