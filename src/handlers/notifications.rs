//! 알림 핸들러 (`/api/notifications`)
//!
//! 발송은 교수/관리자만 가능하고, 본인 알림 조회/읽음 처리는 로그인한 모든 사용자가 가능합니다.

use actix_web::{HttpResponse, get, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::{
            MessageResponse,
            notifications::{CustomNotificationRequest, ProjectNotificationRequest},
        },
        entities::users::Role,
        models::AuthenticatedUser,
    },
    errors::AppError,
    services::notifications::NotificationService,
};

const SENDERS: [Role; 2] = [Role::Enseignant, Role::Admin];

#[post("/projets/creation")]
pub async fn notify_project_created(
    user: AuthenticatedUser,
    payload: web::Json<ProjectNotificationRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_any(&SENDERS)?;
    payload.validate()?;

    let report = NotificationService::instance()
        .notify_project_created(payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

#[post("/projets/echeance")]
pub async fn notify_project_deadline(
    user: AuthenticatedUser,
    payload: web::Json<ProjectNotificationRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_any(&SENDERS)?;
    payload.validate()?;

    let report = NotificationService::instance()
        .notify_project_deadline(payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

#[post("/custom")]
pub async fn notify_custom(
    user: AuthenticatedUser,
    payload: web::Json<CustomNotificationRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_any(&SENDERS)?;
    payload.validate()?;

    let report = NotificationService::instance()
        .notify_custom(payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

/// 최신순
#[get("")]
pub async fn my_notifications(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let notifications = NotificationService::instance().list_for(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

#[put("/{id}/lu")]
pub async fn mark_read(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    NotificationService::instance().mark_read(&id, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Notification marquée comme lue")))
}
