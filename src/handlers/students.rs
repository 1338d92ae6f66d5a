//! 학생 본인용 핸들러 (`/api/etudiants`, ETUDIANT 전용)

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, put, web};

use crate::{
    domain::{
        dto::{
            MessageResponse,
            projects::{ChangeTaskStatusRequest, TaskSortQuery},
        },
        models::AuthenticatedUser,
    },
    errors::AppError,
    handlers::upload::read_file_field,
    services::users::StudentService,
};

/// 소속 그룹을 통해 배정된 프로젝트
#[get("/projets")]
pub async fn my_projects(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let projects = StudentService::instance().my_projects(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// `?sort=date` (기본) 또는 `?sort=priorite`
#[get("/taches")]
pub async fn my_tasks(user: AuthenticatedUser, query: web::Query<TaskSortQuery>) -> Result<HttpResponse, AppError> {
    let tasks = StudentService::instance()
        .my_tasks(&user.user_id, query.sort.unwrap_or_default())
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[put("/taches/{id}/statut")]
pub async fn change_task_status(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<ChangeTaskStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let task = StudentService::instance()
        .change_task_status(&user, &id, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// multipart `fichier`
#[post("/livrables/{id}/soumettre")]
pub async fn submit_deliverable(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let file = read_file_field(payload, "fichier").await?;

    let deliverable = StudentService::instance()
        .submit_deliverable(&user, &id, &file.name, &file.bytes)
        .await?;
    Ok(HttpResponse::Ok().json(deliverable))
}

#[get("/livrables/{id}/commentaires")]
pub async fn deliverable_comments(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let comments = StudentService::instance()
        .deliverable_comments(&user.user_id, &id)
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[get("/calendrier")]
pub async fn calendar(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let entries = StudentService::instance().calendar(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[get("/notifications")]
pub async fn notifications(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let notifications = StudentService::instance().notifications(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

#[put("/notifications/{id}/lu")]
pub async fn mark_notification_read(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    StudentService::instance()
        .mark_notification_read(&user.user_id, &id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Notification marquée comme lue")))
}
