//! 산출물 핸들러 (`/api/livrables`)

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::deliverables::{CreateDeliverableRequest, EvaluateDeliverableRequest},
        models::AuthenticatedUser,
    },
    errors::AppError,
    handlers::upload::read_file_field,
    services::deliverables::DeliverableService,
};

#[get("/retard")]
pub async fn late_deliverables() -> Result<HttpResponse, AppError> {
    let deliverables = DeliverableService::instance().late().await?;
    Ok(HttpResponse::Ok().json(deliverables))
}

/// 호출한 교수의 보관되지 않은 프로젝트 산출물
#[get("/enseignant")]
pub async fn my_deliverables(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let deliverables = DeliverableService::instance().for_teacher(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(deliverables))
}

#[get("/projet/{project_id}")]
pub async fn by_project(project_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let deliverables = DeliverableService::instance().by_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(deliverables))
}

#[get("/groupe/{group_id}")]
pub async fn by_group(group_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let deliverables = DeliverableService::instance().by_group(&group_id).await?;
    Ok(HttpResponse::Ok().json(deliverables))
}

#[post("")]
pub async fn create_deliverable(
    user: AuthenticatedUser,
    payload: web::Json<CreateDeliverableRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let deliverable = DeliverableService::instance()
        .create(&user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(deliverable))
}

#[get("/{id}")]
pub async fn get_deliverable(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let deliverable = DeliverableService::instance().get(&id).await?;
    Ok(HttpResponse::Ok().json(deliverable))
}

/// multipart `fichier`
#[post("/{id}/soumettre")]
pub async fn submit(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let file = read_file_field(payload, "fichier").await?;

    let deliverable = DeliverableService::instance()
        .submit(&user, &id, &file.name, &file.bytes)
        .await?;
    Ok(HttpResponse::Ok().json(deliverable))
}

#[put("/{id}/evaluer")]
pub async fn evaluate(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<EvaluateDeliverableRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let deliverable = DeliverableService::instance()
        .evaluate(&user, &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(deliverable))
}

#[put("/{id}/correction")]
pub async fn start_correction(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let deliverable = DeliverableService::instance().start_correction(&user, &id).await?;
    Ok(HttpResponse::Ok().json(deliverable))
}

#[put("/{id}/corrige")]
pub async fn mark_corrected(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let deliverable = DeliverableService::instance().mark_corrected(&user, &id).await?;
    Ok(HttpResponse::Ok().json(deliverable))
}

#[put("/{id}/rejeter")]
pub async fn reject(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let deliverable = DeliverableService::instance().reject(&user, &id).await?;
    Ok(HttpResponse::Ok().json(deliverable))
}
