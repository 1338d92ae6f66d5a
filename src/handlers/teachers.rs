//! 교수 본인용 핸들러 (`/api/enseignants`)

use actix_web::{HttpResponse, get};

use crate::{
    domain::models::AuthenticatedUser,
    errors::AppError,
    services::{deliverables::DeliverableService, projects::ProjectService},
};

#[get("/projets")]
pub async fn my_projects(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let projects = ProjectService::instance().by_teacher(&user.user_id, false).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/projets/archives")]
pub async fn my_archived_projects(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let projects = ProjectService::instance().by_teacher(&user.user_id, true).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/projets/stats")]
pub async fn my_project_stats(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let stats = ProjectService::instance().stats_for_teacher(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// 진행 중인 프로젝트의 산출물
#[get("/livrables")]
pub async fn my_deliverables(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let deliverables = DeliverableService::instance().for_teacher(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(deliverables))
}
