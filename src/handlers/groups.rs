//! 그룹 핸들러 (`/api/groupes`)

use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::groups::{CreateGroupRequest, UpdateGroupRequest},
        models::AuthenticatedUser,
    },
    errors::AppError,
    services::groups::GroupService,
};

/// 보관되지 않은 그룹만
#[get("")]
pub async fn list_groups() -> Result<HttpResponse, AppError> {
    let groups = GroupService::instance().list().await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[get("/{id}")]
pub async fn get_group(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let group = GroupService::instance().get(&id).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[post("")]
pub async fn create_group(
    user: AuthenticatedUser,
    payload: web::Json<CreateGroupRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let group = GroupService::instance()
        .create(&user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(group))
}

#[put("/{id}")]
pub async fn update_group(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateGroupRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let group = GroupService::instance()
        .update(&user, &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(group))
}

/// 보관 상태 토글
#[delete("/{id}")]
pub async fn delete_group(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let group = GroupService::instance().toggle_archive(&user, &id).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[post("/{id}/etudiants/{student_id}")]
pub async fn add_student(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, student_id) = path.into_inner();
    let group = GroupService::instance()
        .add_student(&user, &id, &student_id)
        .await?;
    Ok(HttpResponse::Ok().json(group))
}

#[delete("/{id}/etudiants/{student_id}")]
pub async fn remove_student(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, student_id) = path.into_inner();
    let group = GroupService::instance()
        .remove_student(&user, &id, &student_id)
        .await?;
    Ok(HttpResponse::Ok().json(group))
}

#[post("/{id}/projets/{project_id}")]
pub async fn add_project(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, project_id) = path.into_inner();
    let group = GroupService::instance()
        .add_project(&user, &id, &project_id)
        .await?;
    Ok(HttpResponse::Ok().json(group))
}

#[get("/{id}/etudiants")]
pub async fn group_students(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let students = GroupService::instance().students(&id).await?;
    Ok(HttpResponse::Ok().json(students))
}

#[get("/{id}/projets")]
pub async fn group_projects(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let projects = GroupService::instance().projects(&id).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[post("/{id}/calcul-avancement")]
pub async fn recompute_progress(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let group = GroupService::instance().recompute_progress(&id).await?;
    Ok(HttpResponse::Ok().json(group))
}
