//! 프로젝트 핸들러 (`/api/projets`)
//!
//! 고정 경로(`/enseignant`, `/retard`, `/stats`)는 `/{id}`보다 먼저 등록해야 합니다.

use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::projects::{
            ChangeProjectStatusRequest, CreateProjectRequest, CreateTaskRequest, UpdateProjectRequest,
        },
        models::AuthenticatedUser,
    },
    errors::AppError,
    services::projects::ProjectService,
};

/// 호출한 교수의 진행 중(보관되지 않은) 프로젝트
#[get("/enseignant")]
pub async fn my_projects(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let projects = ProjectService::instance().by_teacher(&user.user_id, false).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/enseignant/archives")]
pub async fn my_archived_projects(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let projects = ProjectService::instance().by_teacher(&user.user_id, true).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/retard")]
pub async fn late_projects() -> Result<HttpResponse, AppError> {
    let projects = ProjectService::instance().late().await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// 관리자는 전체, 그 외에는 본인 담당 프로젝트 통계
#[get("/stats")]
pub async fn project_stats(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let service = ProjectService::instance();
    let stats = if user.is_admin() {
        service.stats_all().await?
    } else {
        service.stats_for_teacher(&user.user_id).await?
    };
    Ok(HttpResponse::Ok().json(stats))
}

#[post("")]
pub async fn create_project(
    user: AuthenticatedUser,
    payload: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let project = ProjectService::instance()
        .create(&user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(project))
}

/// 태스크 목록과 통계 포함
#[get("/{id}")]
pub async fn get_project(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let project = ProjectService::instance().get(&id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[put("/{id}")]
pub async fn update_project(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateProjectRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let project = ProjectService::instance()
        .update(&user, &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// 삭제 대신 보관 상태를 뒤집음
#[delete("/{id}")]
pub async fn delete_project(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let project = ProjectService::instance().toggle_archive(&user, &id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[put("/{id}/archiver")]
pub async fn archive_project(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let project = ProjectService::instance().archive(&user, &id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[put("/{id}/restaurer")]
pub async fn restore_project(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let project = ProjectService::instance().restore(&user, &id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[put("/{id}/statut")]
pub async fn change_status(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<ChangeProjectStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let project = ProjectService::instance()
        .change_status(&user, &id, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

#[post("/{id}/groupes/{group_id}")]
pub async fn assign_group(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, group_id) = path.into_inner();
    let project = ProjectService::instance()
        .assign_group(&user, &id, &group_id)
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

#[get("/{id}/taches")]
pub async fn project_tasks(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let tasks = ProjectService::instance().tasks(&id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// 경로의 프로젝트 ID가 본문의 `project_id`보다 우선
#[post("/{id}/taches")]
pub async fn add_task(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let task = ProjectService::instance()
        .add_task(&user, &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(task))
}
