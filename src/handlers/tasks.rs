//! 태스크 핸들러 (`/api/taches`)

use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::{
            MessageResponse,
            projects::{ChangeTaskStatusRequest, CreateTaskRequest, TaskSortQuery, UpdateTaskRequest},
        },
        entities::projects::TaskStatus,
        models::AuthenticatedUser,
    },
    errors::AppError,
    services::projects::TaskService,
};

#[get("/retard")]
pub async fn late_tasks() -> Result<HttpResponse, AppError> {
    let tasks = TaskService::instance().late().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// `?sort=date|priorite`
#[get("/etudiant/{student_id}")]
pub async fn tasks_by_student(
    student_id: web::Path<String>,
    query: web::Query<TaskSortQuery>,
) -> Result<HttpResponse, AppError> {
    let tasks = TaskService::instance()
        .by_student(&student_id, query.sort.unwrap_or_default())
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[get("/projet/{project_id}")]
pub async fn tasks_by_project(project_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let tasks = TaskService::instance().by_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[get("/projet/terminee/{project_id}")]
pub async fn completed_tasks(project_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let tasks = TaskService::instance().completed_by_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[get("/projet/{project_id}/statut/{status}")]
pub async fn tasks_by_project_and_status(path: web::Path<(String, String)>) -> Result<HttpResponse, AppError> {
    let (project_id, status) = path.into_inner();
    let status = TaskStatus::from_str(&status)
        .ok_or_else(|| AppError::ValidationError(format!("Statut de tâche inconnu : {}", status)))?;

    let tasks = TaskService::instance()
        .by_project_and_status(&project_id, status)
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// `project_id` obligatoire dans le corps
#[post("")]
pub async fn create_task(
    user: AuthenticatedUser,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let task = TaskService::instance()
        .create(&user, payload.into_inner(), None)
        .await?;
    Ok(HttpResponse::Created().json(task))
}

#[get("/{id}")]
pub async fn get_task(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let task = TaskService::instance().get(&id).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[put("/{id}")]
pub async fn update_task(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let task = TaskService::instance()
        .update(&user, &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/{id}")]
pub async fn delete_task(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    TaskService::instance().delete(&user, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Tâche supprimée")))
}

#[put("/{id}/statut")]
pub async fn change_status(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<ChangeTaskStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let task = TaskService::instance()
        .change_status(&user, &id, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[put("/{id}/assigner/{student_id}")]
pub async fn assign_student(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, student_id) = path.into_inner();
    let task = TaskService::instance()
        .assign_student(&user, &id, &student_id)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[put("/{id}/retirer/{student_id}")]
pub async fn remove_student(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, student_id) = path.into_inner();
    let task = TaskService::instance()
        .remove_student(&user, &id, &student_id)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}
