//! 사용자 관리 핸들러 (`/api/utilisateurs`, 교수/관리자)

use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::{
            MessageResponse,
            auth::RegisterRequest,
            users::{UpdateUserRequest, UserResponse},
        },
        entities::users::{Role, User},
    },
    errors::AppError,
    services::users::UserService,
};

pub(crate) fn user_list(users: Vec<User>) -> HttpResponse {
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    HttpResponse::Ok().json(users)
}

#[get("/etudiants")]
pub async fn list_students() -> Result<HttpResponse, AppError> {
    let users = UserService::instance().list_by_role(Role::Etudiant).await?;
    Ok(user_list(users))
}

#[get("/enseignants")]
pub async fn list_teachers() -> Result<HttpResponse, AppError> {
    let users = UserService::instance().list_by_role(Role::Enseignant).await?;
    Ok(user_list(users))
}

#[get("/etudiants/{id}")]
pub async fn get_student(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get_student(&id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[get("/enseignants/{id}")]
pub async fn get_teacher(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get_teacher(&id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

async fn create_with_role(payload: web::Json<RegisterRequest>, role: Role) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = UserService::instance()
        .create_user(payload.into_inner(), role)
        .await?;

    log::info!("사용자 등록 - email: {}, role: {}", user.email, role);
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// 본문의 `role`은 무시하고 `ETUDIANT`로 생성
#[post("/etudiants")]
pub async fn create_student(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    create_with_role(payload, Role::Etudiant).await
}

#[post("/enseignants")]
pub async fn create_teacher(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    create_with_role(payload, Role::Enseignant).await
}

#[put("/etudiants/{id}")]
pub async fn update_student(
    id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = UserService::instance()
        .update_with_role(&id, Role::Etudiant, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[put("/enseignants/{id}")]
pub async fn update_teacher(
    id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = UserService::instance()
        .update_with_role(&id, Role::Enseignant, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[get("/{id}")]
pub async fn get_user(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get_user(&id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[delete("/{id}")]
pub async fn delete_user(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    UserService::instance().delete_user(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Utilisateur supprimé")))
}

#[put("/{id}/activate")]
pub async fn activate_user(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().set_active(&id, true).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[put("/{id}/deactivate")]
pub async fn deactivate_user(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().set_active(&id, false).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
