//! 관리자 핸들러
//!
//! 사용자 관리 핸들러는 `/admin/users`와 `/api/admin/utilisateurs` 두 스코프에 같이 등록됩니다.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::{
            MessageResponse,
            auth::RegisterRequest,
            users::{ChangeRoleRequest, SearchQuery, UpdateStatusRequest, UpdateUserRequest, UserResponse},
        },
        entities::users::Role,
    },
    errors::AppError,
    handlers::users::user_list,
    services::{
        projects::ProjectService,
        users::{AdminService, UserService},
    },
};

fn parse_role(value: &str) -> Result<Role, AppError> {
    Role::from_str(value).ok_or_else(|| AppError::ValidationError(format!("Rôle inconnu : {}", value)))
}

#[get("")]
pub async fn list_users() -> Result<HttpResponse, AppError> {
    let users = UserService::instance().list_all().await?;
    Ok(user_list(users))
}

/// `GET .../search?keyword=...` (nom, prénom ou email)
#[get("/search")]
pub async fn search_users(query: web::Query<SearchQuery>) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let users = UserService::instance().search(&query.keyword).await?;
    Ok(user_list(users))
}

#[get("/role/{role}")]
pub async fn list_by_role(role: web::Path<String>) -> Result<HttpResponse, AppError> {
    let role = parse_role(&role)?;
    let users = UserService::instance().list_by_role(role).await?;
    Ok(user_list(users))
}

#[get("/{id}")]
pub async fn get_user(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get_user(&id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[post("")]
pub async fn create_user(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = AdminService::instance().create_user(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[put("/{id}")]
pub async fn update_user(
    id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = UserService::instance()
        .update_user(&id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[delete("/{id}")]
pub async fn delete_user(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    UserService::instance().delete_user(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Utilisateur supprimé")))
}

#[put("/{id}/role")]
pub async fn change_role(
    id: web::Path<String>,
    payload: web::Json<ChangeRoleRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let role = parse_role(&payload.role)?;
    let user = UserService::instance().change_role(&id, role).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// 본문에 `is_active`가 있으면 그 값으로, 없으면 현재 상태를 뒤집음
#[patch("/{id}/status")]
pub async fn update_status(
    id: web::Path<String>,
    payload: Option<web::Json<UpdateStatusRequest>>,
) -> Result<HttpResponse, AppError> {
    let user = match payload {
        Some(body) => UserService::instance().set_active(&id, body.is_active).await?,
        None => AdminService::instance().toggle_status(&id).await?,
    };
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// `GET /api/admin/dashboard`
#[get("/dashboard")]
pub async fn dashboard() -> Result<HttpResponse, AppError> {
    let stats = AdminService::instance().dashboard().await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[get("/projets/stats")]
pub async fn project_stats() -> Result<HttpResponse, AppError> {
    let stats = AdminService::instance().project_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[get("/projets/stats/{teacher_id}")]
pub async fn teacher_project_stats(teacher_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let stats = ProjectService::instance().stats_for_teacher(&teacher_id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("etudiant").unwrap(), Role::Etudiant);
        assert!(matches!(parse_role("invité"), Err(AppError::ValidationError(_))));
    }
}
