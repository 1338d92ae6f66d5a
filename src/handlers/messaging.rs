//! 메시징 핸들러 (`/api/messagerie`)

use actix_web::{HttpResponse, get, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::messaging::{CreateConversationRequest, SendMessageRequest},
        models::AuthenticatedUser,
    },
    errors::AppError,
    services::messaging::MessagingService,
};

/// 같은 (그룹, 교수) 대화방이 있으면 그대로 반환
#[post("/conversations")]
pub async fn create_conversation(
    user: AuthenticatedUser,
    payload: web::Json<CreateConversationRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let conversation = MessagingService::instance()
        .create_or_get(&user, &payload.group_id, &payload.teacher_id)
        .await?;
    Ok(HttpResponse::Ok().json(conversation))
}

#[get("/conversations/groupe/{group_id}")]
pub async fn by_group(user: AuthenticatedUser, group_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let conversations = MessagingService::instance().by_group(&user, &group_id).await?;
    Ok(HttpResponse::Ok().json(conversations))
}

#[get("/conversations/groupe/{group_id}/details")]
pub async fn group_details(user: AuthenticatedUser, group_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let details = MessagingService::instance().group_details(&user, &group_id).await?;
    Ok(HttpResponse::Ok().json(details))
}

#[get("/conversations/enseignant/{teacher_id}")]
pub async fn by_teacher(user: AuthenticatedUser, teacher_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let conversations = MessagingService::instance().by_teacher(&user, &teacher_id).await?;
    Ok(HttpResponse::Ok().json(conversations))
}

/// 경로의 `user_id`는 호출자 본인이어야 함
#[get("/conversations/user/{user_id}")]
pub async fn by_user(user: AuthenticatedUser, user_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let conversations = MessagingService::instance().by_user(&user, &user_id).await?;
    Ok(HttpResponse::Ok().json(conversations))
}

#[put("/conversations/{id}/lu")]
pub async fn mark_read(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let result = MessagingService::instance().mark_read(&user, &id).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// 보낸 사람은 항상 호출자
#[post("/messages")]
pub async fn send_message(
    user: AuthenticatedUser,
    payload: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let message = MessagingService::instance()
        .send(&user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(message))
}

#[get("/messages/{conversation_id}")]
pub async fn messages(
    user: AuthenticatedUser,
    conversation_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = MessagingService::instance()
        .messages(&user, &conversation_id)
        .await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[get("/non-lus")]
pub async fn unread_count(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let count = MessagingService::instance().unread_count(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(count))
}
