//! API 라우트 설정
//!
//! 경로 접두사별로 스코프를 나누고 각 스코프에 필요한 역할을 `AuthMiddleware`로 겁니다.
//!
//! | 접두사 | 접근 |
//! |--------|------|
//! | `/auth/**` (아래 제외), `/uploads/**`, `/health` | 공개 |
//! | `/auth/profile/**`, `/auth/change-password`, `/auth/logout` | 로그인 |
//! | `/api/etudiants/**` | ETUDIANT |
//! | `/api/enseignants/**`, `/api/utilisateurs/**` | ENSEIGNANT, ADMIN |
//! | `/api/admin/**`, `/admin/**` | ADMIN |
//! | `/api/projets`, `/api/livrables`, `/api/taches`, `/api/groupes`, `/api/fichiers`, `/api/notifications` | ETUDIANT, ENSEIGNANT, ADMIN |
//! | `/api/messagerie/**` | ENSEIGNANT, ETUDIANT |
//!
//! 각 스코프 안에서는 고정 경로를 `/{id}` 같은 동적 경로보다 먼저 등록합니다.
//!
//! ```rust,ignore
//! let app = App::new().configure(configure_all_routes);
//! ```

use actix_files::Files;
use actix_web::{HttpResponse, Scope, get, web};
use serde_json::json;

use crate::config::StorageConfig;
use crate::domain::entities::users::Role;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::services::files::UPLOAD_URL_PREFIX;

const ALL_ROLES: [Role; 3] = [Role::Etudiant, Role::Enseignant, Role::Admin];
const STAFF: [Role; 2] = [Role::Enseignant, Role::Admin];

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_admin_routes(cfg);
    configure_student_routes(cfg);
    configure_project_routes(cfg);
    configure_deliverable_routes(cfg);
    configure_group_routes(cfg);
    configure_messaging_routes(cfg);
    configure_notification_routes(cfg);
    configure_file_routes(cfg);
}

/// `/auth`: 대부분 공개. 로그아웃/비밀번호 변경은 핸들러 단위로, 프로필은 스코프 단위로 인증
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::refresh)
            .service(handlers::auth::verify_token)
            .service(handlers::auth::logout)
            .service(handlers::auth::verify_email)
            .service(handlers::auth::resend_verification)
            .service(handlers::auth::forgot_password)
            .service(handlers::auth::reset_password)
            .service(handlers::auth::change_password)
            .service(
                web::scope("/profile")
                    .wrap(AuthMiddleware::required())
                    .service(handlers::auth::get_profile)
                    .service(handlers::auth::update_profile)
                    .service(handlers::auth::upload_profile_photo),
            )
            .service(
                web::scope("/oauth2")
                    .service(handlers::auth::google_login_url)
                    .service(handlers::auth::google_oauth_callback),
            ),
    );
}

/// `/api/utilisateurs`는 사용자 관리, `/api/enseignants`는 교수 본인 조회
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/utilisateurs")
            .wrap(AuthMiddleware::required_with_roles(&STAFF))
            .service(handlers::users::list_students)
            .service(handlers::users::list_teachers)
            .service(handlers::users::get_student)
            .service(handlers::users::get_teacher)
            .service(handlers::users::create_student)
            .service(handlers::users::create_teacher)
            .service(handlers::users::update_student)
            .service(handlers::users::update_teacher)
            .service(handlers::users::get_user)
            .service(handlers::users::delete_user)
            .service(handlers::users::activate_user)
            .service(handlers::users::deactivate_user),
    );

    cfg.service(
        web::scope("/api/enseignants")
            .wrap(AuthMiddleware::required_with_roles(&STAFF))
            .service(handlers::teachers::my_projects)
            .service(handlers::teachers::my_archived_projects)
            .service(handlers::teachers::my_project_stats)
            .service(handlers::teachers::my_deliverables),
    );
}

/// 관리자 사용자 관리 스코프. 두 경로에 같은 핸들러를 붙임
fn admin_user_scope(path: &str) -> Scope {
    web::scope(path)
        .service(handlers::admin::list_users)
        .service(handlers::admin::search_users)
        .service(handlers::admin::list_by_role)
        .service(handlers::admin::create_user)
        .service(handlers::admin::get_user)
        .service(handlers::admin::update_user)
        .service(handlers::admin::delete_user)
        .service(handlers::admin::change_role)
        .service(handlers::admin::update_status)
}

fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware::required_with_role(Role::Admin))
            .service(admin_user_scope("/users")),
    );

    cfg.service(
        web::scope("/api/admin")
            .wrap(AuthMiddleware::required_with_role(Role::Admin))
            .service(handlers::admin::dashboard)
            .service(handlers::admin::project_stats)
            .service(handlers::admin::teacher_project_stats)
            .service(admin_user_scope("/utilisateurs")),
    );
}

fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/etudiants")
            .wrap(AuthMiddleware::required_with_role(Role::Etudiant))
            .service(handlers::students::my_projects)
            .service(handlers::students::my_tasks)
            .service(handlers::students::change_task_status)
            .service(handlers::students::submit_deliverable)
            .service(handlers::students::deliverable_comments)
            .service(handlers::students::calendar)
            .service(handlers::students::notifications)
            .service(handlers::students::mark_notification_read),
    );
}

fn configure_project_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/projets")
            .wrap(AuthMiddleware::required_with_roles(&ALL_ROLES))
            .service(handlers::projects::my_projects)
            .service(handlers::projects::my_archived_projects)
            .service(handlers::projects::late_projects)
            .service(handlers::projects::project_stats)
            .service(handlers::projects::create_project)
            .service(handlers::projects::get_project)
            .service(handlers::projects::update_project)
            .service(handlers::projects::delete_project)
            .service(handlers::projects::archive_project)
            .service(handlers::projects::restore_project)
            .service(handlers::projects::change_status)
            .service(handlers::projects::assign_group)
            .service(handlers::projects::project_tasks)
            .service(handlers::projects::add_task),
    );

    cfg.service(
        web::scope("/api/taches")
            .wrap(AuthMiddleware::required_with_roles(&ALL_ROLES))
            .service(handlers::tasks::late_tasks)
            .service(handlers::tasks::tasks_by_student)
            .service(handlers::tasks::completed_tasks)
            .service(handlers::tasks::tasks_by_project_and_status)
            .service(handlers::tasks::tasks_by_project)
            .service(handlers::tasks::create_task)
            .service(handlers::tasks::get_task)
            .service(handlers::tasks::update_task)
            .service(handlers::tasks::delete_task)
            .service(handlers::tasks::change_status)
            .service(handlers::tasks::assign_student)
            .service(handlers::tasks::remove_student),
    );
}

fn configure_deliverable_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/livrables")
            .wrap(AuthMiddleware::required_with_roles(&ALL_ROLES))
            .service(handlers::deliverables::late_deliverables)
            .service(handlers::deliverables::my_deliverables)
            .service(handlers::deliverables::by_project)
            .service(handlers::deliverables::by_group)
            .service(handlers::deliverables::create_deliverable)
            .service(handlers::deliverables::get_deliverable)
            .service(handlers::deliverables::submit)
            .service(handlers::deliverables::evaluate)
            .service(handlers::deliverables::start_correction)
            .service(handlers::deliverables::mark_corrected)
            .service(handlers::deliverables::reject),
    );
}

fn configure_group_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/groupes")
            .wrap(AuthMiddleware::required_with_roles(&ALL_ROLES))
            .service(handlers::groups::list_groups)
            .service(handlers::groups::create_group)
            .service(handlers::groups::get_group)
            .service(handlers::groups::update_group)
            .service(handlers::groups::delete_group)
            .service(handlers::groups::add_student)
            .service(handlers::groups::remove_student)
            .service(handlers::groups::add_project)
            .service(handlers::groups::group_students)
            .service(handlers::groups::group_projects)
            .service(handlers::groups::recompute_progress),
    );
}

fn configure_messaging_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/messagerie")
            .wrap(AuthMiddleware::required_with_roles(&[Role::Enseignant, Role::Etudiant]))
            .service(handlers::messaging::create_conversation)
            .service(handlers::messaging::group_details)
            .service(handlers::messaging::by_group)
            .service(handlers::messaging::by_teacher)
            .service(handlers::messaging::by_user)
            .service(handlers::messaging::mark_read)
            .service(handlers::messaging::send_message)
            .service(handlers::messaging::messages)
            .service(handlers::messaging::unread_count),
    );
}

fn configure_notification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notifications")
            .wrap(AuthMiddleware::required_with_roles(&ALL_ROLES))
            .service(handlers::notifications::notify_project_created)
            .service(handlers::notifications::notify_project_deadline)
            .service(handlers::notifications::notify_custom)
            .service(handlers::notifications::my_notifications)
            .service(handlers::notifications::mark_read),
    );
}

/// `/uploads/**`는 공개 정적 서빙, `/api/fichiers/**`는 로그인 후 첨부 다운로드
fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/fichiers")
            .wrap(AuthMiddleware::required_with_roles(&ALL_ROLES))
            .service(handlers::files::download),
    );

    let mount = UPLOAD_URL_PREFIX.trim_end_matches('/');
    cfg.service(Files::new(mount, StorageConfig::upload_dir()));
}

/// 로드밸런서/모니터링용 헬스체크
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "scolab_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "dependency_injection": "Singleton Macro"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_protected_scopes_require_token() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        for uri in ["/api/projets/retard", "/api/etudiants/projets", "/admin/users", "/auth/profile"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }
}
