//! Scolab 백엔드 메인 애플리케이션
//!
//! MongoDB, Redis 연결과 서비스 레지스트리를 초기화한 뒤 Actix-web 서버를 구동합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use scolab_backend::caching::redis::RedisClient;
use scolab_backend::config::{RateLimitConfig, ServerConfig, StorageConfig};
use scolab_backend::core::registry::ServiceLocator;
use scolab_backend::db::Database;
use scolab_backend::errors::AppError;
use scolab_backend::repositories::{
    deliverables::DeliverableRepository,
    groups::GroupRepository,
    messaging::{ConversationRepository, MessageRepository},
    notifications::NotificationRepository,
    projects::{ProjectRepository, TaskRepository},
    tokens::VerificationTokenRepository,
    users::UserRepository,
};
use scolab_backend::routes::configure_all_routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 Scolab 백엔드 시작중...");

    let (database, redis_client) = initialize_data_stores().await?;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all()
        .await
        .map_err(|e| io::Error::other(format!("서비스 초기화 실패: {}", e)))?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    create_indexes().await.map_err(io::Error::other)?;

    let upload_dir = StorageConfig::upload_dir();
    tokio::fs::create_dir_all(&upload_dir).await?;
    info!("📁 업로드 디렉터리: {}", upload_dir);

    start_http_server().await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 요청 제한, CORS, 로깅, 경로 정규화 미들웨어를 순서대로 겁니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server() -> io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("요청 제한 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second, rate_limit.burst_size
    );

    let origins = ServerConfig::allowed_origins();

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(json_config())
            .app_data(query_config())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// 잘못된 JSON 본문도 다른 오류와 같은 `{error, message}` 형태로 응답
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Corps JSON invalide : {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Paramètres de requête invalides : {}", err)).into()
    })
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// `RUST_LOG` 기본값: "info,actix_web=debug"
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 초기화합니다
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new()
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;
    info!("✅ MongoDB 연결 성공");

    let redis_client = RedisClient::new()
        .await
        .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// 모든 컬렉션 인덱스 생성 (이미 있으면 MongoDB가 무시)
async fn create_indexes() -> Result<(), AppError> {
    UserRepository::instance().create_indexes().await?;
    ProjectRepository::instance().create_indexes().await?;
    TaskRepository::instance().create_indexes().await?;
    GroupRepository::instance().create_indexes().await?;
    DeliverableRepository::instance().create_indexes().await?;
    ConversationRepository::instance().create_indexes().await?;
    MessageRepository::instance().create_indexes().await?;
    NotificationRepository::instance().create_indexes().await?;
    VerificationTokenRepository::instance().create_indexes().await?;

    info!("🗂️ MongoDB 인덱스 준비 완료");
    Ok(())
}

/// `ALLOWED_ORIGINS`(쉼표 구분)에 있는 프론트엔드만 허용
fn configure_cors(origins: &[String]) -> Cors {
    let cors = origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::ACCESS_CONTROL_REQUEST_METHOD,
        ])
        .supports_credentials()
        .max_age(3600)
}
