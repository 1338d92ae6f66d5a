//! MongoDB 연결 관리
//!
//! [`Database`]는 시작 시 한 번 생성되어 `ServiceLocator`에 등록되고,
//! `#[repository]` 매크로가 `db` 필드에 자동으로 주입합니다.

use log::info;
use mongodb::bson::doc;
use mongodb::{Client, options::ClientOptions};

use crate::config::DatabaseConfig;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경 설정으로 연결하고 `ping`으로 연결을 확인
    pub async fn new() -> Result<Self, mongodb::error::Error> {
        let database_name = DatabaseConfig::database_name();

        let mut client_options = ClientOptions::parse(DatabaseConfig::mongodb_uri()).await?;
        client_options.app_name = Some("scolab_backend".to_string());

        let client = Client::with_options(client_options)?;
        client
            .database(&database_name)
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
