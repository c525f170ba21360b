#![allow(dead_code)]

use actix_web::{
    App,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use anyhow::Result;
use sqlx::SqlitePool;
use tempfile::TempDir;

use days_since::database::init_database;
use days_since::handlers::shared::json_config;
use days_since::middleware::{RateLimitConfig, RateLimitMiddleware, RateLimitStore, RequestId};
use days_since::validation::TeamName;
use days_since::{EventRepository, TeamRepository, routes};

/// A throwaway SQLite database plus the repositories built on it.
pub struct TestContext {
    pub pool: SqlitePool,
    pub event_repository: EventRepository,
    pub team_repository: TeamRepository,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        setup_test_env();

        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        Ok(TestContext {
            event_repository: EventRepository::new(pool.clone()),
            team_repository: TeamRepository::new(pool.clone()),
            pool,
            _temp_dir: temp_dir,
        })
    }

    /// The API as served by the binary, minus CORS, with a generous rate limit.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        self.app_with_rate_limit(RateLimitConfig::new(10_000, 900))
    }

    pub fn app_with_rate_limit(
        &self,
        rate_limit: RateLimitConfig,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.event_repository.clone()))
            .app_data(web::Data::new(self.team_repository.clone()))
            .app_data(web::Data::new(self.pool.clone()))
            .app_data(json_config())
            .wrap(RequestId)
            .service(routes::api_scope().wrap(RateLimitMiddleware::with_store(
                rate_limit,
                RateLimitStore::new(),
            )))
    }
}

pub fn team(name: &str) -> TeamName {
    TeamName::parse(name).expect("valid test team name")
}

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}
