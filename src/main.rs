use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use days_since::database::init_database;
use days_since::handlers::shared::json_config;
use days_since::middleware::{
    RateLimitConfig, RateLimitMiddleware, RateLimitStore, RequestId, cleanup_rate_limits,
};
use days_since::{Config, EventRepository, TeamRepository, routes};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Days Since API v1.0")
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    // The pool is owned here and handed to every worker; nothing else holds a handle.
    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let event_repo_data = web::Data::new(EventRepository::new(pool.clone()));
    let team_repo_data = web::Data::new(TeamRepository::new(pool.clone()));
    let pool_data = web::Data::new(pool.clone());

    let rate_limit_config = RateLimitConfig::from_config(&config);
    let rate_limit_store = RateLimitStore::new();
    actix_web::rt::spawn(cleanup_rate_limits(
        rate_limit_store.clone(),
        60,
        rate_limit_config.window_seconds,
    ));

    let allowed_origin = config.allowed_origin();
    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(event_repo_data.clone())
            .app_data(team_repo_data.clone())
            .app_data(pool_data.clone())
            .app_data(json_config())
            .wrap(
                Cors::default()
                    .allowed_origin(&allowed_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(routes::api_scope().wrap(RateLimitMiddleware::with_store(
                rate_limit_config.clone(),
                rate_limit_store.clone(),
            )))
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    log::info!("Server stopped, closing database pool");
    pool.close().await;
    log::info!("Database pool closed");

    Ok(())
}
