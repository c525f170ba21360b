use actix_web::{Scope, web};

use crate::handlers::shared::api_not_found;

pub mod events;
pub mod health;
pub mod teams;

/// The `/api` scope with every endpoint and a JSON 404 for unknown API paths.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .configure(health::configure)
        .configure(teams::configure)
        .configure(events::configure)
        .default_service(web::to(api_not_found))
}
