pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod validation;

pub use config::Config;
pub use database::repositories::{EventRepository, TeamRepository};
pub use error::AppError;
