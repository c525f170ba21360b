use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::database::models::{CreateEventInput, EventWithStats};
use crate::database::repositories::EventRepository;
use crate::error::AppError;
use crate::handlers::shared::MessageResponse;
use crate::validation::{TeamName, parse_event_id};

/// List a team's events with their cadence stats, newest first
pub async fn get_events(
    repo: web::Data<EventRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let team = TeamName::parse(path.into_inner())?;

    let events = repo.find_by_team(&team).await.map_err(|e| {
        log::error!("Error fetching events for team {}: {}", team, e);
        AppError::internal_server_error_message("Failed to fetch events")
    })?;

    let now = Utc::now();
    let events: Vec<EventWithStats> = events
        .into_iter()
        .map(|event| event.with_stats(now))
        .collect();

    Ok(HttpResponse::Ok().json(events))
}

pub async fn get_categories(
    repo: web::Data<EventRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let team = TeamName::parse(path.into_inner())?;

    let categories = repo.find_categories(&team).await.map_err(|e| {
        log::error!("Error fetching categories for team {}: {}", team, e);
        AppError::internal_server_error_message("Failed to fetch categories")
    })?;

    Ok(HttpResponse::Ok().json(categories))
}

pub async fn create_event(
    repo: web::Data<EventRepository>,
    path: web::Path<String>,
    input: web::Json<CreateEventInput>,
) -> Result<HttpResponse, AppError> {
    let team = TeamName::parse(path.into_inner())?;
    let input = input.into_inner().validate()?;

    let event = repo.create(&team, input).await.map_err(|e| {
        log::error!("Error creating event for team {}: {}", team, e);
        AppError::internal_server_error_message("Failed to create event")
    })?;

    log::info!("Created event {} ({}) for team {}", event.id, event.name, team);
    Ok(HttpResponse::Created().json(event))
}

/// Mark an event as happened now. The server clock is the only time source.
pub async fn mark_event(
    repo: web::Data<EventRepository>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (team, event_id) = path.into_inner();
    let team = TeamName::parse(team)?;
    let event_id = parse_event_id(&event_id)?;

    let updated = repo
        .append_occurrence(&team, event_id, Utc::now())
        .await
        .map_err(|e| {
            log::error!("Error updating event {}: {}", event_id, e);
            AppError::internal_server_error_message("Failed to update event")
        })?;

    match updated {
        Some(event) => Ok(HttpResponse::Ok().json(event)),
        None => Err(AppError::not_found("Event not found")),
    }
}

pub async fn delete_event(
    repo: web::Data<EventRepository>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (team, event_id) = path.into_inner();
    let team = TeamName::parse(team)?;
    let event_id = parse_event_id(&event_id)?;

    let deleted = repo.delete(&team, event_id).await.map_err(|e| {
        log::error!("Error deleting event {}: {}", event_id, e);
        AppError::internal_server_error_message("Failed to delete event")
    })?;

    if !deleted {
        return Err(AppError::not_found("Event not found"));
    }

    log::info!("Deleted event {} from team {}", event_id, team);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Event deleted successfully")))
}
