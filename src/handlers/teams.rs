use actix_web::{HttpResponse, web};

use crate::database::models::TeamInput;
use crate::database::repositories::TeamRepository;
use crate::error::AppError;
use crate::validation::TeamName;

pub async fn get_teams(repo: web::Data<TeamRepository>) -> Result<HttpResponse, AppError> {
    let teams = repo.find_all().await.map_err(|e| {
        log::error!("Error fetching teams: {}", e);
        AppError::internal_server_error_message("Failed to fetch teams")
    })?;

    Ok(HttpResponse::Ok().json(teams))
}

pub async fn get_team(
    repo: web::Data<TeamRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let team_name = TeamName::parse(path.into_inner())?;

    let team = repo.find_by_name(&team_name).await.map_err(|e| {
        log::error!("Error fetching team {}: {}", team_name, e);
        AppError::internal_server_error_message("Failed to fetch team")
    })?;

    match team {
        Some(team) => Ok(HttpResponse::Ok().json(team)),
        None => Err(AppError::not_found("Team not found")),
    }
}

/// Create or replace a team's configuration: 201 when created, 200 when replaced
pub async fn upsert_team(
    repo: web::Data<TeamRepository>,
    path: web::Path<String>,
    input: web::Json<TeamInput>,
) -> Result<HttpResponse, AppError> {
    let team_name = TeamName::parse(path.into_inner())?;
    let config = input.into_inner().validate()?;

    let result = repo.upsert(&team_name, config).await.map_err(|e| {
        log::error!("Error creating/updating team {}: {}", team_name, e);
        AppError::internal_server_error_message("Failed to create/update team")
    })?;

    if result.created {
        log::info!("Created team {}", team_name);
        Ok(HttpResponse::Created().json(result.team))
    } else {
        Ok(HttpResponse::Ok().json(result.team))
    }
}
