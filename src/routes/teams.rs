use actix_web::web;

use crate::handlers::teams;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/teams").route(web::get().to(teams::get_teams)))
        .service(
            web::resource("/teams/{team_name}")
                .route(web::get().to(teams::get_team))
                .route(web::post().to(teams::upsert_team)),
        );
}
