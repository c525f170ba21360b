use actix_web::web;

use crate::handlers::events;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/teams/{team_name}/events")
            .route(web::get().to(events::get_events))
            .route(web::post().to(events::create_event)),
    )
    .service(
        web::resource("/teams/{team_name}/categories")
            .route(web::get().to(events::get_categories)),
    )
    .service(
        web::resource("/teams/{team_name}/events/{event_id}")
            .route(web::put().to(events::mark_event))
            .route(web::delete().to(events::delete_event)),
    );
}
