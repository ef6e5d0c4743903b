pub mod auth;
pub mod config;
pub mod error;
pub mod graph;
pub mod services;
pub mod state;

use actix_web::web;

/// Registers every route and the JSON limits on an Actix app.
///
/// Shared by `main.rs` and the integration tests.
pub fn configure_app(state: web::Data<state::AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let limit = state.config.server.json_limit;
        cfg.app_data(web::JsonConfig::default().limit(limit).error_handler(|err, _req| {
            error::ServiceError::validation(err.to_string()).into()
        }))
        .app_data(state)
        .service(services::folders::configure_routes())
        .service(services::files::configure_routes())
        .service(services::maps::configure_routes());
    }
}
