//! Google Maps proxy, so the API key stays on the server.

mod distance;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/maps";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/distance", post().to(distance::process))
}
