use crate::auth::Caller;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::DistanceRequest;
use log::debug;
use serde_json::Value;

/// Forwards to the Distance Matrix API and returns its JSON untouched.
pub(crate) async fn process(
    _caller: Caller,
    state: web::Data<AppState>,
    payload: web::Json<DistanceRequest>,
) -> Result<HttpResponse, ServiceError> {
    if payload.origins.trim().is_empty() || payload.destinations.trim().is_empty() {
        return Err(ServiceError::validation(
            "origins and destinations are required",
        ));
    }
    let body = distance_matrix(&state, &payload).await?;
    Ok(HttpResponse::Ok().json(body))
}

pub async fn distance_matrix(
    state: &AppState,
    request: &DistanceRequest,
) -> Result<Value, ServiceError> {
    let maps = &state.config.maps;
    let key = maps
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ServiceError::configuration("maps.api_key is not set"))?;

    let url = format!("{}/distancematrix/json", maps.base.trim_end_matches('/'));
    debug!("distance {} -> {}", request.origins, request.destinations);
    let response = state
        .http
        .get(url)
        .query(&[
            ("origins", request.origins.as_str()),
            ("destinations", request.destinations.as_str()),
            ("units", "metric"),
            ("key", key),
        ])
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ServiceError::Upstream {
            status: status.as_u16(),
            body: text,
        });
    }
    serde_json::from_str(&text).map_err(|e| ServiceError::Upstream {
        status: status.as_u16(),
        body: format!("unreadable response: {e}"),
    })
}
