use crate::auth::Caller;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::MoveFileRequest;
use log::info;

pub(crate) async fn process(
    caller: Caller,
    state: web::Data<AppState>,
    payload: web::Json<MoveFileRequest>,
) -> Result<HttpResponse, ServiceError> {
    if payload.item_id.trim().is_empty() {
        return Err(ServiceError::validation("itemId is required"));
    }
    if payload.destination.trim_matches('/').is_empty() {
        return Err(ServiceError::validation("destination is required"));
    }

    info!(
        "{} moves item {} to `{}`",
        caller.email, payload.item_id, payload.destination
    );
    let token = state.tokens.access_token().await?;
    let item = state
        .drive
        .move_item(&token, payload.item_id.trim(), &payload.destination)
        .await?;
    Ok(HttpResponse::Ok().json(item))
}
