use crate::auth::Caller;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::ListFolderRequest;

pub(crate) async fn process(
    _caller: Caller,
    state: web::Data<AppState>,
    payload: web::Json<ListFolderRequest>,
) -> Result<HttpResponse, ServiceError> {
    let token = state.tokens.access_token().await?;
    let children = state.drive.list_children(&token, &payload.path).await;
    Ok(HttpResponse::Ok().json(children))
}
