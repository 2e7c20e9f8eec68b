//! Order handlers. Every handler takes `CurrentUser` first, so unauthenticated requests are
//! rejected before the body or path is looked at.

use crate::error::AppError;
use crate::extractors::{CurrentUser, ListRequest};
use crate::handlers::catalog::parse_id;
use crate::response::Paginated;
use crate::service::{OrderService, OrderValidator};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    request: ListRequest,
) -> Result<impl IntoResponse, AppError> {
    let slice = OrderService::list(&state.pool, user.id, &request.page).await?;
    Ok(Json(Paginated::from_slice(
        slice,
        &request.url.base(),
        request.url.query.as_deref(),
    )))
}

pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(payload)?;
    let items = OrderValidator::validate_full(&body)?;
    let order = OrderService::create(&state.pool, user.id, &items).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn retrieve(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let order = OrderService::retrieve(&state.pool, user.id, id)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(order))
}

pub async fn update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = json_body(payload)?;
    let items = OrderValidator::validate_full(&body)?;
    let order = OrderService::update(&state.pool, user.id, id, Some(items.as_slice()))
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(order))
}

pub async fn partial_update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = json_body(payload)?;
    let items = OrderValidator::validate_partial(&body)?;
    let order = OrderService::update(&state.pool, user.id, id, items.as_deref())
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(order))
}

pub async fn destroy(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !OrderService::delete(&state.pool, user.id, id).await? {
        return Err(AppError::not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
