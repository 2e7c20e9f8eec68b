//! Catalog list and retrieve handlers, generic over the resource.

use crate::error::AppError;
use crate::extractors::{ListRequest, RequestUrl};
use crate::response::Paginated;
use crate::service::CatalogResource;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

/// Catalog and order ids are positive integers; anything else cannot name a row.
pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(AppError::not_found)
}

pub async fn list<R: CatalogResource>(
    State(state): State<AppState>,
    request: ListRequest,
) -> Result<Json<Paginated<R::ListItem>>, AppError> {
    let slice = R::list(&state, &request).await?;
    Ok(Json(Paginated::from_slice(
        slice,
        &request.url.base(),
        request.url.query.as_deref(),
    )))
}

pub async fn retrieve<R: CatalogResource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    url: RequestUrl,
) -> Result<Json<R::Detail>, AppError> {
    let id = parse_id(&id_str)?;
    let detail = R::retrieve(&state, id, &url)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        for bad in ["abc", "0", "-3", "1.5", ""] {
            assert!(matches!(parse_id(bad), Err(AppError::NotFound(_))), "{}", bad);
        }
    }
}
