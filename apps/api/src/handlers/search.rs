use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use scopefinder_core::AppError;
use scopefinder_domain::{SearchCriterion, SearchType};

use super::{invalid_body, present};
use crate::dto::{SearchRequest, SearchResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(payload) = payload.map_err(invalid_body)?;
    let (Some(search_type), Some(search_value)) =
        (present(payload.search_type), present(payload.search_value))
    else {
        return Err(
            AppError::Validation("searchType and searchValue are required".to_owned()).into(),
        );
    };

    let criterion = SearchCriterion::new(
        SearchType::from_transport(search_type.as_str()),
        search_value,
    )?;
    let outcome = state.search_service.search(criterion).await?;

    Ok(Json(outcome.into()))
}
