use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use scopefinder_core::AppError;

use super::{invalid_body, present};
use crate::dto::{
    ResolveApplicationRequest, ResolveApplicationResponse, ResolveGroupRequest,
    ResolveGroupResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn resolve_group_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResolveGroupRequest>, JsonRejection>,
) -> ApiResult<Json<ResolveGroupResponse>> {
    let Json(payload) = payload.map_err(invalid_body)?;
    let group_name = present(payload.group_name)
        .ok_or_else(|| AppError::Validation("groupName is required".to_owned()))?;

    let resolution = state
        .resolver_service
        .resolve_group(group_name.as_str())
        .await?;

    Ok(Json(resolution.into()))
}

pub async fn resolve_application_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResolveApplicationRequest>, JsonRejection>,
) -> ApiResult<Json<ResolveApplicationResponse>> {
    let Json(payload) = payload.map_err(invalid_body)?;
    let application_name = present(payload.application_name)
        .ok_or_else(|| AppError::Validation("applicationName is required".to_owned()))?;

    let resolution = state
        .resolver_service
        .resolve_application(application_name.as_str())
        .await?;

    Ok(Json(resolution.into()))
}
