use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
};
use chrono::{DateTime, SubsecRound, Utc};
use shared::{AttributesEnvelope, Item, ItemEnvelope, ItemPayload, ItemsEnvelope};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::responses;
use crate::store::{ItemPatch, StoreError};
use crate::AppState;

const ID_REQUIRED: &str = "Path parameter id is required.";

/// `POST /items`
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = parse_payload(&body)?;

    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::validation("Validation error: name is required."));
    }

    let now = timestamp();
    let item = Item {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: payload.description.as_deref().map(|d| d.trim().to_string()),
        created_at: now,
        updated_at: now,
    };

    // An id collision is reported like any other storage failure.
    state.store.put_new(&item).await.map_err(|e| {
        tracing::error!("create item failed: {}", e);
        ApiError::Internal("Failed to create item.")
    })?;

    tracing::debug!("created item {}", item.id);
    Ok(responses::json(StatusCode::CREATED, &ItemEnvelope { item }))
}

/// `GET /items/:id`
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_id(id)?;

    let item = state.store.get(&id).await.map_err(|e| {
        tracing::error!("get item {} failed: {}", id, e);
        ApiError::Internal("Failed to get item.")
    })?;

    match item {
        Some(item) => Ok(responses::json(StatusCode::OK, &ItemEnvelope { item })),
        None => Err(ApiError::NotFound),
    }
}

/// `GET /items`
pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let items = state.store.scan().await.map_err(|e| {
        tracing::error!("list items failed: {}", e);
        ApiError::Internal("Failed to list items.")
    })?;

    Ok(responses::json(StatusCode::OK, &ItemsEnvelope { items }))
}

/// `PUT /items/:id`
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = path_id(id)?;
    let payload = parse_payload(&body)?;

    let mut patch = ItemPatch::new(timestamp());
    if let Some(name) = payload.name.as_deref().map(str::trim) {
        if name.is_empty() {
            return Err(ApiError::validation(
                "Validation error: name cannot be empty.",
            ));
        }
        patch = patch.with_name(name);
    }
    if let Some(description) = payload.description.as_deref() {
        patch = patch.with_description(description.trim());
    }
    if !patch.has_field_changes() {
        return Err(ApiError::validation("Provide at least one field to update."));
    }

    let attributes = state
        .store
        .update_existing(&id, &patch)
        .await
        .map_err(|e| not_found_or_internal(e, "update", "Failed to update item."))?;

    Ok(responses::json(
        StatusCode::OK,
        &AttributesEnvelope {
            attributes: Some(attributes),
        },
    ))
}

/// `DELETE /items/:id`
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_id(id)?;

    state
        .store
        .delete_existing(&id)
        .await
        .map_err(|e| not_found_or_internal(e, "delete", "Failed to delete item."))?;

    tracing::debug!("deleted item {}", id);
    Ok(responses::no_content())
}

/// `/items/` with an empty id segment.
pub async fn missing_id() -> ApiError {
    ApiError::validation(ID_REQUIRED)
}

/// Blank ids and ids axum cannot decode (bad UTF-8) are both "missing".
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    match path {
        Ok(Path(id)) if !id.trim().is_empty() => Ok(id),
        Ok(_) => Err(ApiError::validation(ID_REQUIRED)),
        Err(e) => {
            tracing::debug!("rejected item path: {}", e);
            Err(ApiError::validation(ID_REQUIRED))
        }
    }
}

/// Millisecond precision, which every store can hold exactly.
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// An empty body reads as `{}`. Anything else must be a JSON object.
fn parse_payload(body: &[u8]) -> Result<ItemPayload, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ItemPayload::default());
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::validation("Request body must be valid JSON."))?;
    if !value.is_object() {
        return Err(ApiError::validation("Request body must be a JSON object."));
    }
    serde_json::from_value(value)
        .map_err(|_| ApiError::validation("Request body must be a JSON object."))
}

fn not_found_or_internal(err: StoreError, action: &str, message: &'static str) -> ApiError {
    match err {
        StoreError::ConditionFailed { .. } => ApiError::NotFound,
        other => {
            tracing::error!("{} item failed: {}", action, other);
            ApiError::Internal(message)
        }
    }
}
