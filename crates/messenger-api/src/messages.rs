use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use messenger_types::api::{DeleteQuery, MessagePatch, MessageQuery, MessageRequest};

use crate::error::ApiError;
use crate::service::{MessageService, ServiceError};

/// Run a blocking service call off the async runtime.
async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

/// Every stored message; mainly useful for testing.
pub async fn get_all(State(service): State<MessageService>) -> Result<impl IntoResponse, ApiError> {
    let messages = run_blocking(move || service.get_all()).await?;
    Ok(Json(messages))
}

pub async fn get_messages(
    State(service): State<MessageService>,
    Path(recipient_id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = run_blocking(move || {
        service.get_messages(
            &recipient_id,
            query.from_date.as_deref(),
            query.to_date.as_deref(),
        )
    })
    .await?;
    Ok(Json(messages))
}

pub async fn post_message(
    State(service): State<MessageService>,
    Json(req): Json<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = run_blocking(move || service.add_message(&req)).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

pub async fn patch_message(
    State(service): State<MessageService>,
    Path(message_id): Path<String>,
    Json(patch): Json<MessagePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = run_blocking(move || service.update_message(&message_id, &patch)).await?;
    Ok(Json(confirmation))
}

/// `DELETE /messenger/?ids=a,b,c`
pub async fn delete_messages(
    State(service): State<MessageService>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ids = query.ids();
    let confirmation = run_blocking(move || service.delete_messages(&ids)).await?;
    Ok(Json(confirmation))
}
