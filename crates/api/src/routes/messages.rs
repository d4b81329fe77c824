//! Templated message routes.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use domain::models::{
    MessageResponse, PreviewMessageRequest, PreviewMessageResponse, ScheduleMessageRequest,
};
use domain::services::{missing_placeholders, render, render_strict};
use persistence::entities::MessageEntity;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Render a template and queue it for the dispatcher.
///
/// POST /api/v1/messages
///
/// Every placeholder in the body and subject needs a value; otherwise the
/// request is rejected with the missing names.
pub async fn schedule_message(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<ScheduleMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    request.validate()?;

    let body = render_strict(&request.template, &request.values)?;
    let subject = request
        .subject
        .as_deref()
        .map(|subject| render_strict(subject, &request.values))
        .transpose()?;

    let scheduled_for = request.scheduled_for.unwrap_or_else(Utc::now);
    let mut message = MessageEntity::new(request.channel, request.recipient, body, scheduled_for);
    message.subject = subject;
    let message = state.messages.add(message, &actor).await?;

    info!(
        message_id = message.audit.id,
        channel = %message.channel,
        scheduled_for = %message.scheduled_for,
        "Message scheduled"
    );

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// POST /api/v1/messages/preview
pub async fn preview_message(
    Json(request): Json<PreviewMessageRequest>,
) -> Json<PreviewMessageResponse> {
    Json(PreviewMessageResponse {
        rendered: render(&request.template, &request.values),
        missing: missing_placeholders(&request.template, &request.values),
    })
}
