use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::{FieldDescriptor, FormRole, NewEvent};
use crate::routes::forms::{
    self, FieldsResponse, MessageResponse, ResponsesResponse, StatusResponse,
};
use crate::AppState;

const ROLE: FormRole = FormRole::Application;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub club_id: i64,
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_image: Option<String>,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub event_venue: Option<String>,
    #[serde(default)]
    pub event_fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "eventId")]
    pub event_id: i64,
}

/// Create an event and open its application form
///
/// The catalog row, form table and submission guard are committed together.
///
/// POST /api/events/create
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<CreateEventResponse>> {
    let event = NewEvent {
        club_id: payload.club_id,
        event_name: payload.event_name,
        event_description: payload.event_description,
        event_image: payload.event_image,
        event_date: payload.event_date,
        event_time: payload.event_time,
        event_venue: payload.event_venue,
    };

    let event_id = state
        .forms
        .create_event(&event, &payload.event_fields)
        .await?;

    Ok(Json(CreateEventResponse {
        success: true,
        message: "Event created successfully".to_string(),
        event_id,
    }))
}

/// GET /api/events/application/:event_id
pub async fn application_status(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<StatusResponse>> {
    forms::status(&state, ROLE, event_id).await
}

/// GET /api/events/application/details/:event_id
pub async fn application_details(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<FieldsResponse>> {
    forms::details(&state, ROLE, event_id).await
}

/// POST /api/events/apply/:event_id
pub async fn apply_to_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(values): Json<Map<String, Value>>,
) -> Result<Json<MessageResponse>> {
    forms::apply(&state, ROLE, event_id, &values).await
}

/// GET /api/events/application/responses/:event_id
pub async fn application_responses(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<ResponsesResponse>> {
    forms::responses(&state, ROLE, event_id).await
}

/// GET /api/events/download_responses/:event_id
pub async fn download_application_responses(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Response> {
    forms::download(&state, ROLE, event_id).await
}

/// Close registrations and delete all applications
///
/// POST /api/events/close_registrations/:event_id
pub async fn close_registrations(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    state.forms.close_form(ROLE, event_id).await?;
    Ok(MessageResponse::ok("Event registrations closed successfully"))
}
