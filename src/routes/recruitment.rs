use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::{Club, FormRole};
use crate::routes::forms::{
    self, CreateFormRequest, FieldsResponse, MessageResponse, ResponsesResponse, StatusResponse,
};
use crate::AppState;

const ROLE: FormRole = FormRole::Recruitment;

#[derive(Debug, Serialize)]
pub struct RecruitingClubsResponse {
    pub success: bool,
    pub clubs: Vec<Club>,
}

/// Define a club's recruitment form
///
/// Replaces any earlier form of the club; its submissions are discarded.
///
/// POST /api/recruitment/create
pub async fn create_recruitment_form(
    State(state): State<AppState>,
    Json(payload): Json<CreateFormRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .forms
        .open_form(ROLE, payload.club_id, &payload.fields)
        .await?;

    Ok(MessageResponse::ok("Recruitment form created successfully"))
}

/// GET /api/recruitment/status/:club_id
pub async fn recruitment_status(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<Json<StatusResponse>> {
    forms::status(&state, ROLE, club_id).await
}

/// GET /api/recruitment/details/:club_id
pub async fn recruitment_details(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<Json<FieldsResponse>> {
    forms::details(&state, ROLE, club_id).await
}

/// POST /api/recruitment/apply/:club_id
pub async fn apply_to_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Json(values): Json<Map<String, Value>>,
) -> Result<Json<MessageResponse>> {
    forms::apply(&state, ROLE, club_id, &values).await
}

/// GET /api/recruitment/responses/:club_id
pub async fn recruitment_responses(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<Json<ResponsesResponse>> {
    forms::responses(&state, ROLE, club_id).await
}

/// GET /api/recruitment/download_responses/:club_id
pub async fn download_recruitment_responses(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<Response> {
    forms::download(&state, ROLE, club_id).await
}

/// Close recruitment and delete all submissions
///
/// This action is irreversible; download the responses first if needed.
///
/// POST /api/recruitment/close/:club_id
pub async fn close_recruitment(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    state.forms.close_form(ROLE, club_id).await?;
    Ok(MessageResponse::ok("Club recruitments closed successfully"))
}

/// GET /api/recruiting-clubs
pub async fn recruiting_clubs(
    State(state): State<AppState>,
) -> Result<Json<RecruitingClubsResponse>> {
    let clubs = state.forms.recruiting_clubs().await?;
    Ok(Json(RecruitingClubsResponse {
        success: true,
        clubs,
    }))
}
