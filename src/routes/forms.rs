//! Request/response types and handler bodies shared by club and event forms.

use axum::{
    body::Body,
    http::header,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{FieldDescriptor, FormField, FormRole};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFormRequest {
    #[serde(rename = "clubId")]
    pub club_id: i64,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub success: bool,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Serialize)]
pub struct ResponsesResponse {
    pub success: bool,
    pub columns: Vec<String>,
    pub responses: Vec<Map<String, Value>>,
}

pub async fn status(state: &AppState, role: FormRole, id: i64) -> Result<Json<StatusResponse>> {
    let exists = state.forms.form_exists(role, id).await?;
    Ok(Json(StatusResponse {
        success: true,
        exists,
    }))
}

pub async fn details(state: &AppState, role: FormRole, id: i64) -> Result<Json<FieldsResponse>> {
    let fields = state.forms.form_fields(role, id).await?;
    Ok(Json(FieldsResponse {
        success: true,
        fields,
    }))
}

pub async fn apply(
    state: &AppState,
    role: FormRole,
    id: i64,
    values: &Map<String, Value>,
) -> Result<Json<MessageResponse>> {
    state.forms.submit(role, id, values).await?;
    Ok(MessageResponse::ok("Application submitted successfully"))
}

pub async fn responses(
    state: &AppState,
    role: FormRole,
    id: i64,
) -> Result<Json<ResponsesResponse>> {
    let data = state.forms.responses(role, id).await?;
    Ok(Json(ResponsesResponse {
        success: true,
        responses: data.records(),
        columns: data.columns,
    }))
}

/// Exported responses as a CSV attachment
pub async fn download(state: &AppState, role: FormRole, id: i64) -> Result<Response> {
    let export = state.forms.export(role, id).await?;

    Response::builder()
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        )
        .body(Body::from(export.content))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))
}
