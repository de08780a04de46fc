pub mod events;
pub mod forms;
pub mod health;
pub mod recruitment;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use events::{
    application_details, application_responses, application_status, apply_to_event,
    close_registrations, create_event, download_application_responses,
};
pub use health::health_check;
pub use recruitment::{
    apply_to_club, close_recruitment, create_recruitment_form, download_recruitment_responses,
    recruiting_clubs, recruitment_details, recruitment_responses, recruitment_status,
};

/// All API routes, still expecting the application state
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        // Club recruitment forms
        .route("/api/recruitment/create", post(create_recruitment_form))
        .route("/api/recruitment/status/:club_id", get(recruitment_status))
        .route("/api/recruitment/details/:club_id", get(recruitment_details))
        .route("/api/recruitment/apply/:club_id", post(apply_to_club))
        .route("/api/recruitment/responses/:club_id", get(recruitment_responses))
        .route(
            "/api/recruitment/download_responses/:club_id",
            get(download_recruitment_responses),
        )
        .route("/api/recruitment/close/:club_id", post(close_recruitment))
        .route("/api/recruiting-clubs", get(recruiting_clubs))
        // Event application forms
        .route("/api/events/create", post(create_event))
        .route("/api/events/application/:event_id", get(application_status))
        .route(
            "/api/events/application/details/:event_id",
            get(application_details),
        )
        .route("/api/events/apply/:event_id", post(apply_to_event))
        .route(
            "/api/events/application/responses/:event_id",
            get(application_responses),
        )
        .route(
            "/api/events/download_responses/:event_id",
            get(download_application_responses),
        )
        .route(
            "/api/events/close_registrations/:event_id",
            post(close_registrations),
        )
}
