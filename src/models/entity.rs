use serde::{Deserialize, Serialize};

use crate::constants::{
    APPLICATIONS_SUFFIX, ERR_CLUB_NOT_FOUND, ERR_EVENT_NOT_FOUND, ERR_NO_APPLICATION_FORM,
    ERR_NO_RECRUITMENT_FORM, RECRUITMENTS_SUFFIX,
};

/// Purpose of a form table, which also decides the kind of entity owning it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormRole {
    /// Event registration form, owned by an event
    Application,
    /// Club membership form, owned by a club
    Recruitment,
}

impl FormRole {
    pub fn suffix(self) -> &'static str {
        match self {
            FormRole::Application => APPLICATIONS_SUFFIX,
            FormRole::Recruitment => RECRUITMENTS_SUFFIX,
        }
    }

    pub fn entity_not_found(self) -> &'static str {
        match self {
            FormRole::Application => ERR_EVENT_NOT_FOUND,
            FormRole::Recruitment => ERR_CLUB_NOT_FOUND,
        }
    }

    pub fn form_not_found(self) -> &'static str {
        match self {
            FormRole::Application => ERR_NO_APPLICATION_FORM,
            FormRole::Recruitment => ERR_NO_RECRUITMENT_FORM,
        }
    }

    /// Suffix of the download name for exported responses
    pub fn export_suffix(self) -> &'static str {
        match self {
            FormRole::Application => "_responses.csv",
            FormRole::Recruitment => "_recruitment_responses.csv",
        }
    }
}

/// A club or event as known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: i64,
    pub display_name: String,
}

/// Club summary returned by listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Club {
    pub club_id: i64,
    pub club_name: String,
    pub club_description: Option<String>,
    pub club_logo_image: Option<String>,
}

/// Catalog data for a new event
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub club_id: i64,
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_image: Option<String>,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub event_venue: Option<String>,
}
