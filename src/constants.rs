/// Table suffix for event application forms
pub const APPLICATIONS_SUFFIX: &str = "_applications";

/// Table suffix for club recruitment forms
pub const RECRUITMENTS_SUFFIX: &str = "_recruitments";

/// Name of the synthetic identity column every form table starts with
pub const IDENTITY_COLUMN: &str = "id";

/// Default cap on rows per form table
pub const DEFAULT_MAX_SUBMISSIONS: u32 = 3;

/// Suffix appended to a form table name to name its insert guard
pub const GUARD_TRIGGER_SUFFIX: &str = "_submission_guard";

/// Marker raised by the insert guard. Used to recognize capacity aborts
/// among other constraint failures.
pub const GUARD_ABORT_MARKER: &str = "submission limit reached";

/// SQLite reserves this prefix for internal objects
pub const RESERVED_TABLE_PREFIX: &str = "sqlite_";

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for a club id with no catalog entry
pub const ERR_CLUB_NOT_FOUND: &str = "Club not found";

/// Error message for an event id with no catalog entry
pub const ERR_EVENT_NOT_FOUND: &str = "Event not found";

/// Error message for a recruitment form that is not open
pub const ERR_NO_RECRUITMENT_FORM: &str = "No recruitment form found";

/// Error message for an application form that is not open
pub const ERR_NO_APPLICATION_FORM: &str = "No application form found";

/// Error message for a form definition without fields
pub const ERR_EMPTY_FIELDS: &str = "A form needs at least one field";

/// Error message for an empty submission
pub const ERR_EMPTY_SUBMISSION: &str = "Submission contains no fields";
