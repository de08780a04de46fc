//! Entity Directory backed by the stable `clubs` / `events` catalog.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{AppError, Result};
use crate::models::{Club, Entity, FormRole, NewEvent};
use crate::security::sanitize;

/// Lookup of clubs and events by id
#[derive(Clone)]
pub struct EntityDirectory {
    pool: SqlitePool,
}

impl EntityDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the entity that owns forms of the given role
    ///
    /// Applications belong to events, recruitments to clubs.
    pub async fn find(&self, role: FormRole, id: i64) -> Result<Option<Entity>> {
        let query = match role {
            FormRole::Application => {
                "SELECT event_id AS id, event_name AS display_name FROM events WHERE event_id = ?1"
            }
            FormRole::Recruitment => {
                "SELECT club_id AS id, club_name AS display_name FROM clubs WHERE club_id = ?1"
            }
        };

        let row: Option<(i64, String)> = sqlx::query_as(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, display_name)| Entity { id, display_name }))
    }

    /// All clubs in catalog order
    pub async fn list_clubs(&self) -> Result<Vec<Club>> {
        let clubs = sqlx::query_as::<_, Club>(
            r#"
            SELECT club_id, club_name, club_description, club_logo_image
            FROM clubs
            ORDER BY club_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clubs)
    }

    /// Add a club to the catalog, returning its id
    ///
    /// Fails with `AppError::Schema` when another club already owns the name
    /// or the form table it folds to.
    pub async fn register_club(
        &self,
        club_name: &str,
        club_description: Option<&str>,
        club_logo_image: Option<&str>,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO clubs (club_name, club_description, club_logo_image, form_table)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(club_name)
        .bind(club_description)
        .bind(club_logo_image)
        .bind(form_table(club_name, FormRole::Recruitment))
        .execute(&self.pool)
        .await
        .map_err(|e| name_taken(e, "club", club_name))?;

        Ok(result.last_insert_rowid())
    }

    /// Add an event to the catalog on an existing connection, returning its id
    ///
    /// Takes a connection so the caller can create the event and its form in
    /// one transaction. Name clashes are reported like [`Self::register_club`].
    pub async fn register_event(conn: &mut SqliteConnection, event: &NewEvent) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (club_id, event_name, event_description, event_image,
                                event_date, event_time, event_venue, form_table)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(event.club_id)
        .bind(event.event_name.as_str())
        .bind(event.event_description.as_deref())
        .bind(event.event_image.as_deref())
        .bind(event.event_date.as_deref())
        .bind(event.event_time.as_deref())
        .bind(event.event_venue.as_deref())
        .bind(form_table(&event.event_name, FormRole::Application))
        .execute(&mut *conn)
        .await
        .map_err(|e| name_taken(e, "event", &event.event_name))?;

        Ok(result.last_insert_rowid())
    }
}

/// Form table an entity name folds to, if it can host one
fn form_table(display_name: &str, role: FormRole) -> Option<String> {
    sanitize(display_name, role.suffix())
        .ok()
        .map(|table| table.as_str().to_string())
}

fn name_taken(err: sqlx::Error, kind: &str, name: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref e) if e.is_unique_violation() => AppError::Schema(format!(
            "A {} named '{}' (or one that folds to the same form table) already exists",
            kind, name
        )),
        other => AppError::Storage(other),
    }
}
