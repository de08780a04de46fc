//! Form lifecycle for clubs and events.
//!
//! Resolves `(role, entity id)` to the entity's form table and runs each
//! lifecycle step on a single pooled connection or transaction.

use serde_json::{Map, Value};
use sqlx::SqlitePool;

use crate::db::{dynamic, guard, submissions, EntityDirectory};
use crate::error::{AppError, Result};
use crate::export;
use crate::models::{Club, Entity, FieldDescriptor, FormField, FormRole, NewEvent};
use crate::security::{sanitize, TableName};

pub use crate::db::submissions::Submissions;

/// Exported responses ready to be sent as a download
#[derive(Debug, Clone)]
pub struct Export {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Clone)]
pub struct Forms {
    pool: SqlitePool,
    directory: EntityDirectory,
    max_submissions: u32,
}

impl Forms {
    pub fn new(pool: SqlitePool, max_submissions: u32) -> Self {
        Self {
            directory: EntityDirectory::new(pool.clone()),
            pool,
            max_submissions,
        }
    }

    pub fn directory(&self) -> &EntityDirectory {
        &self.directory
    }

    /// Look up the owning entity and derive its form table name
    pub async fn resolve(&self, role: FormRole, id: i64) -> Result<(Entity, TableName)> {
        let entity = self
            .directory
            .find(role, id)
            .await?
            .ok_or_else(|| AppError::NotFound(role.entity_not_found().to_string()))?;

        let table = sanitize(&entity.display_name, role.suffix())?;
        Ok((entity, table))
    }

    /// Define (or redefine) an entity's form, discarding earlier submissions
    ///
    /// Table creation and guard installation commit together.
    pub async fn open_form(
        &self,
        role: FormRole,
        id: i64,
        fields: &[FieldDescriptor],
    ) -> Result<TableName> {
        let (entity, table) = self.resolve(role, id).await?;

        let mut tx = self.pool.begin().await?;
        dynamic::create_table(&mut *tx, &table, fields).await?;
        guard::install_guard(&mut *tx, &table, self.max_submissions).await?;
        tx.commit().await?;

        tracing::info!(
            "Opened form {} for {} ({} fields)",
            table,
            entity.display_name,
            fields.len()
        );

        Ok(table)
    }

    /// Add an event to the catalog together with its application form
    ///
    /// Fails without side effects if the club is unknown, the event name
    /// cannot host a form, or another event (open or closed) already claims
    /// the derived table.
    pub async fn create_event(&self, event: &NewEvent, fields: &[FieldDescriptor]) -> Result<i64> {
        if self
            .directory
            .find(FormRole::Recruitment, event.club_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(
                FormRole::Recruitment.entity_not_found().to_string(),
            ));
        }

        let table = sanitize(&event.event_name, FormRole::Application.suffix())?;

        let mut tx = self.pool.begin().await?;

        if dynamic::table_exists(&mut *tx, &table).await? {
            return Err(AppError::Schema(format!(
                "An event named '{}' already has an application form",
                event.event_name
            )));
        }

        let event_id = EntityDirectory::register_event(&mut *tx, event).await?;

        dynamic::create_table(&mut *tx, &table, fields).await?;
        guard::install_guard(&mut *tx, &table, self.max_submissions).await?;
        tx.commit().await?;

        tracing::info!(
            "Created event {} ({}) with application form {}",
            event_id,
            event.event_name,
            table
        );

        Ok(event_id)
    }

    /// Whether the entity currently has an open form
    ///
    /// An entity whose name cannot host a form never has one.
    pub async fn form_exists(&self, role: FormRole, id: i64) -> Result<bool> {
        let table = match self.resolve(role, id).await {
            Ok((_, table)) => table,
            Err(AppError::Schema(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        let mut conn = self.pool.acquire().await?;
        dynamic::table_exists(&mut conn, &table).await
    }

    /// Field definitions of the entity's open form
    pub async fn form_fields(&self, role: FormRole, id: i64) -> Result<Vec<FormField>> {
        let (_, table) = self.resolve(role, id).await?;
        let mut conn = self.pool.acquire().await?;
        dynamic::introspect(&mut conn, &table)
            .await
            .map_err(|e| form_missing(e, role))
    }

    /// Record one submission against the entity's open form
    pub async fn submit(&self, role: FormRole, id: i64, values: &Map<String, Value>) -> Result<()> {
        let (entity, table) = self.resolve(role, id).await?;

        let mut tx = self.pool.begin().await?;
        submissions::insert(&mut *tx, &table, values, self.max_submissions)
            .await
            .map_err(|e| form_missing(e, role))?;
        tx.commit().await?;

        tracing::info!("Accepted submission for {} ({})", entity.display_name, table);

        Ok(())
    }

    /// All submissions collected so far
    pub async fn responses(&self, role: FormRole, id: i64) -> Result<Submissions> {
        let (_, table) = self.resolve(role, id).await?;
        let mut conn = self.pool.acquire().await?;
        submissions::list_all(&mut conn, &table)
            .await
            .map_err(|e| form_missing(e, role))
    }

    /// Snapshot of all submissions as CSV
    pub async fn export(&self, role: FormRole, id: i64) -> Result<Export> {
        let (entity, table) = self.resolve(role, id).await?;
        let mut conn = self.pool.acquire().await?;
        let data = submissions::list_all(&mut conn, &table)
            .await
            .map_err(|e| form_missing(e, role))?;

        tracing::info!(
            "Exported {} submissions from {}",
            data.rows.len(),
            table
        );

        Ok(Export {
            filename: export::attachment_filename(&entity.display_name, role),
            content: export::to_delimited_text(&data.columns, &data.rows),
        })
    }

    /// Close the entity's form, permanently deleting its submissions
    pub async fn close_form(&self, role: FormRole, id: i64) -> Result<()> {
        let (entity, table) = self.resolve(role, id).await?;
        let mut conn = self.pool.acquire().await?;
        dynamic::drop_table(&mut conn, &table).await?;

        tracing::info!("Closed form {} for {}", table, entity.display_name);

        Ok(())
    }

    /// Clubs with an open recruitment form
    pub async fn recruiting_clubs(&self) -> Result<Vec<Club>> {
        let clubs = self.directory.list_clubs().await?;
        let mut conn = self.pool.acquire().await?;

        let mut recruiting = Vec::new();
        for club in clubs {
            let Ok(table) = sanitize(&club.club_name, FormRole::Recruitment.suffix()) else {
                continue;
            };
            if dynamic::table_exists(&mut conn, &table).await? {
                recruiting.push(club);
            }
        }

        Ok(recruiting)
    }
}

/// Replace the internal "table missing" message with the user-facing one
fn form_missing(err: AppError, role: FormRole) -> AppError {
    match err {
        AppError::NotFound(_) => AppError::NotFound(role.form_not_found().to_string()),
        other => other,
    }
}
