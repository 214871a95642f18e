//! Draft storage operations

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{draft_status_from_str, parse_datetime, parse_uuid, parse_uuid_opt, OptionalExt};
use crate::error::Result;
use crate::models::{Draft, DraftStatus};

pub struct DraftStore<'a> {
    conn: &'a Connection,
}

const DRAFT_COLUMNS: &str = "id, slug, hotel_id, created_by, name, location, photo, \
     chain_id, is_active, status, created_at, updated_at";

impl<'a> DraftStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new draft
    #[instrument(skip(self, draft), fields(hotel_id = %draft.hotel_id))]
    pub fn create(&self, draft: &Draft) -> Result<()> {
        self.conn.execute(
            "INSERT INTO drafts (id, slug, hotel_id, created_by, name, location, photo, \
             chain_id, is_active, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                draft.id.to_string(),
                draft.slug,
                draft.hotel_id.to_string(),
                draft.created_by.to_string(),
                draft.name,
                draft.location,
                draft.photo,
                draft.chain_id.map(|c| c.to_string()),
                draft.is_active.map(|a| a as i32),
                draft.status.as_str(),
                draft.created_at.to_rfc3339(),
                draft.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find draft by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Draft>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM drafts WHERE id = ?1", DRAFT_COLUMNS))?;

        let draft = stmt
            .query_row(params![id.to_string()], Self::map_draft)
            .optional()?;

        Ok(draft)
    }

    /// List all drafts, newest first
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Draft>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM drafts ORDER BY created_at DESC",
            DRAFT_COLUMNS
        ))?;

        let drafts = stmt
            .query_map([], Self::map_draft)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(drafts)
    }

    /// List drafts targeting a hotel, newest first
    #[instrument(skip(self))]
    pub fn list_for_hotel(&self, hotel_id: Uuid) -> Result<Vec<Draft>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM drafts WHERE hotel_id = ?1 ORDER BY created_at DESC",
            DRAFT_COLUMNS
        ))?;

        let drafts = stmt
            .query_map(params![hotel_id.to_string()], Self::map_draft)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(drafts)
    }

    /// Update a draft's proposed fields
    #[instrument(skip(self, draft), fields(draft_id = %draft.id))]
    pub fn update(&self, draft: &Draft) -> Result<()> {
        self.conn.execute(
            "UPDATE drafts SET name = ?1, location = ?2, photo = ?3, chain_id = ?4, \
             is_active = ?5, status = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                draft.name,
                draft.location,
                draft.photo,
                draft.chain_id.map(|c| c.to_string()),
                draft.is_active.map(|a| a as i32),
                draft.status.as_str(),
                draft.updated_at.to_rfc3339(),
                draft.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Update only a draft's status
    #[instrument(skip(self))]
    pub fn update_status(&self, draft_id: Uuid, status: DraftStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE drafts SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                status.as_str(),
                Utc::now().to_rfc3339(),
                draft_id.to_string()
            ],
        )?;
        Ok(())
    }

    /// Whether a slug is already taken
    pub fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM drafts WHERE slug = ?1",
            params![slug],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn map_draft(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draft> {
        Ok(Draft {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            slug: row.get(1)?,
            hotel_id: parse_uuid(&row.get::<_, String>(2)?)?,
            created_by: parse_uuid(&row.get::<_, String>(3)?)?,
            name: row.get(4)?,
            location: row.get(5)?,
            photo: row.get(6)?,
            chain_id: parse_uuid_opt(row.get::<_, Option<String>>(7)?)?,
            is_active: row.get::<_, Option<i32>>(8)?.map(|a| a != 0),
            status: draft_status_from_str(&row.get::<_, String>(9)?),
            created_at: parse_datetime(&row.get::<_, String>(10)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(11)?)?,
        })
    }
}
