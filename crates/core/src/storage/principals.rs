//! Principal storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Principal;

pub struct PrincipalStore<'a> {
    conn: &'a Connection,
}

const PRINCIPAL_COLUMNS: &str = "id, email, username, is_reviewer, created_at";

impl<'a> PrincipalStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new principal
    #[instrument(skip(self, principal), fields(email = %principal.email))]
    pub fn create(&self, principal: &Principal) -> Result<()> {
        self.conn.execute(
            "INSERT INTO principals (id, email, username, is_reviewer, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                principal.id.to_string(),
                principal.email,
                principal.username,
                principal.is_reviewer as i32,
                principal.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find principal by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM principals WHERE id = ?1",
            PRINCIPAL_COLUMNS
        ))?;

        let principal = stmt
            .query_row(params![id.to_string()], Self::map_principal)
            .optional()?;

        Ok(principal)
    }

    /// Find principal by email
    #[instrument(skip(self))]
    pub fn find_by_email(&self, email: &str) -> Result<Option<Principal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM principals WHERE email = ?1",
            PRINCIPAL_COLUMNS
        ))?;

        let principal = stmt
            .query_row(params![email], Self::map_principal)
            .optional()?;

        Ok(principal)
    }

    /// All principals flagged as reviewers
    #[instrument(skip(self))]
    pub fn list_reviewers(&self) -> Result<Vec<Principal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM principals WHERE is_reviewer = 1 ORDER BY email",
            PRINCIPAL_COLUMNS
        ))?;

        let principals = stmt
            .query_map([], Self::map_principal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(principals)
    }

    fn map_principal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Principal> {
        Ok(Principal {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            email: row.get(1)?,
            username: row.get(2)?,
            is_reviewer: row.get::<_, i32>(3)? != 0,
            created_at: parse_datetime(&row.get::<_, String>(4)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let store = db.principals();

        let principal = Principal::new("alice@example.com");
        store.create(&principal).unwrap();

        let found = store.find_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(found.id, principal.id);
        assert_eq!(found.username, "alice@example.com");
    }

    #[test]
    fn test_list_reviewers_filters() {
        let db = Database::open_in_memory().unwrap();
        let store = db.principals();

        store
            .create(&Principal::new("bob@example.com"))
            .unwrap();
        store
            .create(&Principal::new("rev-b@example.com").with_reviewer(true))
            .unwrap();
        store
            .create(&Principal::new("rev-a@example.com").with_reviewer(true))
            .unwrap();

        let emails: Vec<String> = store
            .list_reviewers()
            .unwrap()
            .into_iter()
            .map(|p| p.email)
            .collect();
        assert_eq!(emails, vec!["rev-a@example.com", "rev-b@example.com"]);
    }
}
