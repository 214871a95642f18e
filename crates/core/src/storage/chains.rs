//! Chain storage operations

use rusqlite::{params, params_from_iter, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, price_range_from_u8, OptionalExt};
use crate::error::{Error, Result};
use crate::models::Chain;

pub struct ChainStore<'a> {
    conn: &'a Connection,
}

const CHAIN_COLUMNS: &str = "id, title, slug, description, email, phone, website, \
     sales_contact, price_range, auto_assign, recipient_email, created_at, updated_at";

impl<'a> ChainStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new chain
    #[instrument(skip(self, chain), fields(title = %chain.title))]
    pub fn create(&self, chain: &Chain) -> Result<()> {
        self.conn.execute(
            "INSERT INTO chains (id, title, slug, description, email, phone, website, \
             sales_contact, price_range, auto_assign, recipient_email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                chain.id.to_string(),
                chain.title,
                chain.slug,
                chain.description,
                chain.email,
                chain.phone,
                chain.website,
                chain.sales_contact,
                chain.price_range as u8,
                chain.auto_assign as i32,
                chain.recipient_email,
                chain.created_at.to_rfc3339(),
                chain.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find chain by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Chain>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM chains WHERE id = ?1", CHAIN_COLUMNS))?;

        let chain = stmt
            .query_row(params![id.to_string()], Self::map_chain)
            .optional()?;

        Ok(chain)
    }

    /// Find chain by title, comparing case-insensitively
    #[instrument(skip(self))]
    pub fn find_by_title(&self, title: &str) -> Result<Option<Chain>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM chains WHERE title = ?1 COLLATE NOCASE",
            CHAIN_COLUMNS
        ))?;

        let chain = stmt.query_row(params![title], Self::map_chain).optional()?;

        Ok(chain)
    }

    /// List all chains ordered by title
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Chain>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM chains ORDER BY title",
            CHAIN_COLUMNS
        ))?;

        let chains = stmt
            .query_map([], Self::map_chain)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(chains)
    }

    /// Chains eligible to be auto-assigned for the given name tokens
    ///
    /// A chain qualifies when its title contains any token
    /// (case-insensitive substring), its title is longer than 3 characters,
    /// and its auto-assign flag is set. Results are ordered by creation
    /// time then id so callers see a stable order.
    #[instrument(skip(self))]
    pub fn auto_assign_candidates(&self, tokens: &[String]) -> Result<Vec<Chain>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let clauses = vec!["LOWER(title) LIKE ? ESCAPE '\\'"; tokens.len()].join(" OR ");
        let sql = format!(
            "SELECT {} FROM chains
             WHERE auto_assign = 1 AND LENGTH(title) > 3 AND ({})
             ORDER BY created_at, id",
            CHAIN_COLUMNS, clauses
        );

        let patterns: Vec<String> = tokens.iter().map(|t| like_pattern(t)).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let chains = stmt
            .query_map(params_from_iter(patterns.iter()), Self::map_chain)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(chains)
    }

    /// Update a chain
    #[instrument(skip(self, chain), fields(chain_id = %chain.id))]
    pub fn update(&self, chain: &Chain) -> Result<()> {
        self.conn.execute(
            "UPDATE chains SET title = ?1, description = ?2, email = ?3, phone = ?4, \
             website = ?5, sales_contact = ?6, price_range = ?7, auto_assign = ?8, \
             recipient_email = ?9, updated_at = ?10
             WHERE id = ?11",
            params![
                chain.title,
                chain.description,
                chain.email,
                chain.phone,
                chain.website,
                chain.sales_contact,
                chain.price_range as u8,
                chain.auto_assign as i32,
                chain.recipient_email,
                chain.updated_at.to_rfc3339(),
                chain.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a chain
    ///
    /// Fails while any hotel or draft still references it (PROTECT
    /// semantics).
    #[instrument(skip(self))]
    pub fn delete(&self, chain_id: Uuid) -> Result<()> {
        let hotels = self.count_hotels(chain_id)?;
        if hotels > 0 {
            return Err(Error::ReferentialIntegrity(format!(
                "chain {} is referenced by {} hotel(s)",
                chain_id, hotels
            )));
        }

        let drafts: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM drafts WHERE chain_id = ?1",
            params![chain_id.to_string()],
            |row| row.get(0),
        )?;
        if drafts > 0 {
            return Err(Error::ReferentialIntegrity(format!(
                "chain {} is referenced by {} draft(s)",
                chain_id, drafts
            )));
        }

        self.conn.execute(
            "DELETE FROM chains WHERE id = ?1",
            params![chain_id.to_string()],
        )?;
        Ok(())
    }

    /// Number of hotels in the chain
    pub fn count_hotels(&self, chain_id: Uuid) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM hotels WHERE chain_id = ?1",
            params![chain_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Whether a slug is already taken
    pub fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM chains WHERE slug = ?1",
            params![slug],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn map_chain(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chain> {
        Ok(Chain {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            title: row.get(1)?,
            slug: row.get(2)?,
            description: row.get(3)?,
            email: row.get(4)?,
            phone: row.get(5)?,
            website: row.get(6)?,
            sales_contact: row.get(7)?,
            price_range: price_range_from_u8(row.get::<_, u8>(8)?),
            auto_assign: row.get::<_, i32>(9)? != 0,
            recipient_email: row.get(10)?,
            created_at: parse_datetime(&row.get::<_, String>(11)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(12)?)?,
        })
    }
}

/// Build a contains-pattern for LIKE, escaping its wildcards
fn like_pattern(token: &str) -> String {
    let escaped = token
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceRange;
    use crate::storage::Database;

    #[test]
    fn test_create_and_find_by_title_nocase() {
        let db = Database::open_in_memory().unwrap();
        let store = db.chains();

        store.create(&Chain::new("test hotel chain")).unwrap();

        let found = store.find_by_title("TEST HOTEL CHAIN").unwrap().unwrap();
        assert_eq!(found.title, "Test Hotel Chain");
        assert_eq!(found.slug, "test-hotel-chain");
    }

    #[test]
    fn test_title_unique_case_insensitive() {
        let db = Database::open_in_memory().unwrap();
        let store = db.chains();

        let mut duplicate = Chain::new("test chain");
        duplicate.slug = "test-chain-2".to_string();
        duplicate.title = "TEST CHAIN".to_string();

        store.create(&Chain::new("test chain")).unwrap();
        assert!(store.create(&duplicate).is_err());
    }

    #[test]
    fn test_auto_assign_candidates_filters() {
        let db = Database::open_in_memory().unwrap();
        let store = db.chains();

        store
            .create(&Chain::new("test hotel").with_auto_assign(true))
            .unwrap();
        store.create(&Chain::new("test resort")).unwrap();
        store
            .create(&Chain::new("unrelated brand").with_auto_assign(true))
            .unwrap();

        let tokens = vec!["test".to_string(), "hotel".to_string()];
        let candidates = store.auto_assign_candidates(&tokens).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Test Hotel");
    }

    #[test]
    fn test_auto_assign_candidates_title_length() {
        let db = Database::open_in_memory().unwrap();
        let store = db.chains();

        // "Inn" contains the token but is too short to qualify
        store.create(&Chain::new("inn").with_auto_assign(true)).unwrap();
        store.create(&Chain::new("inns").with_auto_assign(true)).unwrap();

        let candidates = store
            .auto_assign_candidates(&["inn".to_string()])
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Inns");
    }

    #[test]
    fn test_auto_assign_candidates_empty_tokens() {
        let db = Database::open_in_memory().unwrap();
        let store = db.chains();

        store
            .create(&Chain::new("test hotel").with_auto_assign(true))
            .unwrap();

        assert!(store.auto_assign_candidates(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_like_wildcards_are_literal() {
        let db = Database::open_in_memory().unwrap();
        let store = db.chains();

        store
            .create(&Chain::new("grand plaza").with_auto_assign(true))
            .unwrap();

        // A bare wildcard token must not match everything
        let candidates = store
            .auto_assign_candidates(&["%".to_string()])
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_update() {
        let db = Database::open_in_memory().unwrap();
        let store = db.chains();

        let mut chain = Chain::new("test chain");
        store.create(&chain).unwrap();

        chain.price_range = PriceRange::Luxury;
        chain.recipient_email = Some("owner@example.com".to_string());
        store.update(&chain).unwrap();

        let found = store.find_by_id(chain.id).unwrap().unwrap();
        assert_eq!(found.price_range, PriceRange::Luxury);
        assert_eq!(found.recipient_email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn test_delete_protected_while_referenced() {
        let db = Database::open_in_memory().unwrap();
        let chain = Chain::new("test chain");
        db.chains().create(&chain).unwrap();

        let hotel = crate::models::Hotel::new("test hotel").with_chain(chain.id);
        db.hotels().create(&hotel).unwrap();

        let result = db.chains().delete(chain.id);
        assert!(matches!(result, Err(Error::ReferentialIntegrity(_))));
        assert_eq!(db.chains().count_hotels(chain.id).unwrap(), 1);
    }

    #[test]
    fn test_delete_unreferenced() {
        let db = Database::open_in_memory().unwrap();
        let chain = Chain::new("test chain");
        db.chains().create(&chain).unwrap();

        db.chains().delete(chain.id).unwrap();
        assert!(db.chains().find_by_id(chain.id).unwrap().is_none());
    }

    #[test]
    fn test_list_ordered_by_title() {
        let db = Database::open_in_memory().unwrap();
        let store = db.chains();

        store.create(&Chain::new("zeta stays")).unwrap();
        store.create(&Chain::new("alpha inns")).unwrap();

        let titles: Vec<String> = store.list().unwrap().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Alpha Inns", "Zeta Stays"]);
    }
}
