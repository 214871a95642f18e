//! SQLite storage layer for Lodgekit

mod chains;
mod drafts;
mod hotels;
mod migrations;
mod parse;
mod principals;
mod traits;

use std::path::Path;

use rusqlite::Connection;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Chain, Draft, DraftStatus, Hotel, Principal};

pub use chains::ChainStore;
pub use drafts::DraftStore;
pub use hotels::HotelStore;
pub use principals::PrincipalStore;
pub use traits::{
    ChainRepository, DraftRepository, HotelRepository, PrincipalRepository, Storage,
};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get chain store
    pub fn chains(&self) -> ChainStore<'_> {
        ChainStore::new(&self.conn)
    }

    /// Get hotel store
    pub fn hotels(&self) -> HotelStore<'_> {
        HotelStore::new(&self.conn)
    }

    /// Get draft store
    pub fn drafts(&self) -> DraftStore<'_> {
        DraftStore::new(&self.conn)
    }

    /// Get principal store
    pub fn principals(&self) -> PrincipalStore<'_> {
        PrincipalStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl ChainRepository for Database {
    fn create_chain(&self, chain: &Chain) -> Result<()> {
        self.chains().create(chain)
    }

    fn find_chain_by_id(&self, id: Uuid) -> Result<Option<Chain>> {
        self.chains().find_by_id(id)
    }

    fn find_chain_by_title(&self, title: &str) -> Result<Option<Chain>> {
        self.chains().find_by_title(title)
    }

    fn list_chains(&self) -> Result<Vec<Chain>> {
        self.chains().list()
    }

    fn auto_assign_candidates(&self, tokens: &[String]) -> Result<Vec<Chain>> {
        self.chains().auto_assign_candidates(tokens)
    }

    fn update_chain(&self, chain: &Chain) -> Result<()> {
        self.chains().update(chain)
    }

    fn delete_chain(&self, chain_id: Uuid) -> Result<()> {
        self.chains().delete(chain_id)
    }

    fn count_chain_hotels(&self, chain_id: Uuid) -> Result<u64> {
        self.chains().count_hotels(chain_id)
    }

    fn chain_slug_exists(&self, slug: &str) -> Result<bool> {
        self.chains().slug_exists(slug)
    }
}

impl HotelRepository for Database {
    fn create_hotel(&self, hotel: &Hotel) -> Result<()> {
        self.hotels().create(hotel)
    }

    fn find_hotel_by_id(&self, id: Uuid) -> Result<Option<Hotel>> {
        self.hotels().find_by_id(id)
    }

    fn find_hotel_by_name(&self, name: &str) -> Result<Option<Hotel>> {
        self.hotels().find_by_name(name)
    }

    fn find_hotel_by_slug(&self, slug: &str) -> Result<Option<Hotel>> {
        self.hotels().find_by_slug(slug)
    }

    fn list_hotels(&self) -> Result<Vec<Hotel>> {
        self.hotels().list()
    }

    fn list_hotels_by_chain(&self, chain_id: Uuid) -> Result<Vec<Hotel>> {
        self.hotels().list_by_chain(chain_id)
    }

    fn update_hotel(&self, hotel: &Hotel) -> Result<()> {
        self.hotels().update(hotel)
    }

    fn hotel_name_exists(&self, name: &str, exclude: Option<Uuid>) -> Result<bool> {
        self.hotels().name_exists(name, exclude)
    }

    fn hotel_slug_exists(&self, slug: &str) -> Result<bool> {
        self.hotels().slug_exists(slug)
    }

    fn related_hotel_ids(&self, hotel_id: Uuid) -> Result<Vec<Uuid>> {
        self.hotels().related_ids(hotel_id)
    }

    fn replace_related_hotels(&self, hotel_id: Uuid, related: &[Uuid]) -> Result<()> {
        self.hotels().replace_related(hotel_id, related)
    }

    fn clear_related_hotels(&self, hotel_id: Uuid) -> Result<()> {
        self.hotels().clear_related(hotel_id)
    }
}

impl DraftRepository for Database {
    fn create_draft(&self, draft: &Draft) -> Result<()> {
        self.drafts().create(draft)
    }

    fn find_draft_by_id(&self, id: Uuid) -> Result<Option<Draft>> {
        self.drafts().find_by_id(id)
    }

    fn list_drafts(&self) -> Result<Vec<Draft>> {
        self.drafts().list()
    }

    fn list_drafts_for_hotel(&self, hotel_id: Uuid) -> Result<Vec<Draft>> {
        self.drafts().list_for_hotel(hotel_id)
    }

    fn update_draft(&self, draft: &Draft) -> Result<()> {
        self.drafts().update(draft)
    }

    fn update_draft_status(&self, draft_id: Uuid, status: DraftStatus) -> Result<()> {
        self.drafts().update_status(draft_id, status)
    }

    fn draft_slug_exists(&self, slug: &str) -> Result<bool> {
        self.drafts().slug_exists(slug)
    }
}

impl PrincipalRepository for Database {
    fn create_principal(&self, principal: &Principal) -> Result<()> {
        self.principals().create(principal)
    }

    fn find_principal_by_id(&self, id: Uuid) -> Result<Option<Principal>> {
        self.principals().find_by_id(id)
    }

    fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>> {
        self.principals().find_by_email(email)
    }

    fn list_reviewers(&self) -> Result<Vec<Principal>> {
        self.principals().list_reviewers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_migrates() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.schema_version() >= 2);
    }

    #[test]
    fn test_database_usable_through_traits() {
        fn through_traits<S: Storage>(store: &S) -> Result<usize> {
            Ok(store.list_chains()?.len())
        }

        let db = Database::open_in_memory().unwrap();
        db.create_chain(&Chain::new("test chain")).unwrap();
        assert_eq!(through_traits(&db).unwrap(), 1);
    }
}
