//! Storage repository traits
//!
//! These traits define the storage interface the domain services depend on,
//! allowing for different implementations (SQLite, mock).

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Chain, Draft, DraftStatus, Hotel, Principal};

/// Chain repository operations
pub trait ChainRepository {
    /// Create a new chain
    fn create_chain(&self, chain: &Chain) -> Result<()>;

    /// Find chain by ID
    fn find_chain_by_id(&self, id: Uuid) -> Result<Option<Chain>>;

    /// Find chain by title, comparing case-insensitively
    fn find_chain_by_title(&self, title: &str) -> Result<Option<Chain>>;

    /// List all chains
    fn list_chains(&self) -> Result<Vec<Chain>>;

    /// Chains eligible for auto-assignment against the given name tokens
    fn auto_assign_candidates(&self, tokens: &[String]) -> Result<Vec<Chain>>;

    /// Update a chain
    fn update_chain(&self, chain: &Chain) -> Result<()>;

    /// Delete a chain; fails while hotels still reference it
    fn delete_chain(&self, chain_id: Uuid) -> Result<()>;

    /// Number of hotels in a chain
    fn count_chain_hotels(&self, chain_id: Uuid) -> Result<u64>;

    /// Whether a chain slug is taken
    fn chain_slug_exists(&self, slug: &str) -> Result<bool>;
}

/// Hotel repository operations
pub trait HotelRepository {
    /// Create a new hotel
    fn create_hotel(&self, hotel: &Hotel) -> Result<()>;

    /// Find hotel by ID
    fn find_hotel_by_id(&self, id: Uuid) -> Result<Option<Hotel>>;

    /// Find hotel by name
    fn find_hotel_by_name(&self, name: &str) -> Result<Option<Hotel>>;

    /// Find hotel by slug
    fn find_hotel_by_slug(&self, slug: &str) -> Result<Option<Hotel>>;

    /// List all hotels, newest first
    fn list_hotels(&self) -> Result<Vec<Hotel>>;

    /// List hotels belonging to a chain
    fn list_hotels_by_chain(&self, chain_id: Uuid) -> Result<Vec<Hotel>>;

    /// Update a hotel
    fn update_hotel(&self, hotel: &Hotel) -> Result<()>;

    /// Whether a hotel name is taken, optionally ignoring one hotel
    fn hotel_name_exists(&self, name: &str, exclude: Option<Uuid>) -> Result<bool>;

    /// Whether a hotel slug is taken
    fn hotel_slug_exists(&self, slug: &str) -> Result<bool>;

    /// Sibling ids for a hotel
    fn related_hotel_ids(&self, hotel_id: Uuid) -> Result<Vec<Uuid>>;

    /// Replace a hotel's sibling set
    fn replace_related_hotels(&self, hotel_id: Uuid, related: &[Uuid]) -> Result<()>;

    /// Clear a hotel's sibling set
    fn clear_related_hotels(&self, hotel_id: Uuid) -> Result<()>;
}

/// Draft repository operations
pub trait DraftRepository {
    /// Create a new draft
    fn create_draft(&self, draft: &Draft) -> Result<()>;

    /// Find draft by ID
    fn find_draft_by_id(&self, id: Uuid) -> Result<Option<Draft>>;

    /// List all drafts, newest first
    fn list_drafts(&self) -> Result<Vec<Draft>>;

    /// List drafts targeting a hotel, newest first
    fn list_drafts_for_hotel(&self, hotel_id: Uuid) -> Result<Vec<Draft>>;

    /// Update a draft's proposed fields
    fn update_draft(&self, draft: &Draft) -> Result<()>;

    /// Update only a draft's status
    fn update_draft_status(&self, draft_id: Uuid, status: DraftStatus) -> Result<()>;

    /// Whether a draft slug is taken
    fn draft_slug_exists(&self, slug: &str) -> Result<bool>;
}

/// Principal repository operations
pub trait PrincipalRepository {
    /// Create a new principal
    fn create_principal(&self, principal: &Principal) -> Result<()>;

    /// Find principal by ID
    fn find_principal_by_id(&self, id: Uuid) -> Result<Option<Principal>>;

    /// Find principal by email
    fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>>;

    /// All principals flagged as reviewers
    fn list_reviewers(&self) -> Result<Vec<Principal>>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
pub trait Storage:
    ChainRepository + HotelRepository + DraftRepository + PrincipalRepository
{
}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: ChainRepository + HotelRepository + DraftRepository + PrincipalRepository
{
}
