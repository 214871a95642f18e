//! Draft review workflow
//!
//! Drafts collect proposed hotel edits from non-privileged submitters. A
//! reviewer approves or rejects them; approval diffs the proposal against
//! the live hotel and applies the difference exactly once through the
//! write coordinator. `Approved` is terminal.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{Error, Result};
use crate::invariants::assert_draft_invariants;
use crate::models::{Draft, DraftStatus, Hotel};
use crate::notify::{dispatch, NotificationSink};
use crate::slug::{slugify, unique_slug};
use crate::storage::Storage;
use crate::writer::{resolve_chain_ref, ChainRef, HotelInput, HotelWriter};

/// Payload for a new draft submission
#[derive(Debug, Clone)]
pub struct DraftInput {
    /// The hotel this draft proposes to modify
    pub hotel_id: Uuid,
    /// The submitting principal
    pub created_by: Uuid,
    pub name: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub is_active: Option<bool>,
    pub chain: Option<ChainRef>,
}

impl DraftInput {
    pub fn new(hotel_id: Uuid, created_by: Uuid) -> Self {
        Self {
            hotel_id,
            created_by,
            name: None,
            location: None,
            photo: None,
            is_active: None,
            chain: None,
        }
    }
}

/// Runs the draft state machine
pub struct DraftEngine<'a, S: Storage> {
    store: &'a S,
    config: &'a CoreConfig,
    sink: &'a dyn NotificationSink,
}

impl<'a, S: Storage> DraftEngine<'a, S> {
    pub fn new(store: &'a S, config: &'a CoreConfig, sink: &'a dyn NotificationSink) -> Self {
        Self {
            store,
            config,
            sink,
        }
    }

    /// Create a pending draft and notify the reviewers
    #[instrument(skip(self, input), fields(hotel_id = %input.hotel_id))]
    pub fn submit(&self, input: DraftInput) -> Result<Draft> {
        let hotel = self
            .store
            .find_hotel_by_id(input.hotel_id)?
            .ok_or_else(|| {
                Error::ReferentialIntegrity(format!("hotel {} does not exist", input.hotel_id))
            })?;
        let author = self
            .store
            .find_principal_by_id(input.created_by)?
            .ok_or_else(|| {
                Error::ReferentialIntegrity(format!(
                    "principal {} does not exist",
                    input.created_by
                ))
            })?;

        let mut draft = Draft::new(hotel.id, author.id);
        draft.name = input.name;
        draft.location = input.location;
        draft.photo = input.photo;
        draft.is_active = input.is_active;
        draft.chain_id = resolve_chain_ref(self.store, input.chain)?;

        let base = draft.name.as_deref().unwrap_or(&hotel.name);
        draft.slug = unique_slug(&slugify(base), |s| self.store.draft_slug_exists(s))?;

        assert_draft_invariants(&draft);
        self.store.create_draft(&draft)?;
        info!(draft_id = %draft.id, "Draft submitted");

        self.submission_notice(&hotel, &author.username);
        Ok(draft)
    }

    /// Approve a draft, applying its change set to the target hotel
    ///
    /// Returns `Ok(false)` when the draft was already approved (the call is
    /// a no-op), `Ok(true)` otherwise. The boolean only reports whether the
    /// approval went through, including when the draft proposed nothing new.
    #[instrument(skip(self))]
    pub fn approve(&self, draft_id: Uuid) -> Result<bool> {
        let draft = self
            .store
            .find_draft_by_id(draft_id)?
            .ok_or_else(|| Error::NotFound(format!("draft {}", draft_id)))?;

        if draft.status == DraftStatus::Approved {
            return Ok(false);
        }

        // Visible approval-in-progress marker. Not a lock: mutual exclusion
        // across concurrent approvals is the store's responsibility.
        self.store
            .update_draft_status(draft.id, DraftStatus::Pending)?;

        let hotel = self
            .store
            .find_hotel_by_id(draft.hotel_id)?
            .ok_or_else(|| {
                Error::ReferentialIntegrity(format!(
                    "draft {} targets missing hotel {}",
                    draft.id, draft.hotel_id
                ))
            })?;

        let staged = stage_diff(&draft, &hotel);
        if !staged.is_empty() {
            let writer = HotelWriter::new(self.store, self.config, self.sink);
            writer.update(hotel.id, staged)?;
        }

        self.store
            .update_draft_status(draft.id, DraftStatus::Approved)?;
        info!(draft_id = %draft.id, "Draft approved");
        Ok(true)
    }

    /// Reject a draft
    #[instrument(skip(self))]
    pub fn reject(&self, draft_id: Uuid) -> Result<()> {
        self.require_draft(draft_id)?;
        self.store
            .update_draft_status(draft_id, DraftStatus::Rejected)?;
        info!(draft_id = %draft_id, "Draft rejected");
        Ok(())
    }

    /// Reset a draft to pending
    #[instrument(skip(self))]
    pub fn set_pending(&self, draft_id: Uuid) -> Result<()> {
        self.require_draft(draft_id)?;
        self.store
            .update_draft_status(draft_id, DraftStatus::Pending)?;
        Ok(())
    }

    fn require_draft(&self, draft_id: Uuid) -> Result<Draft> {
        self.store
            .find_draft_by_id(draft_id)?
            .ok_or_else(|| Error::NotFound(format!("draft {}", draft_id)))
    }

    /// Tell every reviewer a draft is waiting, linking the target hotel
    fn submission_notice(&self, hotel: &Hotel, author: &str) {
        let reviewers = match self.store.list_reviewers() {
            Ok(reviewers) => reviewers,
            Err(e) => {
                warn!(error = %e, "Skipping draft notice, reviewer lookup failed");
                return;
            }
        };

        let recipients: Vec<String> = reviewers.into_iter().map(|p| p.email).collect();
        let url = self.config.hotel_url(&hotel.slug);
        let body = format!(
            "This hotel has been created as draft by {}: <a href='{}'>{}</a>",
            author, url, hotel.name
        );
        dispatch(self.sink, "New hotel created", &body, &recipients);
    }
}

/// Stage the fields where the draft differs from the live hotel
fn stage_diff(draft: &Draft, hotel: &Hotel) -> HotelInput {
    let mut staged = HotelInput::default();

    if let Some(name) = &draft.name {
        if name != &hotel.name {
            staged.name = Some(name.clone());
        }
    }
    if let Some(location) = &draft.location {
        if hotel.location.as_deref() != Some(location) {
            staged.location = Some(location.clone());
        }
    }
    if let Some(photo) = &draft.photo {
        if hotel.photo.as_deref() != Some(photo) {
            staged.photo = Some(photo.clone());
        }
    }
    if let Some(chain_id) = draft.chain_id {
        if hotel.chain_id != Some(chain_id) {
            staged.chain = Some(ChainRef::Existing(chain_id));
        }
    }
    if let Some(is_active) = draft.is_active {
        if is_active != hotel.is_active {
            staged.is_active = Some(is_active);
        }
    }

    staged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::models::{Chain, Principal};
    use crate::notify::Notification;
    use crate::storage::{
        ChainRepository, Database, DraftRepository, HotelRepository, PrincipalRepository,
    };
    use crate::writer::ChainInput;

    struct RecordingSink {
        sent: RefCell<Vec<Notification>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl NotificationSink for RecordingSink {
        fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<()> {
            self.sent.borrow_mut().push(Notification {
                subject: subject.to_string(),
                body: body.to_string(),
                recipients: recipients.to_vec(),
            });
            Ok(())
        }
    }

    fn test_config() -> CoreConfig {
        CoreConfig {
            locations: vec!["test land".to_string(), "Berlin".to_string()],
            ..CoreConfig::default()
        }
    }

    struct Fixture {
        db: Database,
        config: CoreConfig,
        sink: RecordingSink,
        hotel: Hotel,
        author: Principal,
    }

    fn fixture() -> Fixture {
        let db = Database::open_in_memory().unwrap();

        let hotel = Hotel::new("test hotel").with_location("test land");
        db.create_hotel(&hotel).unwrap();

        let author = Principal::new("author@example.com");
        db.create_principal(&author).unwrap();

        Fixture {
            db,
            config: test_config(),
            sink: RecordingSink::new(),
            hotel,
            author,
        }
    }

    impl Fixture {
        fn engine(&self) -> DraftEngine<'_, Database> {
            DraftEngine::new(&self.db, &self.config, &self.sink)
        }
    }

    #[test]
    fn test_submit_creates_pending_draft() {
        let fx = fixture();
        let engine = fx.engine();

        let mut input = DraftInput::new(fx.hotel.id, fx.author.id);
        input.location = Some("Berlin".to_string());
        let draft = engine.submit(input).unwrap();

        assert_eq!(draft.status, DraftStatus::Pending);
        assert_eq!(draft.hotel_id, fx.hotel.id);
        assert_eq!(
            fx.db.list_drafts_for_hotel(fx.hotel.id).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_submit_notifies_reviewers_with_hotel_link() {
        let fx = fixture();
        fx.db
            .create_principal(&Principal::new("rev@example.com").with_reviewer(true))
            .unwrap();

        let engine = fx.engine();
        engine
            .submit(DraftInput::new(fx.hotel.id, fx.author.id))
            .unwrap();

        let sent = fx.sink.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["rev@example.com".to_string()]);
        // The notice links the target hotel, not the draft
        assert!(sent[0].body.contains("/hotels/test-hotel/"));
        assert!(sent[0].body.contains("author@example.com"));
    }

    #[test]
    fn test_submit_without_reviewers_sends_nothing() {
        let fx = fixture();
        let engine = fx.engine();

        engine
            .submit(DraftInput::new(fx.hotel.id, fx.author.id))
            .unwrap();

        assert!(fx.sink.sent.borrow().is_empty());
    }

    #[test]
    fn test_submit_unknown_hotel_fails() {
        let fx = fixture();
        let engine = fx.engine();

        let result = engine.submit(DraftInput::new(Uuid::new_v4(), fx.author.id));
        assert!(matches!(result, Err(Error::ReferentialIntegrity(_))));
    }

    #[test]
    fn test_approve_applies_diff_once() {
        let fx = fixture();
        let engine = fx.engine();

        let mut input = DraftInput::new(fx.hotel.id, fx.author.id);
        input.location = Some("Berlin".to_string());
        let draft = engine.submit(input).unwrap();

        assert!(engine.approve(draft.id).unwrap());
        // Second approval is a no-op
        assert!(!engine.approve(draft.id).unwrap());

        let hotel = fx.db.find_hotel_by_id(fx.hotel.id).unwrap().unwrap();
        assert_eq!(hotel.location.as_deref(), Some("Berlin"));

        let draft = fx.db.find_draft_by_id(draft.id).unwrap().unwrap();
        assert_eq!(draft.status, DraftStatus::Approved);
    }

    #[test]
    fn test_approve_location_only_leaves_other_fields() {
        let fx = fixture();
        let engine = fx.engine();

        let chain = Chain::new("test chain");
        fx.db.create_chain(&chain).unwrap();

        // Give the hotel a chain and photo first
        let writer = HotelWriter::new(&fx.db, &fx.config, &fx.sink);
        writer
            .update(
                fx.hotel.id,
                HotelInput {
                    photo: Some("hotels/abc.png".to_string()),
                    chain: Some(ChainRef::Existing(chain.id)),
                    ..Default::default()
                },
            )
            .unwrap();

        let mut input = DraftInput::new(fx.hotel.id, fx.author.id);
        input.location = Some("Berlin".to_string());
        let draft = engine.submit(input).unwrap();

        assert!(engine.approve(draft.id).unwrap());

        let hotel = fx.db.find_hotel_by_id(fx.hotel.id).unwrap().unwrap();
        assert_eq!(hotel.name, "test hotel");
        assert_eq!(hotel.location.as_deref(), Some("Berlin"));
        assert_eq!(hotel.photo.as_deref(), Some("hotels/abc.png"));
        assert_eq!(hotel.chain_id, Some(chain.id));
    }

    #[test]
    fn test_approve_empty_diff_still_approves() {
        let fx = fixture();
        let engine = fx.engine();

        // Proposes the location the hotel already has
        let mut input = DraftInput::new(fx.hotel.id, fx.author.id);
        input.location = Some("test land".to_string());
        let draft = engine.submit(input).unwrap();

        let before = fx.db.find_hotel_by_id(fx.hotel.id).unwrap().unwrap();
        assert!(engine.approve(draft.id).unwrap());
        let after = fx.db.find_hotel_by_id(fx.hotel.id).unwrap().unwrap();

        assert_eq!(before.updated_at, after.updated_at);
        let draft = fx.db.find_draft_by_id(draft.id).unwrap().unwrap();
        assert_eq!(draft.status, DraftStatus::Approved);
    }

    #[test]
    fn test_approve_after_reject() {
        let fx = fixture();
        let engine = fx.engine();

        let mut input = DraftInput::new(fx.hotel.id, fx.author.id);
        input.is_active = Some(true);
        let draft = engine.submit(input).unwrap();

        engine.reject(draft.id).unwrap();
        let rejected = fx.db.find_draft_by_id(draft.id).unwrap().unwrap();
        assert_eq!(rejected.status, DraftStatus::Rejected);

        assert!(engine.approve(draft.id).unwrap());
        let hotel = fx.db.find_hotel_by_id(fx.hotel.id).unwrap().unwrap();
        assert!(hotel.is_active);
    }

    #[test]
    fn test_reject_then_pending_round_trip() {
        let fx = fixture();
        let engine = fx.engine();

        let draft = engine
            .submit(DraftInput::new(fx.hotel.id, fx.author.id))
            .unwrap();

        engine.reject(draft.id).unwrap();
        engine.set_pending(draft.id).unwrap();

        let found = fx.db.find_draft_by_id(draft.id).unwrap().unwrap();
        assert_eq!(found.status, DraftStatus::Pending);
    }

    #[test]
    fn test_approve_unknown_draft() {
        let fx = fixture();
        let engine = fx.engine();

        let result = engine.approve(Uuid::new_v4());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_approve_with_chain_change_recomputes_siblings() {
        let fx = fixture();
        let engine = fx.engine();

        let chain = Chain::new("test chain");
        fx.db.create_chain(&chain).unwrap();
        let sibling = Hotel::new("sibling hotel").with_chain(chain.id);
        fx.db.create_hotel(&sibling).unwrap();

        let mut input = DraftInput::new(fx.hotel.id, fx.author.id);
        input.chain = Some(ChainRef::Existing(chain.id));
        let draft = engine.submit(input).unwrap();

        assert!(engine.approve(draft.id).unwrap());

        let related = fx.db.related_hotel_ids(fx.hotel.id).unwrap();
        assert_eq!(related, vec![sibling.id]);
    }

    #[test]
    fn test_draft_with_nested_chain_payload() {
        let fx = fixture();
        let engine = fx.engine();

        let mut input = DraftInput::new(fx.hotel.id, fx.author.id);
        input.chain = Some(ChainRef::New(ChainInput::new("proposed chain")));
        let draft = engine.submit(input).unwrap();

        // The nested chain is persisted at submission time
        let chain = fx.db.find_chain_by_title("Proposed Chain").unwrap().unwrap();
        assert_eq!(draft.chain_id, Some(chain.id));
    }
}
