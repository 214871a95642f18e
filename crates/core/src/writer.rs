//! Hotel write coordination
//!
//! Every hotel create or update flows through [`HotelWriter`], which runs a
//! fixed sequence of phases around the persistence call: nested chain
//! resolution, field application, auto-assignment, persist, sibling
//! recompute, and (for new records) the creation notification.

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::assign::assign_chain;
use crate::config::CoreConfig;
use crate::error::{Error, Result};
use crate::invariants::{assert_chain_invariants, assert_hotel_invariants};
use crate::models::{Chain, Hotel, PriceRange};
use crate::notify::{dispatch, NotificationSink};
use crate::related::recompute_related;
use crate::slug::{slugify, unique_slug};
use crate::storage::Storage;

/// Fields of a nested chain payload
///
/// Only `title` is required; everything else is merged onto the reused or
/// newly created chain when present.
#[derive(Debug, Clone, Default)]
pub struct ChainInput {
    pub title: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub sales_contact: Option<String>,
    pub price_range: Option<PriceRange>,
    pub auto_assign: Option<bool>,
    pub recipient_email: Option<String>,
}

impl ChainInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// How a write refers to a chain
#[derive(Debug, Clone)]
pub enum ChainRef {
    /// Reference to an already persisted chain
    Existing(Uuid),
    /// Nested payload: reuse by title or create
    New(ChainInput),
}

/// Partial hotel write payload
///
/// Absent fields leave the current value untouched; they never reset
/// anything to a default.
#[derive(Debug, Clone, Default)]
pub struct HotelInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub is_active: Option<bool>,
    pub chain: Option<ChainRef>,
}

impl HotelInput {
    /// Whether the payload carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.photo.is_none()
            && self.is_active.is_none()
            && self.chain.is_none()
    }
}

/// Coordinates hotel writes and their side effects
pub struct HotelWriter<'a, S: Storage> {
    store: &'a S,
    config: &'a CoreConfig,
    sink: &'a dyn NotificationSink,
}

impl<'a, S: Storage> HotelWriter<'a, S> {
    pub fn new(store: &'a S, config: &'a CoreConfig, sink: &'a dyn NotificationSink) -> Self {
        Self {
            store,
            config,
            sink,
        }
    }

    /// Create a new hotel from the payload
    #[instrument(skip(self, input))]
    pub fn create(&self, input: HotelInput) -> Result<Hotel> {
        self.write(None, input)
    }

    /// Apply a partial update to an existing hotel
    #[instrument(skip(self, input))]
    pub fn update(&self, hotel_id: Uuid, input: HotelInput) -> Result<Hotel> {
        let hotel = self
            .store
            .find_hotel_by_id(hotel_id)?
            .ok_or_else(|| Error::NotFound(format!("hotel {}", hotel_id)))?;
        self.write(Some(hotel), input)
    }

    fn write(&self, existing: Option<Hotel>, input: HotelInput) -> Result<Hotel> {
        let created = existing.is_none();

        // Phase 1: resolve the chain reference before touching the hotel
        let resolved_chain = resolve_chain_ref(self.store, input.chain)?;

        // Phase 2: apply supplied fields
        let mut hotel = match existing {
            Some(hotel) => hotel,
            None => {
                let name = input
                    .name
                    .clone()
                    .ok_or_else(|| Error::Validation("hotel name is required".to_string()))?;
                Hotel::new(name)
            }
        };

        if let Some(name) = input.name {
            hotel.name = name;
        }
        if let Some(location) = input.location {
            hotel.location = Some(location);
        }
        if let Some(photo) = input.photo {
            hotel.photo = Some(photo);
        }
        if let Some(is_active) = input.is_active {
            hotel.is_active = is_active;
        }
        if let Some(chain_id) = resolved_chain {
            hotel.chain_id = Some(chain_id);
        }

        self.validate(&hotel, if created { None } else { Some(hotel.id) })?;

        // Phase 3: auto-assign a chain when none was supplied or kept
        if hotel.chain_id.is_none() {
            if let Some(chain) = assign_chain(self.store, &hotel.name)? {
                hotel.chain_id = Some(chain.id);
            }
        }

        // Phase 4: persist
        assert_hotel_invariants(&hotel);
        if created {
            hotel.slug = unique_slug(&slugify(&hotel.name), |s| self.store.hotel_slug_exists(s))?;
            self.store.create_hotel(&hotel)?;
            info!(hotel = %hotel.name, "Hotel created");
        } else {
            hotel.updated_at = Utc::now();
            self.store.update_hotel(&hotel)?;
        }

        // Phase 5: recompute the sibling set for this hotel only
        recompute_related(self.store, &hotel)?;

        // Phase 6: creation notification
        if created {
            self.creation_notice(&hotel);
        }

        Ok(hotel)
    }

    fn validate(&self, hotel: &Hotel, exclude: Option<Uuid>) -> Result<()> {
        if hotel.name.trim().is_empty() {
            return Err(Error::Validation("hotel name must not be empty".to_string()));
        }
        if self.store.hotel_name_exists(&hotel.name, exclude)? {
            return Err(Error::Validation(format!(
                "hotel name '{}' is already taken",
                hotel.name
            )));
        }
        if let Some(location) = &hotel.location {
            if !self.config.is_allowed_location(location) {
                return Err(Error::Validation(format!(
                    "'{}' is not an allowed location",
                    location
                )));
            }
        }
        Ok(())
    }

    /// Notify the chain's recipient address about a newly created hotel
    ///
    /// Any failure here is logged and dropped; the write already succeeded.
    fn creation_notice(&self, hotel: &Hotel) {
        let Some(chain_id) = hotel.chain_id else {
            return;
        };

        let chain = match self.store.find_chain_by_id(chain_id) {
            Ok(Some(chain)) => chain,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Skipping creation notice, chain lookup failed");
                return;
            }
        };

        let Some(recipient) = chain.recipient_email.as_deref().filter(|r| !r.is_empty())
        else {
            return;
        };

        let url = self.config.hotel_url(&hotel.slug);
        let body = format!(
            "This hotel has been created: <a href='{}'>{}</a>",
            url, hotel
        );
        dispatch(
            self.sink,
            "New hotel created",
            &body,
            &[recipient.to_string()],
        );
    }
}

/// Resolve a chain reference to a persisted chain id
///
/// A nested payload reuses the chain whose title matches case-insensitively,
/// merging any extra supplied fields into it; otherwise it creates the chain
/// with a title-cased title. The chain write commits independently of the
/// hotel write that follows.
pub(crate) fn resolve_chain_ref<S: Storage>(
    store: &S,
    chain: Option<ChainRef>,
) -> Result<Option<Uuid>> {
    match chain {
        None => Ok(None),
        Some(ChainRef::Existing(id)) => {
            store
                .find_chain_by_id(id)?
                .ok_or_else(|| Error::ReferentialIntegrity(format!("chain {} does not exist", id)))?;
            Ok(Some(id))
        }
        Some(ChainRef::New(input)) => {
            if input.title.trim().is_empty() {
                return Err(Error::Validation("chain title must not be empty".to_string()));
            }

            match store.find_chain_by_title(&input.title)? {
                Some(mut chain) => {
                    merge_chain_fields(&mut chain, &input);
                    chain.updated_at = Utc::now();
                    store.update_chain(&chain)?;
                    Ok(Some(chain.id))
                }
                None => {
                    let mut chain = Chain::new(input.title.as_str());
                    merge_chain_fields(&mut chain, &input);
                    chain.slug =
                        unique_slug(&slugify(&chain.title), |s| store.chain_slug_exists(s))?;
                    assert_chain_invariants(&chain);
                    store.create_chain(&chain)?;
                    info!(title = %chain.title, "Chain created from nested payload");
                    Ok(Some(chain.id))
                }
            }
        }
    }
}

fn merge_chain_fields(chain: &mut Chain, input: &ChainInput) {
    if let Some(description) = &input.description {
        chain.description = description.clone();
    }
    if let Some(email) = &input.email {
        chain.email = email.clone();
    }
    if let Some(phone) = &input.phone {
        chain.phone = phone.clone();
    }
    if let Some(website) = &input.website {
        chain.website = website.clone();
    }
    if let Some(sales_contact) = &input.sales_contact {
        chain.sales_contact = sales_contact.clone();
    }
    if let Some(price_range) = input.price_range {
        chain.price_range = price_range;
    }
    if let Some(auto_assign) = input.auto_assign {
        chain.auto_assign = auto_assign;
    }
    if let Some(recipient_email) = &input.recipient_email {
        chain.recipient_email = Some(recipient_email.clone());
    }
}
