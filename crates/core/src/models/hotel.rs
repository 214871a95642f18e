//! Hotel model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Chain;
use crate::slug::slugify;

/// A single hotel property
///
/// The derived sibling relation (`related_hotels`) lives in its own join
/// table and is read through the hotel store, not carried on the struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Uuid,
    /// Unique display name
    pub name: String,
    pub slug: String,
    /// One of the configured locations, if set
    pub location: Option<String>,
    /// Object key of the uploaded photo, if any
    pub photo: Option<String>,
    pub is_active: bool,
    /// Weak reference to the owning chain
    pub chain_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hotel {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            location: None,
            photo: None,
            is_active: false,
            chain_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_chain(mut self, chain_id: Uuid) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Display path for this hotel
    pub fn detail_path(&self) -> String {
        format!("/hotels/{}/", self.slug)
    }

    /// Full display name including chain and location when known
    pub fn full_name(&self, chain: Option<&Chain>) -> String {
        match chain {
            Some(chain) => format!(
                "{} - ({}), {}",
                self.name,
                chain.title,
                self.location.as_deref().unwrap_or("")
            ),
            None => format!("{}, {}", self.name, self.location.as_deref().unwrap_or("")),
        }
    }
}

impl std::fmt::Display for Hotel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.location.as_deref().unwrap_or(""))
    }
}

/// Object key for an uploaded hotel photo: `hotels/<uuid>.<ext>`
///
/// The extension is taken from the uploaded filename; files without one get
/// a bare key.
pub fn photo_object_key(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("hotels/{}.{}", Uuid::new_v4(), ext),
        _ => format!("hotels/{}", Uuid::new_v4()),
    }
}
