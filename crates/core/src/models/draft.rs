//! Hotel draft model - a proposed edit awaiting review

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review state of a draft
///
/// `Approved` is terminal. `Rejected` may be reset to `Pending` by a
/// reviewer; it never moves to `Approved` except through the approve
/// operation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Pending,
    Approved,
    Rejected,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Pending => "pending",
            DraftStatus::Approved => "approved",
            DraftStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(DraftStatus::Pending),
            "approved" => Some(DraftStatus::Approved),
            "rejected" => Some(DraftStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A proposed change set against one hotel
///
/// Every proposed field is optional; an unset field means "leave the live
/// value alone". The target hotel is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: Uuid,
    pub slug: String,
    /// The hotel this draft proposes to modify
    pub hotel_id: Uuid,
    /// The principal who submitted the draft
    pub created_by: Uuid,
    pub name: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub chain_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub status: DraftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    pub fn new(hotel_id: Uuid, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: String::new(),
            hotel_id,
            created_by,
            name: None,
            location: None,
            photo: None,
            chain_id: None,
            is_active: None,
            status: DraftStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the draft proposes anything at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.photo.is_none()
            && self.chain_id.is_none()
            && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            DraftStatus::Pending,
            DraftStatus::Approved,
            DraftStatus::Rejected,
        ] {
            assert_eq!(DraftStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(DraftStatus::from_str("bogus"), None);
    }

    #[test]
    fn test_new_draft_is_pending() {
        let draft = Draft::new(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(draft.status, DraftStatus::Pending);
        assert!(draft.is_empty());
    }

    #[test]
    fn test_is_empty() {
        let mut draft = Draft::new(Uuid::new_v4(), Uuid::new_v4());
        draft.location = Some("Berlin".to_string());
        assert!(!draft.is_empty());
    }
}
