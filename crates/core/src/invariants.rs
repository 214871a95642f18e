//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::models::{title_case, Chain, Draft, Hotel};

/// Validate that a chain's state is internally consistent
pub fn assert_chain_invariants(chain: &Chain) {
    debug_assert!(
        !chain.title.trim().is_empty(),
        "Chain {} has empty title",
        chain.id
    );

    // Titles are rewritten to title-case before every persist
    debug_assert!(
        chain.title == title_case(&chain.title),
        "Chain {} title '{}' is not title-cased",
        chain.id,
        chain.title
    );
}

/// Validate that a hotel's state is internally consistent
pub fn assert_hotel_invariants(hotel: &Hotel) {
    debug_assert!(
        !hotel.name.trim().is_empty(),
        "Hotel {} has empty name",
        hotel.id
    );
}

/// Validate that a sibling set is consistent with chain membership
pub fn assert_related_invariants(hotel: &Hotel, related: &[Uuid]) {
    debug_assert!(
        !related.contains(&hotel.id),
        "Hotel {} lists itself as related",
        hotel.id
    );

    debug_assert!(
        !(hotel.chain_id.is_none() && !related.is_empty()),
        "Hotel {} has no chain but {} related hotels",
        hotel.id,
        related.len()
    );
}

/// Validate that a draft references real principals and hotels
pub fn assert_draft_invariants(draft: &Draft) {
    debug_assert!(
        draft.hotel_id != Uuid::nil(),
        "Draft {} has nil hotel_id",
        draft.id
    );

    debug_assert!(
        draft.created_by != Uuid::nil(),
        "Draft {} has nil created_by",
        draft.id
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_chain() {
        let chain = Chain::new("test chain");
        assert_chain_invariants(&chain);
    }

    #[test]
    #[should_panic(expected = "not title-cased")]
    fn test_lowercase_title_panics() {
        let mut chain = Chain::new("test chain");
        chain.title = "test chain".to_string();
        assert_chain_invariants(&chain);
    }

    #[test]
    fn test_valid_hotel() {
        let hotel = Hotel::new("test hotel");
        assert_hotel_invariants(&hotel);
    }

    #[test]
    fn test_valid_related_set() {
        let chain = Chain::new("test chain");
        let hotel = Hotel::new("test hotel").with_chain(chain.id);
        assert_related_invariants(&hotel, &[Uuid::new_v4()]);
    }

    #[test]
    #[should_panic(expected = "lists itself")]
    fn test_self_related_panics() {
        let chain = Chain::new("test chain");
        let hotel = Hotel::new("test hotel").with_chain(chain.id);
        assert_related_invariants(&hotel, &[hotel.id]);
    }

    #[test]
    fn test_valid_draft() {
        let draft = Draft::new(Uuid::new_v4(), Uuid::new_v4());
        assert_draft_invariants(&draft);
    }
}
