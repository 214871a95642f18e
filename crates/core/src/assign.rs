//! Automatic chain assignment
//!
//! New hotels without an explicit chain are matched against existing chains
//! by name: any whitespace-separated word of the hotel name appearing as a
//! case-insensitive substring of an opted-in chain title makes that chain a
//! candidate. Selection never creates or mutates a chain.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::models::Chain;
use crate::storage::ChainRepository;

/// Pick a chain for a hotel name, if any chain qualifies
///
/// Candidates come back from the store ordered by creation time, so ties
/// resolve to the oldest chain. Callers must not rely on which candidate
/// wins. Returns `None` when nothing matches; that is not an error.
#[instrument(skip(store))]
pub fn assign_chain<S: ChainRepository>(store: &S, hotel_name: &str) -> Result<Option<Chain>> {
    let tokens: Vec<String> = hotel_name
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect();

    if tokens.is_empty() {
        return Ok(None);
    }

    let mut candidates = store.auto_assign_candidates(&tokens)?;
    if candidates.is_empty() {
        debug!(hotel_name, "No auto-assign chain matched");
        return Ok(None);
    }

    let chain = candidates.remove(0);
    debug!(hotel_name, chain = %chain.title, "Auto-assigned chain");
    Ok(Some(chain))
}
