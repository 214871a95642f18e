//! Sibling-set maintenance
//!
//! A hotel's related set is derived from chain membership: all other hotels
//! under the same chain. The recompute targets one hotel only; existing
//! siblings keep their previous sets until their own next write.

use tracing::instrument;

use crate::error::Result;
use crate::models::Hotel;
use crate::storage::HotelRepository;

/// Recompute the sibling set for one hotel
///
/// Returns the number of siblings written. With no chain the set is
/// cleared and 0 is returned.
#[instrument(skip(store, hotel), fields(hotel_id = %hotel.id))]
pub fn recompute_related<S: HotelRepository>(store: &S, hotel: &Hotel) -> Result<usize> {
    match hotel.chain_id {
        Some(chain_id) => {
            let siblings: Vec<_> = store
                .list_hotels_by_chain(chain_id)?
                .into_iter()
                .map(|h| h.id)
                .filter(|id| *id != hotel.id)
                .collect();

            store.replace_related_hotels(hotel.id, &siblings)?;
            Ok(siblings.len())
        }
        None => {
            store.clear_related_hotels(hotel.id)?;
            Ok(0)
        }
    }
}
