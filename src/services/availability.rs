use std::sync::Arc;
use tracing::error;

use crate::error::BookingError;
use crate::store::ShowStore;

/// Advisory occupancy queries over the show store.
///
/// `check_availability` is for UI pre-checks only. It is never the gate for a
/// reservation: any read made here is stale by the time a write lands, so the
/// coordinator issues its own atomic check-and-set instead.
#[derive(Clone)]
pub struct AvailabilityOracle {
    shows: Arc<dyn ShowStore>,
}

impl AvailabilityOracle {
    pub fn new(shows: Arc<dyn ShowStore>) -> Self {
        Self { shows }
    }

    /// True iff the show exists and none of `seats` is occupied.
    ///
    /// Fail-closed: a missing show or a storage failure both read as
    /// "unavailable". Errors are logged, never propagated.
    pub async fn check_availability(&self, show_id: &str, seats: &[String]) -> bool {
        match self.shows.fetch(show_id).await {
            Ok(Some(show)) => show.seats_free(seats),
            Ok(None) => false,
            Err(e) => {
                error!("availability check failed for show {}: {:?}", show_id, e);
                false
            }
        }
    }

    /// Seat labels currently occupied on the show, order-insensitive.
    /// A missing show is reported as `ShowNotFound`, distinct from an empty
    /// occupancy map.
    pub async fn list_occupied_seats(&self, show_id: &str) -> Result<Vec<String>, BookingError> {
        let show = self
            .shows
            .fetch(show_id)
            .await?
            .ok_or(BookingError::ShowNotFound)?;

        Ok(show.occupied_seats.into_keys().collect())
    }
}
