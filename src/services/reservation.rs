use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::BookingError;
use crate::models::{Booking, NewBooking};
use crate::store::{BookingLedger, SeatClaim, ShowStore};

/// Reserves seats with a single atomic check-and-set against the show store.
///
/// The coordinator holds no locks and keeps no state of its own. It never
/// reads occupancy before writing: a read-then-write sequence from here would
/// race against concurrent callers, so the entire "all requested seats are
/// free" condition travels inside the one conditional update the store
/// executes. The store's atomicity totally orders concurrent claims on
/// overlapping seats, so at most one of them succeeds.
#[derive(Clone)]
pub struct ReservationCoordinator {
    shows: Arc<dyn ShowStore>,
    ledger: Arc<dyn BookingLedger>,
}

impl ReservationCoordinator {
    pub fn new(shows: Arc<dyn ShowStore>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self { shows, ledger }
    }

    /// Claims `seats` on `show_id` for `user_id` and appends the booking.
    ///
    /// All-or-nothing: either every seat becomes occupied by `user_id` and
    /// exactly one booking is appended, or occupancy is untouched. A lost
    /// race and a missing show both surface as `SeatsUnavailable`. The
    /// ledger append is sequenced after the claim and is not rolled into it:
    /// if the append fails the claimed seats stay claimed and the error
    /// surfaces as `Storage`.
    pub async fn reserve_seats(
        &self,
        user_id: &str,
        show_id: &str,
        seats: &[String],
    ) -> Result<Booking, BookingError> {
        validate_request(show_id, seats)?;

        match self.shows.claim_seats(show_id, user_id, seats).await? {
            SeatClaim::Rejected => {
                info!(
                    "reservation rejected: show {} seats {:?} user {}",
                    show_id, seats, user_id
                );
                Err(BookingError::SeatsUnavailable)
            }
            SeatClaim::Claimed { show_price } => {
                let amount = show_price * seats.len() as i64;
                let booking = self
                    .ledger
                    .append(NewBooking {
                        user_id: user_id.to_string(),
                        show_id: show_id.to_string(),
                        amount,
                        booked_seats: seats.to_vec(),
                    })
                    .await
                    .map_err(|e| {
                        // Seats are already claimed at this point and are not
                        // released; occupancy and ledger are not linked in one
                        // transaction.
                        warn!(
                            "ledger append failed after claiming {:?} on show {}: {:?}",
                            seats, show_id, e
                        );
                        e
                    })?;

                info!(
                    "booked {} seat(s) on show {} for user {}, amount {}",
                    seats.len(),
                    show_id,
                    user_id,
                    amount
                );
                Ok(booking)
            }
        }
    }

    /// Bookings owned by `user_id`, newest first.
    pub async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>, BookingError> {
        Ok(self.ledger.list_for_user(user_id).await?)
    }
}

/// Preconditions checked before any storage access: non-empty show id,
/// non-empty seat list, no duplicate labels.
fn validate_request(show_id: &str, seats: &[String]) -> Result<(), BookingError> {
    if show_id.is_empty() || seats.is_empty() {
        return Err(BookingError::InvalidInput);
    }
    let mut seen = HashSet::with_capacity(seats.len());
    for seat in seats {
        if seat.is_empty() || !seen.insert(seat.as_str()) {
            return Err(BookingError::InvalidInput);
        }
    }
    Ok(())
}
