pub mod postgres;
pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Booking, NewBooking, Show};

pub use memory::{MemoryLedger, MemoryShowStore};
pub use postgres::{PostgresLedger, PostgresShowStore};

/// Outcome of an atomic seat claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatClaim {
    /// Every requested seat was free and is now mapped to the caller.
    Claimed { show_price: i64 },
    /// The show is missing or at least one seat was taken. Nothing changed.
    /// The two cases are deliberately indistinguishable here.
    Rejected,
}

/// Per-show seat occupancy state.
#[async_trait]
pub trait ShowStore: Send + Sync {
    /// Plain read of one show record.
    async fn fetch(&self, show_id: &str) -> Result<Option<Show>, StoreError>;

    /// Atomic conditional update: iff the show exists and none of `seats` is
    /// occupied, map every seat in `seats` to `user_id` in one indivisible
    /// check-and-set. Concurrent claims on overlapping seat sets must be
    /// totally ordered by the backend so that at most one of them succeeds;
    /// a rejected claim leaves the occupancy map untouched.
    async fn claim_seats(
        &self,
        show_id: &str,
        user_id: &str,
        seats: &[String],
    ) -> Result<SeatClaim, StoreError>;
}

/// Append-only ledger of successful reservations.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    async fn append(&self, booking: NewBooking) -> Result<Booking, StoreError>;

    /// Bookings owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;
}
