use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Booking, NewBooking, Show};
use crate::store::{BookingLedger, SeatClaim, ShowStore};

/// In-process show store. The check-and-set in `claim_seats` happens under a
/// single lock acquisition, which gives it the same indivisibility the
/// Postgres conditional UPDATE has.
#[derive(Default)]
pub struct MemoryShowStore {
    shows: Mutex<HashMap<String, Show>>,
}

impl MemoryShowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_show(&self, show: Show) {
        self.shows.lock().unwrap().insert(show.id.clone(), show);
    }
}

#[async_trait]
impl ShowStore for MemoryShowStore {
    async fn fetch(&self, show_id: &str) -> Result<Option<Show>, StoreError> {
        Ok(self.shows.lock().unwrap().get(show_id).cloned())
    }

    async fn claim_seats(
        &self,
        show_id: &str,
        user_id: &str,
        seats: &[String],
    ) -> Result<SeatClaim, StoreError> {
        let mut shows = self.shows.lock().unwrap();

        let Some(show) = shows.get_mut(show_id) else {
            return Ok(SeatClaim::Rejected);
        };
        if !show.seats_free(seats) {
            return Ok(SeatClaim::Rejected);
        }

        for seat in seats {
            show.occupied_seats
                .insert(seat.clone(), user_id.to_string());
        }
        Ok(SeatClaim::Claimed {
            show_price: show.show_price,
        })
    }
}

/// In-process append-only ledger.
#[derive(Default)]
pub struct MemoryLedger {
    bookings: Mutex<Vec<Booking>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingLedger for MemoryLedger {
    async fn append(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            show_id: booking.show_id,
            amount: booking.amount,
            booked_seats: booking.booked_seats,
            created_at: Utc::now(),
        };
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(booking)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}
