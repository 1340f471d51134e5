use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable ledger entry for one successful reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    pub show_id: String,
    /// `show_price × booked_seats.len()` at booking time, minor units.
    pub amount: i64,
    pub booked_seats: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Booking fields as produced by the coordinator; the ledger assigns id and
/// timestamp on append.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: String,
    pub show_id: String,
    pub amount: i64,
    pub booked_seats: Vec<String>,
}
