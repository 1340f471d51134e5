use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One scheduled screening of a show.
///
/// `occupied_seats` maps seat label to the user id that claimed it and is the
/// single source of truth for occupancy: a missing key means the seat is
/// free. Keys are only ever added, one atomic claim at a time; this service
/// never removes or reassigns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    /// Per-seat price in minor units.
    pub show_price: i64,
    pub occupied_seats: HashMap<String, String>,
}

impl Show {
    /// True iff none of `seats` is currently claimed.
    pub fn seats_free(&self, seats: &[String]) -> bool {
        seats.iter().all(|s| !self.occupied_seats.contains_key(s))
    }
}
