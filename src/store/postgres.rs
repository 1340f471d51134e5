use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Booking, NewBooking, Show};
use crate::store::{BookingLedger, SeatClaim, ShowStore};

#[derive(Clone)]
pub struct PostgresShowStore {
    pool: Pool<Postgres>,
}

impl PostgresShowStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShowStore for PostgresShowStore {
    async fn fetch(&self, show_id: &str) -> Result<Option<Show>, StoreError> {
        let row = sqlx::query_as::<_, (String, i64, Json<HashMap<String, String>>)>(
            "SELECT id, show_price, occupied_seats FROM shows WHERE id = $1",
        )
        .bind(show_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, show_price, occupied)| Show {
            id,
            show_price,
            occupied_seats: occupied.0,
        }))
    }

    async fn claim_seats(
        &self,
        show_id: &str,
        user_id: &str,
        seats: &[String],
    ) -> Result<SeatClaim, StoreError> {
        let mut claims = serde_json::Map::new();
        for seat in seats {
            claims.insert(
                seat.clone(),
                serde_json::Value::String(user_id.to_string()),
            );
        }

        // One conditional UPDATE carries the whole guarantee: the row is only
        // rewritten if none of the requested seat labels is already a key,
        // and Postgres totally orders concurrent writers on the row. Zero
        // rows means the show is missing or a seat was taken.
        let price = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE shows
               SET occupied_seats = occupied_seats || $2::jsonb
             WHERE id = $1
               AND NOT (occupied_seats ?| $3)
            RETURNING show_price
            "#,
        )
        .bind(show_id)
        .bind(serde_json::Value::Object(claims))
        .bind(seats)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match price {
            Some(show_price) => SeatClaim::Claimed { show_price },
            None => SeatClaim::Rejected,
        })
    }
}

#[derive(Clone)]
pub struct PostgresLedger {
    pool: Pool<Postgres>,
}

impl PostgresLedger {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingLedger for PostgresLedger {
    async fn append(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let id = Uuid::new_v4();
        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO bookings (id, user_id, show_id, amount, booked_seats)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING created_at
            "#,
        )
        .bind(id)
        .bind(&booking.user_id)
        .bind(&booking.show_id)
        .bind(booking.amount)
        .bind(&booking.booked_seats)
        .fetch_one(&self.pool)
        .await?;

        Ok(Booking {
            id,
            user_id: booking.user_id,
            show_id: booking.show_id,
            amount: booking.amount,
            booked_seats: booking.booked_seats,
            created_at,
        })
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, i64, Vec<String>, DateTime<Utc>)>(
            r#"
            SELECT id, user_id, show_id, amount, booked_seats, created_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, user_id, show_id, amount, booked_seats, created_at)| Booking {
                    id,
                    user_id,
                    show_id,
                    amount,
                    booked_seats,
                    created_at,
                },
            )
            .collect())
    }
}
