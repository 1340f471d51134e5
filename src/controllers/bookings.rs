use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::BookingError;
use crate::middleware::AuthUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(reserve_seats))
        .route("/bookings", get(get_user_bookings))
        .route("/shows/{show_id}/seats", get(get_occupied_seats))
        .route("/shows/{show_id}/availability", get(check_availability))
}

/* ---------- helpers ---------- */

// Domain outcomes ride in the envelope; HTTP status stays 200 and callers
// branch on the success flag.
fn failure(message: impl Into<String>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "success": false, "message": message.into() })),
    )
}

/* ---------- BOOKINGS ---------- */

// POST /api/bookings
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ReserveSeatsRequest {
    #[validate(length(min = 1))]
    show_id: String,
    #[validate(length(min = 1))]
    seats: Vec<String>,
}

async fn reserve_seats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<ReserveSeatsRequest>,
) -> impl IntoResponse {
    if req.validate().is_err() {
        return failure(BookingError::InvalidInput.to_string());
    }

    match state
        .reservations
        .reserve_seats(&user.user_id, &req.show_id, &req.seats)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true, "message": "Booking successful" })),
        ),
        Err(e) => {
            if e.is_storage() {
                tracing::error!("reserve_seats storage error: {:?}", e);
            }
            failure(e.to_string())
        }
    }
}

// GET /api/bookings
async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> impl IntoResponse {
    match state.reservations.bookings_for_user(&user.user_id).await {
        Ok(bookings) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true, "bookings": bookings })),
        ),
        Err(e) => {
            tracing::error!("get_user_bookings storage error: {:?}", e);
            failure(e.to_string())
        }
    }
}

/* ---------- SEATS ---------- */

// GET /api/shows/{show_id}/seats
async fn get_occupied_seats(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<String>,
) -> impl IntoResponse {
    if show_id.trim().is_empty() {
        return failure("ShowId is required");
    }

    match state.availability.list_occupied_seats(&show_id).await {
        Ok(seats) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true, "occupiedSeats": seats })),
        ),
        Err(e) => {
            if e.is_storage() {
                tracing::error!("get_occupied_seats storage error: {:?}", e);
            }
            failure(e.to_string())
        }
    }
}

// GET /api/shows/{show_id}/availability?seats=A1,A2
#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    seats: String,
}

async fn check_availability(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<String>,
    Query(params): Query<AvailabilityQuery>,
) -> impl IntoResponse {
    let seats: Vec<String> = params
        .seats
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if show_id.trim().is_empty() || seats.is_empty() {
        return failure(BookingError::InvalidInput.to_string());
    }

    // Advisory only. A true answer here can be stale by the time a booking
    // request lands; the reservation path does its own atomic check.
    let available = state.availability.check_availability(&show_id, &seats).await;
    (
        StatusCode::OK,
        Json(serde_json::json!({ "success": true, "available": available })),
    )
}
