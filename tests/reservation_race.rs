//! Concurrency scenarios for the reservation coordinator, run against the
//! in-memory stores (whose claim has the same indivisibility contract as the
//! Postgres conditional UPDATE).

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Barrier;

use show_booking::error::BookingError;
use show_booking::models::Show;
use show_booking::services::ReservationCoordinator;
use show_booking::store::{MemoryLedger, MemoryShowStore, ShowStore};

fn seats(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

fn setup(price: i64) -> (Arc<MemoryShowStore>, Arc<MemoryLedger>, ReservationCoordinator) {
    let shows = Arc::new(MemoryShowStore::new());
    shows.insert_show(Show {
        id: "s1".to_string(),
        show_price: price,
        occupied_seats: HashMap::new(),
    });
    let ledger = Arc::new(MemoryLedger::new());
    let coordinator = ReservationCoordinator::new(shows.clone(), ledger.clone());
    (shows, ledger, coordinator)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_requests_have_exactly_one_winner() {
    let (shows, ledger, coordinator) = setup(100);

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for (user, requested) in [("u1", seats(&["A", "B"])), ("u2", seats(&["B", "C"]))] {
        let coordinator = coordinator.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            coordinator.reserve_seats(user, "s1", &requested).await
        }));
    }

    let outcomes: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners: Vec<_> = outcomes.iter().filter(|o| o.is_ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one of the two racers may win");
    assert!(outcomes
        .iter()
        .filter(|o| o.is_err())
        .all(|o| matches!(o, Err(BookingError::SeatsUnavailable))));

    // The winner's two seats are claimed by the winner and nothing else moved.
    let occupancy = fetch_occupancy(&shows).await;
    assert_eq!(occupancy.len(), 2);
    let winning_user = occupancy.values().next().unwrap().clone();
    assert!(occupancy.values().all(|u| *u == winning_user));

    let bookings = ledger.all();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].amount, 200);
    assert_eq!(bookings[0].user_id, winning_user);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn single_seat_stampede_admits_one_caller() {
    let (shows, ledger, coordinator) = setup(50);

    let contenders = 32;
    let barrier = Arc::new(Barrier::new(contenders));
    let mut handles = Vec::new();
    for i in 0..contenders {
        let coordinator = coordinator.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            let user = format!("u{}", i);
            barrier.wait().await;
            coordinator.reserve_seats(&user, "s1", &seats(&["A1"])).await
        }));
    }

    let outcomes: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| matches!(o, Err(BookingError::SeatsUnavailable)))
            .count(),
        contenders - 1
    );

    let occupancy = fetch_occupancy(&shows).await;
    assert_eq!(occupancy.len(), 1);
    assert_eq!(ledger.all().len(), 1);
    assert_eq!(
        occupancy.get("A1"),
        Some(&ledger.all()[0].user_id),
        "the occupant and the booking owner are the same caller"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn disjoint_requests_all_win_and_ledger_matches_occupancy() {
    let (shows, ledger, coordinator) = setup(75);

    let callers = 16;
    let barrier = Arc::new(Barrier::new(callers));
    let mut handles = Vec::new();
    for i in 0..callers {
        let coordinator = coordinator.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            let user = format!("u{}", i);
            let requested = seats(&[&format!("R{}S1", i), &format!("R{}S2", i)]);
            barrier.wait().await;
            coordinator.reserve_seats(&user, "s1", &requested).await
        }));
    }

    for joined in join_all(handles).await {
        let booking = joined.unwrap().expect("disjoint seat sets never conflict");
        assert_eq!(booking.amount, 150);
        assert_eq!(booking.booked_seats.len(), 2);
    }

    let occupancy = fetch_occupancy(&shows).await;
    assert_eq!(occupancy.len(), callers * 2);
    assert_eq!(ledger.all().len(), callers);

    // Every booked seat is occupied by its booking's owner.
    for booking in ledger.all() {
        for seat in &booking.booked_seats {
            assert_eq!(occupancy.get(seat), Some(&booking.user_id));
        }
    }
}

#[tokio::test]
async fn conflict_then_retry_fails_deterministically() {
    let (_, ledger, coordinator) = setup(100);

    coordinator
        .reserve_seats("u1", "s1", &seats(&["A"]))
        .await
        .unwrap();

    for _ in 0..3 {
        let err = coordinator
            .reserve_seats("u2", "s1", &seats(&["A", "B"]))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::SeatsUnavailable));
    }
    assert_eq!(ledger.all().len(), 1);
}

/// Test-side view of the show's occupancy map.
async fn fetch_occupancy(store: &MemoryShowStore) -> HashMap<String, String> {
    store.fetch("s1").await.unwrap().unwrap().occupied_seats
}
