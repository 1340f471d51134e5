pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod store;
pub mod services;
pub mod controllers;
pub mod middleware;

use std::sync::Arc;

use services::{AvailabilityOracle, ReservationCoordinator};
use store::{BookingLedger, PostgresLedger, PostgresShowStore, ShowStore};

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub availability: AvailabilityOracle,
    pub reservations: ReservationCoordinator,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let shows: Arc<dyn ShowStore> = Arc::new(PostgresShowStore::new(db.pool.clone()));
        let ledger: Arc<dyn BookingLedger> = Arc::new(PostgresLedger::new(db.pool.clone()));

        Ok(Arc::new(Self {
            availability: AvailabilityOracle::new(shows.clone()),
            reservations: ReservationCoordinator::new(shows, ledger),
            db,
            config,
        }))
    }
}
