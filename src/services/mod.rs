pub mod availability;
pub mod reservation;

pub use availability::AvailabilityOracle;
pub use reservation::ReservationCoordinator;
