pub mod show;
pub mod booking;

pub use show::Show;
pub use booking::{Booking, NewBooking};
