//! Background [`Task`]s definitions.

mod background;
pub mod finish_expired_rentals;

pub use common::Handler as Task;

pub use self::{
    background::Background, finish_expired_rentals::FinishExpiredRentals,
};
