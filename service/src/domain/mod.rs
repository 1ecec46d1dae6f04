//! Domain definitions.

pub mod contact;
pub mod contract;
pub mod customer;
pub mod equipment;
pub mod supplier;

pub use self::{
    customer::Customer, equipment::Equipment, supplier::Supplier,
};
