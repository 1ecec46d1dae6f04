//! Read entities definitions.

pub mod contract;
pub mod customer;
pub mod equipment;
pub mod supplier;
