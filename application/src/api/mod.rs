//! GraphQL API definitions.

pub mod contact;
pub mod contract;
pub mod customer;
pub mod equipment;
mod list;
mod mutation;
mod query;
pub mod scalar;
pub mod supplier;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    contract::{RentalContract, SellingContract},
    customer::Customer,
    equipment::Equipment,
    mutation::Mutation,
    query::Query,
    supplier::Supplier,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}

define_error! {
    enum NotFoundError {
        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Customer` with the provided ID does not exist"]
        Customer,

        #[code = "SUPPLIER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Supplier` with the provided ID does not exist"]
        Supplier,

        #[code = "EQUIPMENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Equipment` with the provided ID does not exist"]
        Equipment,

        #[code = "RENTAL_CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`RentalContract` with the provided ID does not exist"]
        RentalContract,

        #[code = "SELLING_CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`SellingContract` with the provided ID does not exist"]
        SellingContract,
    }
}
