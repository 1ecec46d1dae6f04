//! [`Contract`]-related definitions.

pub mod rental;
pub mod selling;

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{GraphQLInterface, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{
    api::{Customer, Equipment},
    Context,
};

pub use self::{rental::RentalContract, selling::SellingContract};

/// Contract between the agency and a `Customer` about some `Equipment`.
#[derive(Clone, Debug, GraphQLInterface)]
#[graphql(context = Context, for = [RentalContract, SellingContract])]
pub struct Contract {
    /// Unique identifier of the `Contract`.
    id: Id,

    /// Current row version of the `Contract`.
    ///
    /// Should be provided back on modifications to detect concurrent ones.
    version: Version,

    /// `Equipment` this `Contract` is about.
    equipment: Equipment,

    /// `Customer` being the counterparty of this `Contract`.
    customer: Customer,

    /// `DateTime` when this `Contract` was created.
    created_at: DateTime,

    /// `DateTime` when this `Contract` was deleted, if it was.
    deleted_at: Option<DateTime>,
}

/// Unique identifier of a `Contract`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::contract::Id)]
#[into(domain::contract::Id)]
#[graphql(name = "ContractId", transparent)]
pub struct Id(Uuid);

/// Row version of a `Contract`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::contract::Version)]
#[into(domain::contract::Version)]
#[graphql(name = "ContractVersion", transparent)]
pub struct Version(i32);
