//! Contact information shared by `Customer`s and `Supplier`s.

use derive_more::{AsRef, Display, From, Into};
use juniper::GraphQLScalar;
use service::domain::contact;

use crate::api::scalar;

/// Name of a `Customer` or a `Supplier`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ContactName", with = scalar::Via::<contact::Name>)]
pub struct Name(contact::Name);

/// Email address of a `Customer` or a `Supplier`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ContactEmail", with = scalar::Via::<contact::Email>)]
pub struct Email(contact::Email);

/// Phone number of a `Customer` or a `Supplier`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ContactPhone", with = scalar::Via::<contact::Phone>)]
pub struct Phone(contact::Phone);
