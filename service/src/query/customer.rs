//! [`Query`] collection related to a single [`Customer`].

use common::operations::By;

use crate::{
    domain::{customer, Customer},
    infra::cache::Scope,
};
#[cfg(doc)]
use crate::Query;

use super::{Cacheable, CachedQuery};

/// Queries a [`Customer`] by its [`customer::Id`].
///
/// Soft-deleted [`Customer`]s are returned too.
pub type ById = CachedQuery<By<Option<Customer>, customer::Id>>;

impl Cacheable for By<Option<Customer>, customer::Id> {
    const SCOPE: Scope = Scope::CUSTOMERS;
    const NAME: &'static str = "customer_by_id";
}
