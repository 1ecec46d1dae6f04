//! [`Query`] collection related to a single [`Supplier`].

use common::operations::By;

use crate::{
    domain::{supplier, Supplier},
    infra::cache::Scope,
};
#[cfg(doc)]
use crate::Query;

use super::{Cacheable, CachedQuery};

/// Queries a [`Supplier`] by its [`supplier::Id`].
///
/// Soft-deleted [`Supplier`]s are returned too.
pub type ById = CachedQuery<By<Option<Supplier>, supplier::Id>>;

impl Cacheable for By<Option<Supplier>, supplier::Id> {
    const SCOPE: Scope = Scope::SUPPLIERS;
    const NAME: &'static str = "supplier_by_id";
}
