//! [`Query`] collection related to a single [`contract::Rental`].

use common::operations::By;

use crate::{domain::contract, infra::cache::Scope};
#[cfg(doc)]
use crate::Query;

use super::{Cacheable, CachedQuery};

/// Queries a [`contract::Rental`] by its [`contract::Id`].
///
/// Soft-deleted [`contract::Rental`]s are returned too.
pub type ById = CachedQuery<By<Option<contract::Rental>, contract::Id>>;

impl Cacheable for By<Option<contract::Rental>, contract::Id> {
    const SCOPE: Scope = Scope::RENTAL_CONTRACTS;
    const NAME: &'static str = "rental_contract_by_id";
}
