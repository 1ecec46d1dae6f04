//! [`Query`] collection related to the multiple [`contract::Rental`]s.

use common::operations::By;

use crate::{infra::cache::Scope, read::contract::rental::list};
#[cfg(doc)]
use crate::{domain::contract, Query};

use super::{Cacheable, CachedQuery};

/// Queries a list of [`contract::Rental`]s.
pub type List = CachedQuery<By<list::Page, list::Selector>>;

/// Queries total count of non-deleted [`contract::Rental`]s.
pub type TotalCount = CachedQuery<By<list::TotalCount, ()>>;

impl Cacheable for By<list::Page, list::Selector> {
    const SCOPE: Scope = Scope::RENTAL_CONTRACTS;
    const NAME: &'static str = "rental_contracts";
}

impl Cacheable for By<list::TotalCount, ()> {
    const SCOPE: Scope = Scope::RENTAL_CONTRACTS;
    const NAME: &'static str = "rental_contracts_total_count";
}
