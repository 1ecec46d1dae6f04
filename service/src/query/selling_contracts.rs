//! [`Query`] collection related to the multiple [`contract::Selling`]s.

use common::operations::By;

use crate::{infra::cache::Scope, read::contract::selling::list};
#[cfg(doc)]
use crate::{domain::contract, Query};

use super::{Cacheable, CachedQuery};

/// Queries a list of [`contract::Selling`]s.
pub type List = CachedQuery<By<list::Page, list::Selector>>;

/// Queries total count of non-deleted [`contract::Selling`]s.
pub type TotalCount = CachedQuery<By<list::TotalCount, ()>>;

impl Cacheable for By<list::Page, list::Selector> {
    const SCOPE: Scope = Scope::SELLING_CONTRACTS;
    const NAME: &'static str = "selling_contracts";
}

impl Cacheable for By<list::TotalCount, ()> {
    const SCOPE: Scope = Scope::SELLING_CONTRACTS;
    const NAME: &'static str = "selling_contracts_total_count";
}
