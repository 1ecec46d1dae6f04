//! [`Query`] collection related to the multiple [`Customer`]s.

use common::operations::By;

use crate::{infra::cache::Scope, read::customer::list};
#[cfg(doc)]
use crate::{domain::Customer, Query};

use super::{Cacheable, CachedQuery};

/// Queries a list of [`Customer`]s.
pub type List = CachedQuery<By<list::Page, list::Selector>>;

/// Queries total count of non-deleted [`Customer`]s.
pub type TotalCount = CachedQuery<By<list::TotalCount, ()>>;

impl Cacheable for By<list::Page, list::Selector> {
    const SCOPE: Scope = Scope::CUSTOMERS;
    const NAME: &'static str = "customers";
}

impl Cacheable for By<list::TotalCount, ()> {
    const SCOPE: Scope = Scope::CUSTOMERS;
    const NAME: &'static str = "customers_total_count";
}
