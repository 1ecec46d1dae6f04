//! [`Query`] collection related to the multiple [`Supplier`]s.

use common::operations::By;

use crate::{infra::cache::Scope, read::supplier::list};
#[cfg(doc)]
use crate::{domain::Supplier, Query};

use super::{Cacheable, CachedQuery};

/// Queries a list of [`Supplier`]s.
pub type List = CachedQuery<By<list::Page, list::Selector>>;

/// Queries total count of non-deleted [`Supplier`]s.
pub type TotalCount = CachedQuery<By<list::TotalCount, ()>>;

impl Cacheable for By<list::Page, list::Selector> {
    const SCOPE: Scope = Scope::SUPPLIERS;
    const NAME: &'static str = "suppliers";
}

impl Cacheable for By<list::TotalCount, ()> {
    const SCOPE: Scope = Scope::SUPPLIERS;
    const NAME: &'static str = "suppliers_total_count";
}
