//! [`Query`] collection related to [`Equipment`].

use common::operations::By;

use crate::{
    domain::{equipment, Equipment},
    infra::cache::Scope,
    read::equipment::list,
};
#[cfg(doc)]
use crate::Query;

use super::{Cacheable, CachedQuery};

/// Queries an [`Equipment`] by its [`equipment::Id`].
///
/// Soft-deleted [`Equipment`] is returned too.
pub type ById = CachedQuery<By<Option<Equipment>, equipment::Id>>;

/// Queries a list of [`Equipment`].
pub type List = CachedQuery<By<list::Page, list::Selector>>;

/// Queries total count of non-deleted [`Equipment`].
pub type TotalCount = CachedQuery<By<list::TotalCount, ()>>;

impl Cacheable for By<Option<Equipment>, equipment::Id> {
    const SCOPE: Scope = Scope::EQUIPMENT;
    const NAME: &'static str = "equipment_by_id";
}

impl Cacheable for By<list::Page, list::Selector> {
    const SCOPE: Scope = Scope::EQUIPMENT;
    const NAME: &'static str = "equipment";
}

impl Cacheable for By<list::TotalCount, ()> {
    const SCOPE: Scope = Scope::EQUIPMENT;
    const NAME: &'static str = "equipment_total_count";
}
