//! [`Query`] collection related to a single [`contract::Selling`].

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Equipment, Query};
use crate::{
    domain::{contract, equipment},
    infra::cache::Scope,
};

use super::{Cacheable, CachedQuery};

/// Queries a [`contract::Selling`] by its [`contract::Id`].
///
/// Soft-deleted [`contract::Selling`]s are returned too.
pub type ById = CachedQuery<By<Option<contract::Selling>, contract::Id>>;

/// Queries the non-deleted [`contract::Selling`] of an [`Equipment`].
pub type ByEquipmentId =
    CachedQuery<By<Option<contract::Selling>, equipment::Id>>;

impl Cacheable for By<Option<contract::Selling>, contract::Id> {
    const SCOPE: Scope = Scope::SELLING_CONTRACTS;
    const NAME: &'static str = "selling_contract_by_id";
}

impl Cacheable for By<Option<contract::Selling>, equipment::Id> {
    const SCOPE: Scope = Scope::SELLING_CONTRACTS;
    const NAME: &'static str = "selling_contract_by_equipment_id";
}
