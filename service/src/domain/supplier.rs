//! [`Supplier`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact::{Email, Name, Phone};

/// Supplier providing equipment to the inventory.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Supplier {
    /// ID of this [`Supplier`].
    pub id: Id,

    /// [`Name`] of this [`Supplier`].
    pub name: Name,

    /// [`Email`] of this [`Supplier`].
    pub email: Option<Email>,

    /// [`Phone`] of this [`Supplier`].
    pub phone: Option<Phone>,

    /// [`DateTime`] when this [`Supplier`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Supplier`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Supplier {
    /// Indicates whether this [`Supplier`] is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// ID of a [`Supplier`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`DateTime`] when a [`Supplier`] was created.
pub type CreationDateTime = DateTimeOf<(Supplier, unit::Creation)>;

/// [`DateTime`] when a [`Supplier`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Supplier, unit::Deletion)>;
