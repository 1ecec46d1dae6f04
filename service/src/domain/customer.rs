//! [`Customer`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact::{Email, Name, Phone};

/// Customer renting or buying equipment.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// [`Name`] of this [`Customer`].
    pub name: Name,

    /// [`Email`] of this [`Customer`].
    pub email: Option<Email>,

    /// [`Phone`] of this [`Customer`].
    pub phone: Option<Phone>,

    /// [`DateTime`] when this [`Customer`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Customer`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Customer {
    /// Indicates whether this [`Customer`] is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// ID of a [`Customer`].
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

/// [`DateTime`] when a [`Customer`] was created.
pub type CreationDateTime = DateTimeOf<(Customer, unit::Creation)>;

/// [`DateTime`] when a [`Customer`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Customer, unit::Deletion)>;
