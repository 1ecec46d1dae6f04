//! [`Selling`] contract definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Date, DateTimeOf, Money};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::{Customer, Equipment};
use crate::domain::{customer, equipment};

use super::{Id, Version};

/// Contract about a [`Customer`] buying an [`Equipment`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Selling {
    /// ID of this [`Selling`].
    pub id: Id,

    /// ID of the sold [`Equipment`].
    pub equipment_id: equipment::Id,

    /// ID of the buying [`Customer`].
    pub customer_id: customer::Id,

    /// Price the [`Equipment`] is sold for.
    pub sale_price: Money,

    /// [`Date`] of the sale.
    pub sale_date: Date,

    /// [`DateTime`] when this [`Selling`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Selling`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,

    /// Row [`Version`] of this [`Selling`].
    pub version: Version,
}

impl Selling {
    /// Indicates whether this [`Selling`] is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// [`DateTime`] when a [`Selling`] was created.
pub type CreationDateTime = DateTimeOf<(Selling, unit::Creation)>;

/// [`DateTime`] when a [`Selling`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Selling, unit::Deletion)>;
