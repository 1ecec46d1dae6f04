//! [`Equipment`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::supplier;
#[cfg(doc)]
use crate::domain::{contract, Supplier};

/// Piece of equipment available for rent or sale.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Equipment {
    /// ID of this [`Equipment`].
    pub id: Id,

    /// [`Name`] of this [`Equipment`].
    pub name: Name,

    /// [`SerialNumber`] of this [`Equipment`].
    pub serial_number: SerialNumber,

    /// [`Brand`] of this [`Equipment`].
    pub brand: Brand,

    /// [`Kind`] of this [`Equipment`].
    pub kind: Kind,

    /// [`Status`] of this [`Equipment`].
    pub status: Status,

    /// ID of the [`Supplier`] this [`Equipment`] came from, if known.
    pub supplier_id: Option<supplier::Id>,

    /// [`DateTime`] when this [`Equipment`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Equipment`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Equipment {
    /// Indicates whether this [`Equipment`] is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// ID of an [`Equipment`].
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

/// Name of an [`Equipment`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Manufacturer serial number of an [`Equipment`].
///
/// Unique among non-deleted [`Equipment`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Creates a new [`SerialNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`SerialNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`SerialNumber`] invariants:
        /// - Must start and end with a letter or a digit;
        /// - May contain `-`, `_`, `/` and `.` separators;
        /// - Must be between 1 and 64 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9\-_/.]{0,62}[A-Za-z0-9])?$")
                .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for SerialNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SerialNumber`")
    }
}

define_kind! {
    #[doc = "Manufacturer of an [`Equipment`]."]
    enum Brand {
        #[doc = "Caterpillar."]
        Caterpillar = 1,

        #[doc = "Komatsu."]
        Komatsu = 2,

        #[doc = "Volvo Construction Equipment."]
        Volvo = 3,

        #[doc = "JCB."]
        Jcb = 4,

        #[doc = "Hitachi Construction Machinery."]
        Hitachi = 5,

        #[doc = "Liebherr."]
        Liebherr = 6,

        #[doc = "Any other manufacturer."]
        Other = 7,
    }
}

define_kind! {
    #[doc = "Type of an [`Equipment`]."]
    enum Kind {
        #[doc = "Excavator."]
        Excavator = 1,

        #[doc = "Wheel or track loader."]
        Loader = 2,

        #[doc = "Bulldozer."]
        Bulldozer = 3,

        #[doc = "Mobile or tower crane."]
        Crane = 4,

        #[doc = "Forklift."]
        Forklift = 5,

        #[doc = "Power generator."]
        Generator = 6,

        #[doc = "Air compressor."]
        Compressor = 7,

        #[doc = "Any other equipment."]
        Other = 8,
    }
}

define_kind! {
    #[doc = "Availability status of an [`Equipment`]."]
    enum Status {
        #[doc = "Free to be rented or sold."]
        Available = 1,

        #[doc = "Held by an active or suspended [`contract::Rental`]."]
        Rented = 2,

        #[doc = "Sold by a [`contract::Selling`]."]
        Sold = 3,
    }
}

/// [`DateTime`] when an [`Equipment`] was created.
pub type CreationDateTime = DateTimeOf<(Equipment, unit::Creation)>;

/// [`DateTime`] when an [`Equipment`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Equipment, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::{SerialNumber, Status};

    #[test]
    fn serial_number() {
        assert!(SerialNumber::new("CAT-320D/2019.7").is_some());
        assert!(SerialNumber::new("A").is_some());
        assert!(SerialNumber::new("").is_none());
        assert!(SerialNumber::new("-leading").is_none());
        assert!(SerialNumber::new("with space").is_none());
        assert!(SerialNumber::new("x".repeat(65)).is_none());
    }

    #[test]
    fn status_text() {
        assert_eq!(Status::Available.to_string(), "AVAILABLE");
        assert_eq!(Status::from_str("SOLD").unwrap(), Status::Sold);
        assert_eq!(Status::Rented.u8(), 2);
    }
}
