//! [`Cache`]-related implementations.
//!
//! Cached values are never evicted explicitly on writes. Instead, every
//! [`Scope`] carries a [`Version`] that is embedded into every [`Key`] built
//! for it, so incrementing the [`Version`] orphans all the values cached
//! before.

pub mod memory;

use std::{
    hash::{Hash, Hasher as _},
    sync::Arc,
};

use derive_more::{Display, Error as StdError, From, Into};
use serde::{de::DeserializeOwned, Serialize};
use xxhash_rust::xxh3;

pub use self::memory::Memory;

/// Cache operation.
pub use common::Handler as Cache;

/// Named group of cached values invalidated together.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct Scope(&'static str);

impl Scope {
    /// [`Scope`] of [`Customer`]-related values.
    ///
    /// [`Customer`]: crate::domain::Customer
    pub const CUSTOMERS: Self = Self("customers");

    /// [`Scope`] of [`Supplier`]-related values.
    ///
    /// [`Supplier`]: crate::domain::Supplier
    pub const SUPPLIERS: Self = Self("suppliers");

    /// [`Scope`] of [`Equipment`]-related values.
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub const EQUIPMENT: Self = Self("equipment");

    /// [`Scope`] of [`contract::Rental`]-related values.
    ///
    /// [`contract::Rental`]: crate::domain::contract::Rental
    pub const RENTAL_CONTRACTS: Self = Self("rental_contracts");

    /// [`Scope`] of [`contract::Selling`]-related values.
    ///
    /// [`contract::Selling`]: crate::domain::contract::Selling
    pub const SELLING_CONTRACTS: Self = Self("selling_contracts");
}

/// Monotonically increasing version of a [`Scope`].
///
/// Unseen [`Scope`]s are at the [`Default`] version.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct Version(u64);

impl Version {
    /// Returns the [`Version`] following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Key of a cached value.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub struct Key(String);

impl Key {
    /// Builds a new [`Key`] of the value `name`d query by `args` in the
    /// provided [`Scope`] at the provided [`Version`].
    #[must_use]
    pub fn new<A: Hash + ?Sized>(
        scope: Scope,
        version: Version,
        name: &str,
        args: &A,
    ) -> Self {
        let mut hasher = xxh3::Xxh3Builder::new().build();
        args.hash(&mut hasher);
        Self(format!("{scope}:v{version}:{name}:{:016x}", hasher.finish()))
    }
}

/// Encoded cached value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Encoded(Arc<[u8]>);

impl Encoded {
    /// Encodes the provided `value`.
    ///
    /// # Errors
    ///
    /// If the `value` cannot be encoded.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Self(serde_json::to_vec(value)?.into()))
    }

    /// Decodes this [`Encoded`] value into a `T`.
    ///
    /// # Errors
    ///
    /// If this [`Encoded`] value doesn't represent a `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.0)?)
    }

    /// Returns size of this [`Encoded`] value in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether this [`Encoded`] value has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// [`Cache`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Value cannot be encoded or decoded.
    #[display("Cannot encode or decode cached value: {_0}")]
    Codec(serde_json::Error),
}

#[cfg(test)]
mod spec {
    use serde::{Deserialize, Serialize};

    use super::{Encoded, Key, Scope, Version};

    #[test]
    fn key_embeds_scope_and_version() {
        let key = Key::new(Scope::EQUIPMENT, Version::from(3), "by_id", &7_u8);

        assert!(key.to_string().starts_with("equipment:v3:by_id:"));
    }

    #[test]
    fn key_changes_with_version() {
        let v = Version::default();
        let old = Key::new(Scope::CUSTOMERS, v, "list", &("a", 1));
        let new = Key::new(Scope::CUSTOMERS, v.next(), "list", &("a", 1));

        assert_ne!(old, new);
    }

    #[test]
    fn key_depends_on_args() {
        let v = Version::default();

        assert_eq!(
            Key::new(Scope::SUPPLIERS, v, "list", &("a", 1)),
            Key::new(Scope::SUPPLIERS, v, "list", &("a", 1)),
        );
        assert_ne!(
            Key::new(Scope::SUPPLIERS, v, "list", &("a", 1)),
            Key::new(Scope::SUPPLIERS, v, "list", &("a", 2)),
        );
    }

    #[test]
    fn encoded_decodes_back() {
        #[derive(Debug, Deserialize, PartialEq, Serialize)]
        struct Page {
            ids: Vec<u32>,
            has_more: bool,
        }

        let page = Page {
            ids: vec![1, 2, 3],
            has_more: true,
        };

        let encoded = Encoded::encode(&page).unwrap();

        assert!(!encoded.is_empty());
        assert_eq!(encoded.decode::<Page>().unwrap(), page);
        assert!(encoded.decode::<Vec<u32>>().is_err());
    }
}
