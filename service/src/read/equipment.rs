//! [`Equipment`] read model definition.
//!
//! [`Equipment`]: crate::domain::Equipment

pub mod list {
    //! [`Equipment`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};
    use serde::{Deserialize, Serialize};

    use crate::domain::{equipment, supplier};
    #[cfg(doc)]
    use crate::domain::{Equipment, Supplier};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = equipment::Id;

    /// Cursor pointing to a specific [`Equipment`] in a list.
    pub type Cursor = equipment::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Filter {
        /// [`equipment::Name`] (or its part) to fuzzy search for.
        pub name: Option<equipment::Name>,

        /// [`equipment::Status`] to list [`Equipment`] in.
        pub status: Option<equipment::Status>,

        /// ID of the [`Supplier`] to list [`Equipment`] of.
        pub supplier_id: Option<supplier::Id>,

        /// Indicator whether soft-deleted [`Equipment`] should be listed.
        pub include_deleted: bool,
    }

    /// Total count of non-deleted [`Equipment`].
    #[derive(
        Clone,
        Copy,
        Debug,
        Deserialize,
        Eq,
        From,
        Hash,
        Into,
        PartialEq,
        Serialize,
    )]
    pub struct TotalCount(i32);
}
