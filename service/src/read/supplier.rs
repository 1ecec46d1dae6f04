//! [`Supplier`] read model definition.
//!
//! [`Supplier`]: crate::domain::Supplier

pub mod list {
    //! [`Supplier`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};
    use serde::{Deserialize, Serialize};

    use crate::domain::{contact, supplier};
    #[cfg(doc)]
    use crate::domain::Supplier;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = supplier::Id;

    /// Cursor pointing to a specific [`Supplier`] in a list.
    pub type Cursor = supplier::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Filter {
        /// [`contact::Name`] (or its part) to fuzzy search for.
        pub name: Option<contact::Name>,

        /// Indicator whether soft-deleted [`Supplier`]s should be listed.
        pub include_deleted: bool,
    }

    /// Total count of non-deleted [`Supplier`]s.
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
