//! [`Customer`] read model definition.
//!
//! [`Customer`]: crate::domain::Customer

pub mod list {
    //! [`Customer`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};
    use serde::{Deserialize, Serialize};

    use crate::domain::{contact, customer};
    #[cfg(doc)]
    use crate::domain::Customer;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = customer::Id;

    /// Cursor pointing to a specific [`Customer`] in a list.
    pub type Cursor = customer::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Filter {
        /// [`contact::Name`] (or its part) to fuzzy search for.
        pub name: Option<contact::Name>,

        /// Indicator whether soft-deleted [`Customer`]s should be listed.
        pub include_deleted: bool,
    }

    /// Total count of non-deleted [`Customer`]s.
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
