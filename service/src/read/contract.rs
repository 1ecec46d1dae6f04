//! Contract read models definitions.

pub mod rental {
    //! [`Rental`] read models.

    use derive_more::Deref;

    use crate::domain::{
        contract::{self, rental::Period},
        equipment,
    };
    #[cfg(doc)]
    use crate::domain::{contract::Rental, Equipment};

    /// Selector of an open [`Rental`] of an [`Equipment`] overlapping some
    /// [`Period`].
    #[derive(Clone, Copy, Debug)]
    pub struct Overlap {
        /// ID of the [`Equipment`] to check.
        pub equipment_id: equipment::Id,

        /// [`Period`] to check.
        pub period: Period,

        /// ID of the [`Rental`] to ignore, if any.
        pub except: Option<contract::Id>,
    }

    /// ID of an open [`Rental`] found by an [`Overlap`].
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Overlapping(pub contract::Id);

    /// Indicator whether any open [`Rental`] exists.
    #[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
    pub struct HasOpen(pub bool);

    impl PartialEq<bool> for HasOpen {
        fn eq(&self, other: &bool) -> bool {
            self.0 == *other
        }
    }

    /// IDs of active [`Rental`]s whose [`Period`] has ended.
    #[derive(Clone, Debug, Default, Deref)]
    pub struct Overdue(pub Vec<contract::Id>);

    pub mod list {
        //! [`Rental`]s list definitions.

        use common::define_pagination;
        use derive_more::{From, Into};
        use serde::{Deserialize, Serialize};

        use crate::domain::{
            contract::{self, rental},
            customer, equipment,
        };
        #[cfg(doc)]
        use crate::domain::{contract::Rental, Customer, Equipment};

        define_pagination!(Cursor, Node, Filter);

        /// Node in a [`Connection`].
        pub type Node = contract::Id;

        /// Cursor pointing to a specific [`Rental`] in a list.
        pub type Cursor = contract::Id;

        /// Filter for [`Selector`].
        #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
        pub struct Filter {
            /// ID of the [`Equipment`] to list [`Rental`]s of.
            pub equipment_id: Option<equipment::Id>,

            /// ID of the [`Customer`] to list [`Rental`]s of.
            pub customer_id: Option<customer::Id>,

            /// [`rental::Status`] to list [`Rental`]s in.
            pub status: Option<rental::Status>,

            /// Indicator whether soft-deleted [`Rental`]s should be listed.
            pub include_deleted: bool,
        }

        /// Total count of non-deleted [`Rental`]s.
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
}

pub mod selling {
    //! [`Selling`] read models.
    //!
    //! [`Selling`]: crate::domain::contract::Selling

    pub mod list {
        //! [`Selling`]s list definitions.

        use common::define_pagination;
        use derive_more::{From, Into};
        use serde::{Deserialize, Serialize};

        use crate::domain::{contract, customer, equipment};
        #[cfg(doc)]
        use crate::domain::{contract::Selling, Customer, Equipment};

        define_pagination!(Cursor, Node, Filter);

        /// Node in a [`Connection`].
        pub type Node = contract::Id;

        /// Cursor pointing to a specific [`Selling`] in a list.
        pub type Cursor = contract::Id;

        /// Filter for [`Selector`].
        #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
        pub struct Filter {
            /// ID of the [`Equipment`] to list [`Selling`]s of.
            pub equipment_id: Option<equipment::Id>,

            /// ID of the [`Customer`] to list [`Selling`]s of.
            pub customer_id: Option<customer::Id>,

            /// Indicator whether soft-deleted [`Selling`]s should be listed.
            pub include_deleted: bool,
        }

        /// Total count of non-deleted [`Selling`]s.
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
}
