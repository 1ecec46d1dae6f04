//! Relay-style paginated list definitions shared by all the listed objects.

/// Defines `Cursor`, `Edge`, `Connection` and `PageInfo` GraphQL types of a
/// paginated list of `$node`s backed by the `read::*::list` module of the
/// `service` crate.
///
/// `$node` must provide an `unsafe fn new_unchecked()` accepting the list
/// node.
macro_rules! define_list {
    (
        node = $node:ident,
        read = $($read:ident)::+,
        total = $($total:ident)::+,
        names = (
            $cursor_name:tt,
            $edge_name:tt,
            $connection_name:tt,
            $page_info_name:tt $(,)?
        ) $(,)?
    ) => {
        /// Cursor in the list.
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Copy,
            Debug,
            ::derive_more::From,
            ::juniper::GraphQLScalar,
            ::derive_more::Into,
        )]
        #[graphql(
            name = $cursor_name,
            with = $crate::api::scalar::Via::<$($read)::+::Cursor>,
        )]
        pub struct Cursor(pub $($read)::+::Cursor);

        /// Edge in the list.
        #[derive(Clone, Copy, Debug, ::derive_more::From, ::derive_more::Into)]
        pub struct Edge($($read)::+::Edge);

        /// Edge in a paginated list.
        #[::juniper::graphql_object(
            name = $edge_name,
            context = $crate::Context,
        )]
        impl Edge {
            /// Cursor of this edge.
            #[must_use]
            pub fn cursor(&self) -> Cursor {
                self.0.cursor.into()
            }

            /// Node of this edge.
            #[must_use]
            pub fn node(&self) -> $node {
                #[expect(
                    unsafe_code,
                    reason = "`Edge` loaded from repository guarantees node \
                              existence"
                )]
                unsafe {
                    $node::new_unchecked(self.0.node)
                }
            }
        }

        /// Connection of the list.
        #[derive(Clone, Debug, ::derive_more::From, ::derive_more::Into)]
        pub struct Connection($($read)::+::Connection);

        /// Connection of a paginated list.
        #[::juniper::graphql_object(
            name = $connection_name,
            context = $crate::Context,
        )]
        impl Connection {
            /// Edges of this connection.
            #[must_use]
            pub fn edges(&self) -> Vec<Edge> {
                self.0.edges.iter().copied().map(Into::into).collect()
            }

            /// Information about the page.
            #[must_use]
            pub fn page_info(&self) -> PageInfo {
                PageInfo {
                    info: self.0.page_info(),
                    start_cursor: self
                        .0
                        .edges
                        .first()
                        .map(|e| e.cursor.into()),
                }
            }
        }

        /// Information about a [`Connection`] page.
        #[derive(Clone, Copy, Debug)]
        pub struct PageInfo {
            /// Underlying page information.
            info: $($read)::+::PageInfo,

            /// Start cursor of the page.
            start_cursor: Option<Cursor>,
        }

        /// Information about a page of a paginated list.
        #[::juniper::graphql_object(
            name = $page_info_name,
            context = $crate::Context,
        )]
        impl PageInfo {
            /// Indicator whether there is a next page.
            #[must_use]
            pub fn has_next_page(&self) -> bool {
                self.info.has_next_page
            }

            /// Indicator whether there is a previous page.
            #[must_use]
            pub fn has_previous_page(&self) -> bool {
                self.info.has_previous_page
            }

            /// Start cursor of the page.
            #[must_use]
            pub fn start_cursor(&self) -> Option<Cursor> {
                self.start_cursor
            }

            /// End cursor of the page.
            #[must_use]
            pub fn end_cursor(&self) -> Option<Cursor> {
                self.info.end_cursor.map(Into::into)
            }

            /// Total count of non-deleted nodes.
            pub async fn total_count(
                &self,
                ctx: &$crate::Context,
            ) -> Result<i32, $crate::Error> {
                use ::service::Query as _;

                ctx.service()
                    .execute($($total)::+::by(()))
                    .await
                    .map_err($crate::AsError::into_error)
                    .map_err(ctx.error())
                    .map(Into::into)
            }
        }
    };
}

pub(crate) use define_list;
