//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";

    /// Default number of nodes in a fetched page.
    const DEFAULT_PAGE_SIZE: i32 = 10;
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Customer` with the specified ID.
    ///
    /// Soft-deleted `Customer`s are returned too.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "customer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(query::customer::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotFoundError::Customer.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Customer`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "customers",
            include_deleted = ?include_deleted,
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customers(
        first: Option<i32>,
        after: Option<api::customer::list::Cursor>,
        last: Option<i32>,
        before: Option<api::customer::list::Cursor>,
        name: Option<api::contact::Name>,
        include_deleted: Option<bool>,
        ctx: &Context,
    ) -> Result<api::customer::list::Connection, Error> {
        let arguments = read::customer::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::customers::List::by(
                read::customer::list::Selector {
                    arguments,
                    filter: read::customer::list::Filter {
                        name: name.map(Into::into),
                        include_deleted: include_deleted.unwrap_or_default(),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Supplier` with the specified ID.
    ///
    /// Soft-deleted `Supplier`s are returned too.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` with the specified ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "supplier",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn supplier(
        id: api::supplier::Id,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(query::supplier::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotFoundError::Supplier.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Supplier`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "suppliers",
            include_deleted = ?include_deleted,
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn suppliers(
        first: Option<i32>,
        after: Option<api::supplier::list::Cursor>,
        last: Option<i32>,
        before: Option<api::supplier::list::Cursor>,
        name: Option<api::contact::Name>,
        include_deleted: Option<bool>,
        ctx: &Context,
    ) -> Result<api::supplier::list::Connection, Error> {
        let arguments = read::supplier::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::suppliers::List::by(
                read::supplier::list::Selector {
                    arguments,
                    filter: read::supplier::list::Filter {
                        name: name.map(Into::into),
                        include_deleted: include_deleted.unwrap_or_default(),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Equipment` with the specified ID.
    ///
    /// Soft-deleted `Equipment` is returned too.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "equipment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn equipment(
        id: api::equipment::Id,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(query::equipment::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotFoundError::Equipment.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Equipment`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "equipmentList",
            include_deleted = ?include_deleted,
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            status = ?status,
            supplier_id = ?supplier_id,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn equipment_list(
        first: Option<i32>,
        after: Option<api::equipment::list::Cursor>,
        last: Option<i32>,
        before: Option<api::equipment::list::Cursor>,
        name: Option<api::equipment::Name>,
        status: Option<api::equipment::Status>,
        supplier_id: Option<api::supplier::Id>,
        include_deleted: Option<bool>,
        ctx: &Context,
    ) -> Result<api::equipment::list::Connection, Error> {
        let arguments = read::equipment::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::equipment::List::by(
                read::equipment::list::Selector {
                    arguments,
                    filter: read::equipment::list::Filter {
                        name: name.map(Into::into),
                        status: status.map(Into::into),
                        supplier_id: supplier_id.map(Into::into),
                        include_deleted: include_deleted.unwrap_or_default(),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `RentalContract` with the specified ID.
    ///
    /// Soft-deleted `RentalContract`s are returned too.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_CONTRACT_NOT_EXISTS` - the `RentalContract` with the
    ///                                  specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "rentalContract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rental_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::RentalContract, Error> {
        ctx.service()
            .execute(query::rental_contract::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotFoundError::RentalContract.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `RentalContract`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            customer_id = ?customer_id,
            equipment_id = ?equipment_id,
            first = ?first,
            gql.name = "rentalContracts",
            include_deleted = ?include_deleted,
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn rental_contracts(
        first: Option<i32>,
        after: Option<api::contract::rental::list::Cursor>,
        last: Option<i32>,
        before: Option<api::contract::rental::list::Cursor>,
        equipment_id: Option<api::equipment::Id>,
        customer_id: Option<api::customer::Id>,
        status: Option<api::contract::rental::Status>,
        include_deleted: Option<bool>,
        ctx: &Context,
    ) -> Result<api::contract::rental::list::Connection, Error> {
        let arguments = read::contract::rental::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::rental_contracts::List::by(
                read::contract::rental::list::Selector {
                    arguments,
                    filter: read::contract::rental::list::Filter {
                        equipment_id: equipment_id.map(Into::into),
                        customer_id: customer_id.map(Into::into),
                        status: status.map(Into::into),
                        include_deleted: include_deleted.unwrap_or_default(),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `SellingContract` with the specified ID.
    ///
    /// Soft-deleted `SellingContract`s are returned too.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SELLING_CONTRACT_NOT_EXISTS` - the `SellingContract` with the
    ///                                   specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "sellingContract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn selling_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::SellingContract, Error> {
        ctx.service()
            .execute(query::selling_contract::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotFoundError::SellingContract.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `SellingContract`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            customer_id = ?customer_id,
            equipment_id = ?equipment_id,
            first = ?first,
            gql.name = "sellingContracts",
            include_deleted = ?include_deleted,
            last = ?last,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn selling_contracts(
        first: Option<i32>,
        after: Option<api::contract::selling::list::Cursor>,
        last: Option<i32>,
        before: Option<api::contract::selling::list::Cursor>,
        equipment_id: Option<api::equipment::Id>,
        customer_id: Option<api::customer::Id>,
        include_deleted: Option<bool>,
        ctx: &Context,
    ) -> Result<api::contract::selling::list::Connection, Error> {
        let arguments = read::contract::selling::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::selling_contracts::List::by(
                read::contract::selling::list::Selector {
                    arguments,
                    filter: read::contract::selling::list::Filter {
                        equipment_id: equipment_id.map(Into::into),
                        customer_id: customer_id.map(Into::into),
                        include_deleted: include_deleted.unwrap_or_default(),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}
