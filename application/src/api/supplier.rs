//! [`Supplier`]-related definitions.

use std::future;

use common::{DateTime, DateTimeOf};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, contact},
    AsError, Context, Error,
};

/// A supplier providing `Equipment`.
#[derive(Clone, Debug)]
pub struct Supplier {
    /// ID of this [`Supplier`].
    id: Id,

    /// Underlying [`domain::Supplier`].
    supplier: OnceCell<domain::Supplier>,
}

impl From<domain::Supplier> for Supplier {
    fn from(supplier: domain::Supplier) -> Self {
        Self {
            id: supplier.id.into(),
            supplier: OnceCell::new_with(Some(supplier)),
        }
    }
}

impl Supplier {
    /// Creates a new [`Supplier`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Supplier`] with the provided ID exists,
    /// otherwise accessing this [`Supplier`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            supplier: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Supplier`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Supplier`] doesn't exist.
    async fn supplier(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Supplier, Error> {
        let id = self.id.into();
        self.supplier
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::supplier::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::NotFoundError::Supplier.into()
                        }))
                    })
            })
            .await
    }
}

/// A supplier providing `Equipment`.
#[graphql_object(context = Context)]
impl Supplier {
    /// Unique identifier of this `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<contact::Name, Error> {
        Ok(self.supplier(ctx).await?.name.clone().into())
    }

    /// Email address of this `Supplier`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(
        &self,
        ctx: &Context,
    ) -> Result<Option<contact::Email>, Error> {
        Ok(self.supplier(ctx).await?.email.clone().map(Into::into))
    }

    /// Phone number of this `Supplier`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(
        &self,
        ctx: &Context,
    ) -> Result<Option<contact::Phone>, Error> {
        Ok(self.supplier(ctx).await?.phone.clone().map(Into::into))
    }

    /// `DateTime` when this `Supplier` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.supplier(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Supplier` was deleted, if it was.
    pub async fn deleted_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.supplier(ctx).await?.deleted_at.map(DateTimeOf::coerce))
    }
}

/// Unique identifier of a `Supplier`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::supplier::Id)]
#[into(domain::supplier::Id)]
#[graphql(name = "SupplierId", transparent)]
pub struct Id(Uuid);

pub mod list {
    //! Definitions related to the [`Supplier`] list.

    use service::{query, read};

    use super::Supplier;

    crate::api::list::define_list! {
        node = Supplier,
        read = read::supplier::list,
        total = query::suppliers::TotalCount,
        names = (
            "SupplierListCursor",
            "SupplierListEdge",
            "SupplierListConnection",
            "SupplierListPageInfo",
        ),
    }
}
