//! [`Customer`]-related definitions.

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

/// A customer renting or buying `Equipment`.
#[derive(Clone, Debug)]
pub struct Customer {
    /// ID of this [`Customer`].
    id: Id,

    /// Underlying [`domain::Customer`].
    customer: OnceCell<domain::Customer>,
}

impl From<domain::Customer> for Customer {
    fn from(customer: domain::Customer) -> Self {
        Self {
            id: customer.id.into(),
            customer: OnceCell::new_with(Some(customer)),
        }
    }
}

impl Customer {
    /// Creates a new [`Customer`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Customer`] with the provided ID exists,
    /// otherwise accessing this [`Customer`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            customer: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Customer`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Customer`] doesn't exist.
    async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Customer, Error> {
        let id = self.id.into();
        self.customer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::customer::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::NotFoundError::Customer.into()
                        }))
                    })
            })
            .await
    }
}

/// A customer renting or buying `Equipment`.
#[graphql_object(context = Context)]
impl Customer {
    /// Unique identifier of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<contact::Name, Error> {
        Ok(self.customer(ctx).await?.name.clone().into())
    }

    /// Email address of this `Customer`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(
        &self,
        ctx: &Context,
    ) -> Result<Option<contact::Email>, Error> {
        Ok(self.customer(ctx).await?.email.clone().map(Into::into))
    }

    /// Phone number of this `Customer`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(
        &self,
        ctx: &Context,
    ) -> Result<Option<contact::Phone>, Error> {
        Ok(self.customer(ctx).await?.phone.clone().map(Into::into))
    }

    /// `DateTime` when this `Customer` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.customer(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Customer` was deleted, if it was.
    pub async fn deleted_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.customer(ctx).await?.deleted_at.map(DateTimeOf::coerce))
    }
}

/// Unique identifier of a `Customer`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::customer::Id)]
#[into(domain::customer::Id)]
#[graphql(name = "CustomerId", transparent)]
pub struct Id(Uuid);

pub mod list {
    //! Definitions related to the [`Customer`] list.

    use service::{query, read};

    use super::Customer;

    crate::api::list::define_list! {
        node = Customer,
        read = read::customer::list,
        total = query::customers::TotalCount,
        names = (
            "CustomerListCursor",
            "CustomerListEdge",
            "CustomerListConnection",
            "CustomerListPageInfo",
        ),
    }
}
