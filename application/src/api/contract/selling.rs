//! [`SellingContract`]-related definitions.

use std::future;

use common::{Date, DateTime, DateTimeOf, Money};
use futures::TryFutureExt as _;
use juniper::graphql_object;
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;

#[cfg(doc)]
use crate::api::contract::Contract;
use crate::{
    api::{self, Customer, Equipment},
    AsError, Context, Error,
};

use super::{ContractValue, Id, Version};

/// [`Contract`] about some [`Equipment`] being sold.
#[derive(Clone, Debug)]
pub struct SellingContract {
    /// ID of this [`SellingContract`].
    id: Id,

    /// Underlying [`domain::contract::Selling`].
    contract: OnceCell<domain::contract::Selling>,
}

impl From<domain::contract::Selling> for SellingContract {
    fn from(contract: domain::contract::Selling) -> Self {
        Self {
            id: contract.id.into(),
            contract: OnceCell::new_with(Some(contract)),
        }
    }
}

impl SellingContract {
    /// Creates a new [`SellingContract`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that provided ID relates to an existing
    /// [`domain::contract::Selling`].
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            contract: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::contract::Selling`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::contract::Selling`] doesn't exist.
    async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<&domain::contract::Selling, Error> {
        let id = self.id.into();
        self.contract
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::selling_contract::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::NotFoundError::SellingContract.into()
                        }))
                    })
            })
            .await
    }
}

/// `Contract` about some `Equipment` being sold.
#[graphql_object(context = Context, impl = ContractValue)]
impl SellingContract {
    /// Unique identifier of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SellingContract.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Current row version of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SellingContract.version",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn version(&self, ctx: &Context) -> Result<Version, Error> {
        Ok(self.contract(ctx).await?.version.into())
    }

    /// Price the `Equipment` is sold for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SellingContract.salePrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn sale_price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.contract(ctx).await?.sale_price)
    }

    /// `Date` of the sale.
    pub async fn sale_date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.sale_date)
    }

    /// Sold `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SellingContract.equipment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn equipment(&self, ctx: &Context) -> Result<Equipment, Error> {
        let id = self.contract(ctx).await?.equipment_id;
        #[expect(
            unsafe_code,
            reason = "`SellingContract` references existing `Equipment`"
        )]
        let equipment = unsafe { Equipment::new_unchecked(id) };
        Ok(equipment)
    }

    /// `Customer` buying the `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SellingContract.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(&self, ctx: &Context) -> Result<Customer, Error> {
        let id = self.contract(ctx).await?.customer_id;
        #[expect(
            unsafe_code,
            reason = "`SellingContract` references existing `Customer`"
        )]
        let customer = unsafe { Customer::new_unchecked(id) };
        Ok(customer)
    }

    /// `DateTime` when this `Contract` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.contract(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Contract` was deleted, if it was.
    pub async fn deleted_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.contract(ctx).await?.deleted_at.map(DateTimeOf::coerce))
    }
}

pub mod list {
    //! Definitions related to the [`SellingContract`] list.

    use service::{query, read};

    use super::SellingContract;

    crate::api::list::define_list! {
        node = SellingContract,
        read = read::contract::selling::list,
        total = query::selling_contracts::TotalCount,
        names = (
            "SellingContractListCursor",
            "SellingContractListEdge",
            "SellingContractListConnection",
            "SellingContractListPageInfo",
        ),
    }
}
