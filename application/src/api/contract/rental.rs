//! [`RentalContract`]-related definitions.

use std::future;

use common::{Date, DateTime, DateTimeOf, Money};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;

#[cfg(doc)]
use crate::api::contract::Contract;
use crate::{
    api::{self, Customer, Equipment},
    AsError, Context, Error,
};

use super::{ContractValue, Id, Version};

/// [`Contract`] about some [`Equipment`] being rented for a period.
#[derive(Clone, Debug)]
pub struct RentalContract {
    /// ID of this [`RentalContract`].
    id: Id,

    /// Underlying [`domain::contract::Rental`].
    contract: OnceCell<domain::contract::Rental>,
}

impl From<domain::contract::Rental> for RentalContract {
    fn from(contract: domain::contract::Rental) -> Self {
        Self {
            id: contract.id.into(),
            contract: OnceCell::new_with(Some(contract)),
        }
    }
}

impl RentalContract {
    /// Creates a new [`RentalContract`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that provided ID relates to an existing
    /// [`domain::contract::Rental`].
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            contract: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::contract::Rental`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::contract::Rental`] doesn't exist.
    async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<&domain::contract::Rental, Error> {
        let id = self.id.into();
        self.contract
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::rental_contract::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::NotFoundError::RentalContract.into()
                        }))
                    })
            })
            .await
    }
}

/// `Contract` about some `Equipment` being rented for a period.
#[graphql_object(context = Context, impl = ContractValue)]
impl RentalContract {
    /// Unique identifier of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RentalContract.id",
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
            gql.name = "RentalContract.version",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn version(&self, ctx: &Context) -> Result<Version, Error> {
        Ok(self.contract(ctx).await?.version.into())
    }

    /// Lifecycle status of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RentalContract.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.contract(ctx).await?.status.into())
    }

    /// First day of the rental period, inclusive.
    pub async fn start_date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.period.start())
    }

    /// Last day of the rental period, inclusive.
    pub async fn end_date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.period.end())
    }

    /// Number of work shifts the `Equipment` is rented for.
    pub async fn shifts(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.contract(ctx).await?.shifts.into())
    }

    /// Price of a single shift.
    pub async fn shift_price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.contract(ctx).await?.shift_price)
    }

    /// Total price of this `Contract`, being the shift price multiplied by
    /// the number of shifts.
    ///
    /// `null` if it's too large to be represented.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RentalContract.totalPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_price(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.contract(ctx).await?.total_price())
    }

    /// Rented `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RentalContract.equipment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn equipment(&self, ctx: &Context) -> Result<Equipment, Error> {
        let id = self.contract(ctx).await?.equipment_id;
        #[expect(
            unsafe_code,
            reason = "`RentalContract` references existing `Equipment`"
        )]
        let equipment = unsafe { Equipment::new_unchecked(id) };
        Ok(equipment)
    }

    /// `Customer` renting the `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RentalContract.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(&self, ctx: &Context) -> Result<Customer, Error> {
        let id = self.contract(ctx).await?.customer_id;
        #[expect(
            unsafe_code,
            reason = "`RentalContract` references existing `Customer`"
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

/// Lifecycle status of a `RentalContract`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RentalContractStatus")]
pub enum Status {
    /// Prepared, but not yet in effect.
    Draft,

    /// In effect, the `Equipment` is with the `Customer`.
    Active,

    /// Temporarily paused, the `Equipment` stays reserved.
    Suspended,

    /// Completed as agreed.
    Finished,

    /// Aborted before completion.
    Cancelled,
}

impl From<domain::contract::rental::Status> for Status {
    fn from(status: domain::contract::rental::Status) -> Self {
        use domain::contract::rental::Status as S;
        match status {
            S::Draft => Self::Draft,
            S::Active => Self::Active,
            S::Suspended => Self::Suspended,
            S::Finished => Self::Finished,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::contract::rental::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => Self::Draft,
            Status::Active => Self::Active,
            Status::Suspended => Self::Suspended,
            Status::Finished => Self::Finished,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Requested change of a `RentalContract` status.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RentalContractTransition")]
pub enum Transition {
    /// `DRAFT` to `ACTIVE`.
    Activate,

    /// `ACTIVE` to `SUSPENDED`.
    Suspend,

    /// `SUSPENDED` to `ACTIVE`.
    Resume,

    /// `ACTIVE` to `FINISHED`.
    Finish,

    /// Any of `DRAFT`, `ACTIVE` or `SUSPENDED` to `CANCELLED`.
    Cancel,
}

impl From<Transition> for domain::contract::rental::Transition {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Activate => Self::Activate,
            Transition::Suspend => Self::Suspend,
            Transition::Resume => Self::Resume,
            Transition::Finish => Self::Finish,
            Transition::Cancel => Self::Cancel,
        }
    }
}

pub mod list {
    //! Definitions related to the [`RentalContract`] list.

    use service::{query, read};

    use super::RentalContract;

    crate::api::list::define_list! {
        node = RentalContract,
        read = read::contract::rental::list,
        total = query::rental_contracts::TotalCount,
        names = (
            "RentalContractListCursor",
            "RentalContractListEdge",
            "RentalContractListConnection",
            "RentalContractListPageInfo",
        ),
    }
}
