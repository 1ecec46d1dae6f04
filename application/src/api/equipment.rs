//! [`Equipment`]-related definitions.

use std::future;

use common::{DateTime, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar, SellingContract, Supplier},
    AsError, Context, Error,
};

/// A piece of equipment being rented or sold.
#[derive(Clone, Debug)]
pub struct Equipment {
    /// ID of this [`Equipment`].
    id: Id,

    /// Underlying [`domain::Equipment`].
    equipment: OnceCell<domain::Equipment>,
}

impl From<domain::Equipment> for Equipment {
    fn from(equipment: domain::Equipment) -> Self {
        Self {
            id: equipment.id.into(),
            equipment: OnceCell::new_with(Some(equipment)),
        }
    }
}

impl Equipment {
    /// Creates a new [`Equipment`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Equipment`] with the provided ID exists,
    /// otherwise accessing this [`Equipment`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            equipment: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Equipment`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Equipment`] doesn't exist.
    async fn equipment(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Equipment, Error> {
        let id = self.id.into();
        self.equipment
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::equipment::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::NotFoundError::Equipment.into()
                        }))
                    })
            })
            .await
    }
}

/// A piece of equipment being rented or sold.
#[graphql_object(context = Context)]
impl Equipment {
    /// Unique identifier of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.equipment(ctx).await?.name.clone().into())
    }

    /// Manufacturer serial number of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.serialNumber",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn serial_number(
        &self,
        ctx: &Context,
    ) -> Result<SerialNumber, Error> {
        Ok(self.equipment(ctx).await?.serial_number.clone().into())
    }

    /// Manufacturer of this `Equipment`.
    pub async fn brand(&self, ctx: &Context) -> Result<Brand, Error> {
        Ok(self.equipment(ctx).await?.brand.into())
    }

    /// Type of this `Equipment`.
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.equipment(ctx).await?.kind.into())
    }

    /// Availability status of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.equipment(ctx).await?.status.into())
    }

    /// `Supplier` this `Equipment` was obtained from, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.supplier",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn supplier(
        &self,
        ctx: &Context,
    ) -> Result<Option<Supplier>, Error> {
        let supplier_id = self.equipment(ctx).await?.supplier_id;
        #[expect(
            unsafe_code,
            reason = "`Equipment` references existing `Supplier`"
        )]
        let supplier =
            supplier_id.map(|id| unsafe { Supplier::new_unchecked(id) });
        Ok(supplier)
    }

    /// Non-deleted `SellingContract` this `Equipment` was sold by, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.sellingContract",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn selling_contract(
        &self,
        ctx: &Context,
    ) -> Result<Option<SellingContract>, Error> {
        ctx.service()
            .execute(query::selling_contract::ByEquipmentId::by(
                self.id.into(),
            ))
            .await
            .map(|c| c.map(Into::into))
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// `DateTime` when this `Equipment` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.equipment(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Equipment` was deleted, if it was.
    pub async fn deleted_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.equipment(ctx).await?.deleted_at.map(DateTimeOf::coerce))
    }
}

/// Unique identifier of an `Equipment`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::equipment::Id)]
#[into(domain::equipment::Id)]
#[graphql(name = "EquipmentId", transparent)]
pub struct Id(Uuid);

/// Name of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentName",
    with = scalar::Via::<domain::equipment::Name>,
)]
pub struct Name(domain::equipment::Name);

/// Manufacturer serial number of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentSerialNumber",
    with = scalar::Via::<domain::equipment::SerialNumber>,
)]
pub struct SerialNumber(domain::equipment::SerialNumber);

/// Manufacturer of an `Equipment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "EquipmentBrand")]
pub enum Brand {
    /// Caterpillar.
    Caterpillar,

    /// Komatsu.
    Komatsu,

    /// Volvo Construction Equipment.
    Volvo,

    /// JCB.
    Jcb,

    /// Hitachi Construction Machinery.
    Hitachi,

    /// Liebherr.
    Liebherr,

    /// Any other manufacturer.
    Other,
}

impl From<domain::equipment::Brand> for Brand {
    fn from(brand: domain::equipment::Brand) -> Self {
        use domain::equipment::Brand as B;
        match brand {
            B::Caterpillar => Self::Caterpillar,
            B::Komatsu => Self::Komatsu,
            B::Volvo => Self::Volvo,
            B::Jcb => Self::Jcb,
            B::Hitachi => Self::Hitachi,
            B::Liebherr => Self::Liebherr,
            B::Other => Self::Other,
        }
    }
}

impl From<Brand> for domain::equipment::Brand {
    fn from(brand: Brand) -> Self {
        match brand {
            Brand::Caterpillar => Self::Caterpillar,
            Brand::Komatsu => Self::Komatsu,
            Brand::Volvo => Self::Volvo,
            Brand::Jcb => Self::Jcb,
            Brand::Hitachi => Self::Hitachi,
            Brand::Liebherr => Self::Liebherr,
            Brand::Other => Self::Other,
        }
    }
}

/// Type of an `Equipment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "EquipmentKind")]
pub enum Kind {
    /// Excavator.
    Excavator,

    /// Wheel or track loader.
    Loader,

    /// Bulldozer.
    Bulldozer,

    /// Mobile or tower crane.
    Crane,

    /// Forklift.
    Forklift,

    /// Power generator.
    Generator,

    /// Air compressor.
    Compressor,

    /// Any other equipment.
    Other,
}

impl From<domain::equipment::Kind> for Kind {
    fn from(kind: domain::equipment::Kind) -> Self {
        use domain::equipment::Kind as K;
        match kind {
            K::Excavator => Self::Excavator,
            K::Loader => Self::Loader,
            K::Bulldozer => Self::Bulldozer,
            K::Crane => Self::Crane,
            K::Forklift => Self::Forklift,
            K::Generator => Self::Generator,
            K::Compressor => Self::Compressor,
            K::Other => Self::Other,
        }
    }
}

impl From<Kind> for domain::equipment::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Excavator => Self::Excavator,
            Kind::Loader => Self::Loader,
            Kind::Bulldozer => Self::Bulldozer,
            Kind::Crane => Self::Crane,
            Kind::Forklift => Self::Forklift,
            Kind::Generator => Self::Generator,
            Kind::Compressor => Self::Compressor,
            Kind::Other => Self::Other,
        }
    }
}

/// Availability status of an `Equipment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "EquipmentStatus")]
pub enum Status {
    /// Free to be rented or sold.
    Available,

    /// Held by an active or suspended `RentalContract`.
    Rented,

    /// Sold by a `SellingContract`.
    Sold,
}

impl From<domain::equipment::Status> for Status {
    fn from(status: domain::equipment::Status) -> Self {
        use domain::equipment::Status as S;
        match status {
            S::Available => Self::Available,
            S::Rented => Self::Rented,
            S::Sold => Self::Sold,
        }
    }
}

impl From<Status> for domain::equipment::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Available => Self::Available,
            Status::Rented => Self::Rented,
            Status::Sold => Self::Sold,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Equipment`] list.

    use service::{query, read};

    use super::Equipment;

    crate::api::list::define_list! {
        node = Equipment,
        read = read::equipment::list,
        total = query::equipment::TotalCount,
        names = (
            "EquipmentListCursor",
            "EquipmentListEdge",
            "EquipmentListConnection",
            "EquipmentListPageInfo",
        ),
    }
}
