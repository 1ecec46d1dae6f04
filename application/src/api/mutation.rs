//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money};
use juniper::graphql_object;
use service::{command, domain::contract::rental, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Customer`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_CONTACT_INFO` - either `ContactEmail` or `ContactPhone` must be
    ///                       provided.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "createCustomer",
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn create_customer(
        name: api::contact::Name,
        email: Option<api::contact::Email>,
        phone: Option<api::contact::Phone>,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::CreateCustomer {
                name: name.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `Customer`.
    ///
    /// Omitted fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist;
    /// - `CUSTOMER_DELETED` - the `Customer` is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "updateCustomer",
            id = %id,
            name = ?name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn update_customer(
        id: api::customer::Id,
        name: Option<api::contact::Name>,
        email: Option<api::contact::Email>,
        phone: Option<api::contact::Phone>,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::UpdateCustomer {
                customer_id: id.into(),
                name: name.map(Into::into),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Soft-deletes the `Customer`.
    ///
    /// Deleting an already deleted `Customer` is a no-op.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist;
    /// - `CUSTOMER_RENTALS_OPEN` - the `Customer` has open `RentalContract`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteCustomer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::DeleteCustomer {
                customer_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Restores the soft-deleted `Customer`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "restoreCustomer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn restore_customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::RestoreCustomer {
                customer_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_CONTACT_INFO` - either `ContactEmail` or `ContactPhone` must be
    ///                       provided.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "createSupplier",
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn create_supplier(
        name: api::contact::Name,
        email: Option<api::contact::Email>,
        phone: Option<api::contact::Phone>,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(command::CreateSupplier {
                name: name.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `Supplier`.
    ///
    /// Omitted fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` does not exist;
    /// - `SUPPLIER_DELETED` - the `Supplier` is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "updateSupplier",
            id = %id,
            name = ?name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn update_supplier(
        id: api::supplier::Id,
        name: Option<api::contact::Name>,
        email: Option<api::contact::Email>,
        phone: Option<api::contact::Phone>,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(command::UpdateSupplier {
                supplier_id: id.into(),
                name: name.map(Into::into),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Soft-deletes the `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteSupplier",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_supplier(
        id: api::supplier::Id,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(command::DeleteSupplier {
                supplier_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Restores the soft-deleted `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "restoreSupplier",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn restore_supplier(
        id: api::supplier::Id,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(command::RestoreSupplier {
                supplier_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Equipment` in the `AVAILABLE` status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SERIAL_NUMBER_OCCUPIED` - the `EquipmentSerialNumber` belongs to
    ///                              another `Equipment`;
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` does not exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            brand = ?brand,
            gql.name = "createEquipment",
            kind = ?kind,
            name = %name,
            otel.name = Self::SPAN_NAME,
            serial_number = %serial_number,
            supplier_id = ?supplier_id,
        ),
    )]
    pub async fn create_equipment(
        name: api::equipment::Name,
        serial_number: api::equipment::SerialNumber,
        brand: api::equipment::Brand,
        kind: api::equipment::Kind,
        supplier_id: Option<api::supplier::Id>,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(command::CreateEquipment {
                name: name.into(),
                serial_number: serial_number.into(),
                brand: brand.into(),
                kind: kind.into(),
                supplier_id: supplier_id.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `Equipment`.
    ///
    /// Omitted fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` does not exist;
    /// - `EQUIPMENT_DELETED` - the `Equipment` is deleted;
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` does not exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            brand = ?brand,
            gql.name = "updateEquipment",
            id = %id,
            kind = ?kind,
            name = ?name,
            otel.name = Self::SPAN_NAME,
            supplier_id = ?supplier_id,
        ),
    )]
    pub async fn update_equipment(
        id: api::equipment::Id,
        name: Option<api::equipment::Name>,
        brand: Option<api::equipment::Brand>,
        kind: Option<api::equipment::Kind>,
        supplier_id: Option<api::supplier::Id>,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(command::UpdateEquipment {
                equipment_id: id.into(),
                name: name.map(Into::into),
                brand: brand.map(Into::into),
                kind: kind.map(Into::into),
                supplier_id: supplier_id.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Soft-deletes the `Equipment`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` does not exist;
    /// - `EQUIPMENT_RENTED` - the `Equipment` is currently rented;
    /// - `EQUIPMENT_RENTALS_OPEN` - the `Equipment` has open
    ///                              `RentalContract`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteEquipment",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_equipment(
        id: api::equipment::Id,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(command::DeleteEquipment {
                equipment_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Restores the soft-deleted `Equipment`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` does not exist;
    /// - `SERIAL_NUMBER_OCCUPIED` - the `EquipmentSerialNumber` was taken by
    ///                              another `Equipment` meanwhile.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "restoreEquipment",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn restore_equipment(
        id: api::equipment::Id,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(command::RestoreEquipment {
                equipment_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `RentalContract` in the `DRAFT` status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_RENTAL_PERIOD` - `endDate` precedes `startDate`;
    /// - `INVALID_SHIFTS` - `shifts` is not positive;
    /// - `NON_POSITIVE_PRICE` - `shiftPrice` is not positive;
    /// - `START_DATE_IN_PAST` - `startDate` is before today;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist or is deleted;
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` does not exist or is
    ///                            deleted;
    /// - `EQUIPMENT_SOLD` - the `Equipment` is sold;
    /// - `RENTAL_OVERLAPS` - another open `RentalContract` of the
    ///                       `Equipment` overlaps the period.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            end_date = %end_date,
            equipment_id = %equipment_id,
            gql.name = "createRentalContract",
            otel.name = Self::SPAN_NAME,
            shift_price = %shift_price,
            shifts = shifts,
            start_date = %start_date,
        ),
    )]
    pub async fn create_rental_contract(
        equipment_id: api::equipment::Id,
        customer_id: api::customer::Id,
        start_date: Date,
        end_date: Date,
        shifts: i32,
        shift_price: Money,
        ctx: &Context,
    ) -> Result<api::RentalContract, Error> {
        let period = rental::Period::new(start_date, end_date)
            .ok_or_else(|| InputError::InvalidPeriod.into())
            .map_err(ctx.error())?;
        let shifts = rental::Shifts::new(shifts)
            .ok_or_else(|| InputError::InvalidShifts.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateRentalContract {
                equipment_id: equipment_id.into(),
                customer_id: customer_id.into(),
                period,
                shifts,
                shift_price,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided terms of the `DRAFT` `RentalContract`.
    ///
    /// `startDate` and `endDate` must be provided together. Omitted terms
    /// are left unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_RENTAL_PERIOD` - `endDate` precedes `startDate`, or only
    ///                             one of them is provided;
    /// - `INVALID_SHIFTS` - `shifts` is not positive;
    /// - `NON_POSITIVE_PRICE` - `shiftPrice` is not positive;
    /// - `START_DATE_IN_PAST` - `startDate` is before today;
    /// - `RENTAL_CONTRACT_NOT_EXISTS` - the `RentalContract` does not exist;
    /// - `CONTRACT_DELETED` - the `RentalContract` is deleted;
    /// - `CONTRACT_NOT_DRAFT` - the `RentalContract` is not a `DRAFT`;
    /// - `VERSION_MISMATCH` - `expectedVersion` is outdated;
    /// - `CONCURRENT_MODIFICATION` - the `RentalContract` was modified
    ///                               concurrently;
    /// - `RENTAL_OVERLAPS` - another open `RentalContract` of the
    ///                       `Equipment` overlaps the period.
    #[tracing::instrument(
        skip_all,
        fields(
            end_date = ?end_date,
            expected_version = ?expected_version,
            gql.name = "updateRentalContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
            shift_price = ?shift_price,
            shifts = ?shifts,
            start_date = ?start_date,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    pub async fn update_rental_contract(
        id: api::contract::Id,
        expected_version: Option<api::contract::Version>,
        start_date: Option<Date>,
        end_date: Option<Date>,
        shifts: Option<i32>,
        shift_price: Option<Money>,
        ctx: &Context,
    ) -> Result<api::RentalContract, Error> {
        let period = match (start_date, end_date) {
            (None, None) => None,
            (Some(start), Some(end)) => Some(
                rental::Period::new(start, end)
                    .ok_or_else(|| InputError::InvalidPeriod.into())
                    .map_err(ctx.error())?,
            ),
            (Some(_), None) | (None, Some(_)) => {
                return Err(ctx.error()(InputError::InvalidPeriod.into()));
            }
        };
        let shifts = shifts
            .map(|s| {
                rental::Shifts::new(s)
                    .ok_or_else(|| InputError::InvalidShifts.into())
                    .map_err(ctx.error())
            })
            .transpose()?;

        ctx.service()
            .execute(command::UpdateRentalContract {
                contract_id: id.into(),
                expected_version: expected_version.map(Into::into),
                period,
                shifts,
                shift_price,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the `RentalContract` to another status.
    ///
    /// Activation marks the `Equipment` as `RENTED`, while finishing or
    /// cancelling a contract holding the `Equipment` makes it `AVAILABLE`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_CONTRACT_NOT_EXISTS` - the `RentalContract` does not exist;
    /// - `CONTRACT_DELETED` - the `RentalContract` is deleted;
    /// - `VERSION_MISMATCH` - `expectedVersion` is outdated;
    /// - `INVALID_TRANSITION` - the transition is not allowed from the current
    ///                          status;
    /// - `CONTRACT_EXPIRED` - the rental period has already ended;
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` does not exist;
    /// - `EQUIPMENT_NOT_AVAILABLE` - the `Equipment` is not `AVAILABLE`;
    /// - `CONCURRENT_MODIFICATION` - the `RentalContract` was modified
    ///                               concurrently.
    #[tracing::instrument(
        skip_all,
        fields(
            expected_version = ?expected_version,
            gql.name = "changeRentalContractStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            transition = ?transition,
        ),
    )]
    pub async fn change_rental_contract_status(
        id: api::contract::Id,
        transition: api::contract::rental::Transition,
        expected_version: Option<api::contract::Version>,
        ctx: &Context,
    ) -> Result<api::RentalContract, Error> {
        ctx.service()
            .execute(command::ChangeRentalContractStatus {
                contract_id: id.into(),
                transition: transition.into(),
                expected_version: expected_version.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Soft-deletes the `RentalContract`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_CONTRACT_NOT_EXISTS` - the `RentalContract` does not exist;
    /// - `CONTRACT_IN_PROGRESS` - the `RentalContract` is `ACTIVE` or
    ///                            `SUSPENDED`;
    /// - `VERSION_MISMATCH` - `expectedVersion` is outdated;
    /// - `CONCURRENT_MODIFICATION` - the `RentalContract` was modified
    ///                               concurrently.
    #[tracing::instrument(
        skip_all,
        fields(
            expected_version = ?expected_version,
            gql.name = "deleteRentalContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_rental_contract(
        id: api::contract::Id,
        expected_version: Option<api::contract::Version>,
        ctx: &Context,
    ) -> Result<api::RentalContract, Error> {
        ctx.service()
            .execute(command::DeleteRentalContract {
                contract_id: id.into(),
                expected_version: expected_version.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Restores the soft-deleted `RentalContract`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_CONTRACT_NOT_EXISTS` - the `RentalContract` does not exist;
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` does not exist or is
    ///                            deleted;
    /// - `EQUIPMENT_SOLD` - the `Equipment` is sold;
    /// - `RENTAL_OVERLAPS` - another open `RentalContract` of the
    ///                       `Equipment` overlaps the period;
    /// - `CONCURRENT_MODIFICATION` - the `RentalContract` was modified
    ///                               concurrently.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "restoreRentalContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn restore_rental_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::RentalContract, Error> {
        ctx.service()
            .execute(command::RestoreRentalContract {
                contract_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sells the `Equipment` to the `Customer`, marking it as `SOLD`.
    ///
    /// `saleDate` defaults to today.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NON_POSITIVE_PRICE` - `salePrice` is not positive;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist or is deleted;
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` does not exist or is
    ///                            deleted;
    /// - `EQUIPMENT_NOT_AVAILABLE` - the `Equipment` is not `AVAILABLE`;
    /// - `EQUIPMENT_RENTALS_OPEN` - the `Equipment` has open
    ///                              `RentalContract`s.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            equipment_id = %equipment_id,
            gql.name = "createSellingContract",
            otel.name = Self::SPAN_NAME,
            sale_date = ?sale_date,
            sale_price = %sale_price,
        ),
    )]
    pub async fn create_selling_contract(
        equipment_id: api::equipment::Id,
        customer_id: api::customer::Id,
        sale_price: Money,
        sale_date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::SellingContract, Error> {
        ctx.service()
            .execute(command::CreateSellingContract {
                equipment_id: equipment_id.into(),
                customer_id: customer_id.into(),
                sale_price,
                sale_date,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided terms of the `SellingContract`.
    ///
    /// Omitted terms are left unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NON_POSITIVE_PRICE` - `salePrice` is not positive;
    /// - `SELLING_CONTRACT_NOT_EXISTS` - the `SellingContract` does not exist;
    /// - `CONTRACT_DELETED` - the `SellingContract` is deleted;
    /// - `VERSION_MISMATCH` - `expectedVersion` is outdated;
    /// - `CONCURRENT_MODIFICATION` - the `SellingContract` was modified
    ///                               concurrently.
    #[tracing::instrument(
        skip_all,
        fields(
            expected_version = ?expected_version,
            gql.name = "updateSellingContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
            sale_date = ?sale_date,
            sale_price = ?sale_price,
        ),
    )]
    pub async fn update_selling_contract(
        id: api::contract::Id,
        expected_version: Option<api::contract::Version>,
        sale_price: Option<Money>,
        sale_date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::SellingContract, Error> {
        ctx.service()
            .execute(command::UpdateSellingContract {
                contract_id: id.into(),
                expected_version: expected_version.map(Into::into),
                sale_price,
                sale_date,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Soft-deletes the `SellingContract`, making its `Equipment`
    /// `AVAILABLE` again.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SELLING_CONTRACT_NOT_EXISTS` - the `SellingContract` does not exist;
    /// - `VERSION_MISMATCH` - `expectedVersion` is outdated;
    /// - `CONCURRENT_MODIFICATION` - the `SellingContract` was modified
    ///                               concurrently.
    #[tracing::instrument(
        skip_all,
        fields(
            expected_version = ?expected_version,
            gql.name = "deleteSellingContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_selling_contract(
        id: api::contract::Id,
        expected_version: Option<api::contract::Version>,
        ctx: &Context,
    ) -> Result<api::SellingContract, Error> {
        ctx.service()
            .execute(command::DeleteSellingContract {
                contract_id: id.into(),
                expected_version: expected_version.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Restores the soft-deleted `SellingContract`, marking its `Equipment`
    /// as `SOLD` again.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SELLING_CONTRACT_NOT_EXISTS` - the `SellingContract` does not exist;
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` does not exist or is
    ///                            deleted;
    /// - `EQUIPMENT_NOT_AVAILABLE` - the `Equipment` is not `AVAILABLE`;
    /// - `EQUIPMENT_RENTALS_OPEN` - the `Equipment` has open
    ///                              `RentalContract`s;
    /// - `CONCURRENT_MODIFICATION` - the `SellingContract` was modified
    ///                               concurrently.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "restoreSellingContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn restore_selling_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::SellingContract, Error> {
        ctx.service()
            .execute(command::RestoreSellingContract {
                contract_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum InputError {
        #[code = "NO_CONTACT_INFO"]
        #[status = BAD_REQUEST]
        #[message = "Either `ContactEmail` or `ContactPhone` must be provided"]
        NoContactInfo,

        #[code = "NON_POSITIVE_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Price must be positive"]
        NonPositivePrice,

        #[code = "PRICE_TOO_LARGE"]
        #[status = BAD_REQUEST]
        #[message = "Total price of all shifts is too large"]
        PriceTooLarge,

        #[code = "INVALID_RENTAL_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "`startDate` and `endDate` must be provided together, \
                     and `endDate` must not precede `startDate`"]
        InvalidPeriod,

        #[code = "INVALID_SHIFTS"]
        #[status = BAD_REQUEST]
        #[message = "Number of shifts must be positive"]
        InvalidShifts,

        #[code = "START_DATE_IN_PAST"]
        #[status = BAD_REQUEST]
        #[message = "Rental period must not start in the past"]
        StartDateInPast,
    }
}

define_error! {
    enum StateError {
        #[code = "CUSTOMER_DELETED"]
        #[status = CONFLICT]
        #[message = "`Customer` is deleted"]
        CustomerDeleted,

        #[code = "CUSTOMER_RENTALS_OPEN"]
        #[status = CONFLICT]
        #[message = "`Customer` has open `RentalContract`s"]
        CustomerRentalsOpen,

        #[code = "SUPPLIER_DELETED"]
        #[status = CONFLICT]
        #[message = "`Supplier` is deleted"]
        SupplierDeleted,

        #[code = "SERIAL_NUMBER_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "`EquipmentSerialNumber` belongs to another `Equipment`"]
        SerialNumberOccupied,

        #[code = "EQUIPMENT_DELETED"]
        #[status = CONFLICT]
        #[message = "`Equipment` is deleted"]
        EquipmentDeleted,

        #[code = "EQUIPMENT_NOT_AVAILABLE"]
        #[status = CONFLICT]
        #[message = "`Equipment` is not available"]
        EquipmentNotAvailable,

        #[code = "EQUIPMENT_RENTED"]
        #[status = CONFLICT]
        #[message = "`Equipment` is rented"]
        EquipmentRented,

        #[code = "EQUIPMENT_RENTALS_OPEN"]
        #[status = CONFLICT]
        #[message = "`Equipment` has open `RentalContract`s"]
        EquipmentRentalsOpen,

        #[code = "EQUIPMENT_SOLD"]
        #[status = CONFLICT]
        #[message = "`Equipment` is sold"]
        EquipmentSold,

        #[code = "RENTAL_OVERLAPS"]
        #[status = CONFLICT]
        #[message = "Another open `RentalContract` of the `Equipment` \
                     overlaps the period"]
        RentalOverlaps,

        #[code = "CONTRACT_DELETED"]
        #[status = CONFLICT]
        #[message = "`Contract` is deleted"]
        ContractDeleted,

        #[code = "CONTRACT_NOT_DRAFT"]
        #[status = CONFLICT]
        #[message = "Only a `DRAFT` `RentalContract` can be updated"]
        ContractNotDraft,

        #[code = "CONTRACT_IN_PROGRESS"]
        #[status = CONFLICT]
        #[message = "`ACTIVE` or `SUSPENDED` `RentalContract` cannot be \
                     deleted"]
        ContractInProgress,

        #[code = "CONTRACT_EXPIRED"]
        #[status = CONFLICT]
        #[message = "Rental period has already ended"]
        ContractExpired,

        #[code = "INVALID_TRANSITION"]
        #[status = CONFLICT]
        #[message = "Transition is not allowed from the current status"]
        InvalidTransition,
    }
}

define_error! {
    enum ConcurrencyError {
        #[code = "VERSION_MISMATCH"]
        #[status = CONFLICT]
        #[message = "`expectedVersion` does not match the current \
                     `ContractVersion`"]
        VersionMismatch,

        #[code = "CONCURRENT_MODIFICATION"]
        #[status = CONFLICT]
        #[message = "`Contract` was modified concurrently, retry the request"]
        ConcurrentModification,
    }
}

impl AsError for command::create_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NoContactInfo => Some(InputError::NoContactInfo.into()),
        }
    }
}

impl AsError for command::update_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerDeleted(_) => StateError::CustomerDeleted.into(),
            Self::CustomerNotExists(_) => api::NotFoundError::Customer.into(),
        })
    }
}

impl AsError for command::delete_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => api::NotFoundError::Customer.into(),
            Self::CustomerRentalsOpen(_) => {
                StateError::CustomerRentalsOpen.into()
            }
        })
    }
}

impl AsError for command::restore_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CustomerNotExists(_) => {
                Some(api::NotFoundError::Customer.into())
            }
        }
    }
}

impl AsError for command::create_supplier::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NoContactInfo => Some(InputError::NoContactInfo.into()),
        }
    }
}

impl AsError for command::update_supplier::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::SupplierDeleted(_) => StateError::SupplierDeleted.into(),
            Self::SupplierNotExists(_) => api::NotFoundError::Supplier.into(),
        })
    }
}

impl AsError for command::delete_supplier::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SupplierNotExists(_) => {
                Some(api::NotFoundError::Supplier.into())
            }
        }
    }
}

impl AsError for command::restore_supplier::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SupplierNotExists(_) => {
                Some(api::NotFoundError::Supplier.into())
            }
        }
    }
}

impl AsError for command::create_equipment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::SerialNumberOccupied(_) => {
                StateError::SerialNumberOccupied.into()
            }
            Self::SupplierNotExists(_) => api::NotFoundError::Supplier.into(),
        })
    }
}

impl AsError for command::update_equipment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EquipmentDeleted(_) => StateError::EquipmentDeleted.into(),
            Self::EquipmentNotExists(_) => {
                api::NotFoundError::Equipment.into()
            }
            Self::SupplierNotExists(_) => api::NotFoundError::Supplier.into(),
        })
    }
}

impl AsError for command::delete_equipment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EquipmentNotExists(_) => {
                api::NotFoundError::Equipment.into()
            }
            Self::EquipmentRented(_) => StateError::EquipmentRented.into(),
            Self::EquipmentRentalsOpen(_) => {
                StateError::EquipmentRentalsOpen.into()
            }
        })
    }
}

impl AsError for command::restore_equipment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EquipmentNotExists(_) => {
                api::NotFoundError::Equipment.into()
            }
            Self::SerialNumberOccupied(_) => {
                StateError::SerialNumberOccupied.into()
            }
        })
    }
}

impl AsError for command::create_rental_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => api::NotFoundError::Customer.into(),
            Self::EquipmentNotExists(_) => {
                api::NotFoundError::Equipment.into()
            }
            Self::EquipmentSold(_) => StateError::EquipmentSold.into(),
            Self::NonPositivePrice(_) => InputError::NonPositivePrice.into(),
            Self::Overlaps(_) => StateError::RentalOverlaps.into(),
            Self::PriceTooLarge(_) => InputError::PriceTooLarge.into(),
            Self::StartDateInPast(_) => InputError::StartDateInPast.into(),
        })
    }
}

impl AsError for command::update_rental_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ConcurrentModification(_) => {
                ConcurrencyError::ConcurrentModification.into()
            }
            Self::ContractDeleted(_) => StateError::ContractDeleted.into(),
            Self::ContractNotDraft(_) => StateError::ContractNotDraft.into(),
            Self::ContractNotExists(_) => {
                api::NotFoundError::RentalContract.into()
            }
            Self::NonPositivePrice(_) => InputError::NonPositivePrice.into(),
            Self::Overlaps(_) => StateError::RentalOverlaps.into(),
            Self::PriceTooLarge(_) => InputError::PriceTooLarge.into(),
            Self::StartDateInPast(_) => InputError::StartDateInPast.into(),
            Self::VersionMismatch { .. } => {
                ConcurrencyError::VersionMismatch.into()
            }
        })
    }
}

impl AsError for command::change_rental_contract_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ConcurrentModification(_) => {
                ConcurrencyError::ConcurrentModification.into()
            }
            Self::ContractDeleted(_) => StateError::ContractDeleted.into(),
            Self::ContractExpired(_) => StateError::ContractExpired.into(),
            Self::ContractNotExists(_) => {
                api::NotFoundError::RentalContract.into()
            }
            Self::EquipmentNotAvailable(_) => {
                StateError::EquipmentNotAvailable.into()
            }
            Self::EquipmentNotExists(_) => {
                api::NotFoundError::Equipment.into()
            }
            Self::InvalidTransition(_) => StateError::InvalidTransition.into(),
            Self::VersionMismatch { .. } => {
                ConcurrencyError::VersionMismatch.into()
            }
        })
    }
}

impl AsError for command::delete_rental_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ConcurrentModification(_) => {
                ConcurrencyError::ConcurrentModification.into()
            }
            Self::ContractInProgress(_) => {
                StateError::ContractInProgress.into()
            }
            Self::ContractNotExists(_) => {
                api::NotFoundError::RentalContract.into()
            }
            Self::VersionMismatch { .. } => {
                ConcurrencyError::VersionMismatch.into()
            }
        })
    }
}

impl AsError for command::restore_rental_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ConcurrentModification(_) => {
                ConcurrencyError::ConcurrentModification.into()
            }
            Self::ContractNotExists(_) => {
                api::NotFoundError::RentalContract.into()
            }
            Self::EquipmentNotExists(_) => {
                api::NotFoundError::Equipment.into()
            }
            Self::EquipmentSold(_) => StateError::EquipmentSold.into(),
            Self::Overlaps(_) => StateError::RentalOverlaps.into(),
        })
    }
}

impl AsError for command::create_selling_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => api::NotFoundError::Customer.into(),
            Self::EquipmentNotAvailable(_) => {
                StateError::EquipmentNotAvailable.into()
            }
            Self::EquipmentNotExists(_) => {
                api::NotFoundError::Equipment.into()
            }
            Self::EquipmentRentalsOpen(_) => {
                StateError::EquipmentRentalsOpen.into()
            }
            Self::NonPositivePrice(_) => InputError::NonPositivePrice.into(),
        })
    }
}

impl AsError for command::update_selling_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ConcurrentModification(_) => {
                ConcurrencyError::ConcurrentModification.into()
            }
            Self::ContractDeleted(_) => StateError::ContractDeleted.into(),
            Self::ContractNotExists(_) => {
                api::NotFoundError::SellingContract.into()
            }
            Self::NonPositivePrice(_) => InputError::NonPositivePrice.into(),
            Self::VersionMismatch { .. } => {
                ConcurrencyError::VersionMismatch.into()
            }
        })
    }
}

impl AsError for command::delete_selling_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ConcurrentModification(_) => {
                ConcurrencyError::ConcurrentModification.into()
            }
            Self::ContractNotExists(_) => {
                api::NotFoundError::SellingContract.into()
            }
            Self::VersionMismatch { .. } => {
                ConcurrencyError::VersionMismatch.into()
            }
        })
    }
}

impl AsError for command::restore_selling_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ConcurrentModification(_) => {
                ConcurrencyError::ConcurrentModification.into()
            }
            Self::ContractNotExists(_) => {
                api::NotFoundError::SellingContract.into()
            }
            Self::EquipmentNotAvailable(_) => {
                StateError::EquipmentNotAvailable.into()
            }
            Self::EquipmentNotExists(_) => {
                api::NotFoundError::Equipment.into()
            }
            Self::EquipmentRentalsOpen(_) => {
                StateError::EquipmentRentalsOpen.into()
            }
        })
    }
}

#[cfg(test)]
mod spec {
    use service::{command, domain::contract};

    use crate::AsError as _;

    #[test]
    fn maps_stale_version_to_conflict() {
        use command::update_rental_contract::ExecutionError as E;

        let err = E::VersionMismatch {
            expected: contract::Version::INITIAL,
            actual: contract::Version::INITIAL.next(),
        }
        .into_error();

        assert_eq!(err.code, "VERSION_MISMATCH");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
    }

    #[test]
    fn maps_missing_entities_to_not_found() {
        let err = command::delete_customer::ExecutionError::CustomerNotExists(
            service::domain::customer::Id::new(),
        )
        .into_error();

        assert_eq!(err.code, "CUSTOMER_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn maps_contract_state_to_codes() {
        let err =
            command::delete_rental_contract::ExecutionError::ContractInProgress(
                contract::rental::Status::Active,
            )
            .into_error();

        assert_eq!(err.code, "CONTRACT_IN_PROGRESS");

        let err = command::create_customer::ExecutionError::NoContactInfo
            .into_error();

        assert_eq!(err.code, "NO_CONTACT_INFO");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_price_overflow_to_bad_request() {
        use command::create_rental_contract::ExecutionError as E;

        let price = "79228162514264337593543950335USD".parse().unwrap();
        let err = E::PriceTooLarge(price).into_error();

        assert_eq!(err.code, "PRICE_TOO_LARGE");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }
}
