//! [`Command`] for updating a [`rental::Status::Draft`] [`contract::Rental`].

use common::{
    operations::{
        By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
    },
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contract::{self, rental},
        equipment, Equipment,
    },
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    read::contract::rental::{Overlap, Overlapping},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`rental::Status::Draft`] [`contract::Rental`].
///
/// [`None`] fields are left untouched.
#[derive(Clone, Copy, Debug)]
pub struct UpdateRentalContract {
    /// ID of the [`contract::Rental`] to update.
    pub contract_id: contract::Id,

    /// [`contract::Version`] the update is based on, if it should be checked.
    pub expected_version: Option<contract::Version>,

    /// New [`rental::Period`] of the [`contract::Rental`].
    pub period: Option<rental::Period>,

    /// New number of [`rental::Shifts`] of the [`contract::Rental`].
    pub shifts: Option<rental::Shifts>,

    /// New price of a single shift.
    pub shift_price: Option<Money>,
}

impl<Db, Ch> Command<UpdateRentalContract> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<contract::Rental>, contract::Id>>,
            Ok = Option<contract::Rental>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<contract::Rental>, contract::Id>>,
            Ok = Option<contract::Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Overlapping>, Overlap>>,
            Ok = Option<Overlapping>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Equipment, equipment::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<contract::Rental, contract::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Update<contract::Rental>,
            Ok = Option<contract::Version>,
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
    Ch: Cache<
        Increment<Scope>,
        Ok = cache::Version,
        Err = Traced<cache::Error>,
    >,
{
    type Ok = contract::Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateRentalContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRentalContract {
            contract_id,
            expected_version,
            period,
            shifts,
            shift_price,
        } = cmd;

        if let Some(price) = shift_price.filter(|p| !p.is_positive()) {
            return Err(tracerr::new!(E::NonPositivePrice(price)));
        }
        if let Some(start) = period.map(|p| p.start()) {
            if start < Date::today() {
                return Err(tracerr::new!(E::StartDateInPast(start)));
            }
        }

        let contract = self
            .database()
            .execute(Select(By::<Option<contract::Rental>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Equipment`.
        tx.execute(Lock(By::<Equipment, _>::new(contract.equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        // Avoid concurrent actions upon the same `contract::Rental`.
        tx.execute(Lock(By::<contract::Rental, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut contract = tx
            .execute(Select(By::<Option<contract::Rental>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if contract.is_deleted() {
            return Err(tracerr::new!(E::ContractDeleted(contract_id)));
        }
        if let Some(expected) = expected_version {
            if expected != contract.version {
                return Err(tracerr::new!(E::VersionMismatch {
                    expected,
                    actual: contract.version,
                }));
            }
        }
        if contract.status != rental::Status::Draft {
            return Err(tracerr::new!(E::ContractNotDraft(contract.status)));
        }

        if let Some(period) = period {
            let overlap = Overlap {
                equipment_id: contract.equipment_id,
                period,
                except: Some(contract_id),
            };
            if let Some(Overlapping(id)) = tx
                .execute(Select(By::<Option<Overlapping>, _>::new(overlap)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
            {
                return Err(tracerr::new!(E::Overlaps(id)));
            }
            contract.period = period;
        }
        if let Some(shifts) = shifts {
            contract.shifts = shifts;
        }
        if let Some(price) = shift_price {
            contract.shift_price = price;
        }
        if contract.total_price().is_none() {
            let price = contract.shift_price;
            return Err(tracerr::new!(E::PriceTooLarge(price)));
        }

        contract.version = tx
            .execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConcurrentModification(contract_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.invalidate(&[Scope::RENTAL_CONTRACTS]).await;

        Ok(contract)
    }
}

/// Error of [`UpdateRentalContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`contract::Rental`] was modified concurrently.
    #[display("`contract::Rental(id: {_0})` was modified concurrently")]
    #[from(ignore)]
    ConcurrentModification(#[error(not(source))] contract::Id),

    /// [`contract::Rental`] is soft-deleted.
    #[display("`contract::Rental(id: {_0})` is deleted")]
    #[from(ignore)]
    ContractDeleted(#[error(not(source))] contract::Id),

    /// [`contract::Rental`] is not a [`rental::Status::Draft`] anymore.
    #[display("`{_0}` rental contract cannot be updated")]
    #[from(ignore)]
    ContractNotDraft(#[error(not(source))] rental::Status),

    /// [`contract::Rental`] doesn't exist.
    #[display("`contract::Rental(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Shift price is zero or negative.
    #[display("Shift price must be positive, but is `{_0}`")]
    #[from(ignore)]
    NonPositivePrice(#[error(not(source))] Money),

    /// New [`rental::Period`] overlaps with the one of another open
    /// [`contract::Rental`].
    #[display("Rental period overlaps with `contract::Rental(id: {_0})`")]
    #[from(ignore)]
    Overlaps(#[error(not(source))] contract::Id),

    /// Total price for all the [`rental::Shifts`] doesn't fit into [`Money`].
    #[display("Total price for `{_0}` shift price is too large")]
    #[from(ignore)]
    PriceTooLarge(#[error(not(source))] Money),

    /// New [`rental::Period`] starts in the past.
    #[display("Rental period cannot start in the past: {_0}")]
    #[from(ignore)]
    StartDateInPast(#[error(not(source))] Date),

    /// Provided [`contract::Version`] is not the stored one.
    #[display("Expected `{expected}` version, but stored one is `{actual}`")]
    #[from(ignore)]
    VersionMismatch {
        /// [`contract::Version`] the update was based on.
        expected: contract::Version,

        /// Stored [`contract::Version`].
        actual: contract::Version,
    },
}
