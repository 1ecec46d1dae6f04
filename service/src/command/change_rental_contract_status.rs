//! [`Command`] for changing a [`rental::Status`] of a [`contract::Rental`].

use common::{
    operations::{
        By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
    },
    Date,
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
    Service,
};

use super::Command;

/// [`Command`] for applying a [`rental::Transition`] to a
/// [`contract::Rental`].
///
/// The [`Equipment`] of the [`contract::Rental`] becomes
/// [`equipment::Status::Rented`] once the [`contract::Rental`] starts
/// holding it, and [`equipment::Status::Available`] once it stops.
#[derive(Clone, Copy, Debug)]
pub struct ChangeRentalContractStatus {
    /// ID of the [`contract::Rental`] to change.
    pub contract_id: contract::Id,

    /// [`rental::Transition`] to apply.
    pub transition: rental::Transition,

    /// [`contract::Version`] the change is based on, if it should be checked.
    pub expected_version: Option<contract::Version>,
}

impl<Db, Ch> Command<ChangeRentalContractStatus> for Service<Db, Ch>
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
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
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
        > + Database<Update<Equipment>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
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
        cmd: ChangeRentalContractStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ChangeRentalContractStatus {
            contract_id,
            transition,
            expected_version,
        } = cmd;

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

        let previous = contract.status;
        let status = contract
            .apply(transition)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let mut equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(
                contract.equipment_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EquipmentNotExists(contract.equipment_id))
            .map_err(tracerr::wrap!())?;

        if transition == rental::Transition::Activate {
            if equipment.is_deleted() {
                return Err(tracerr::new!(E::EquipmentNotExists(
                    equipment.id
                )));
            }
            if equipment.status != equipment::Status::Available {
                return Err(tracerr::new!(E::EquipmentNotAvailable(
                    equipment.status
                )));
            }
            if contract.period.has_ended_by(Date::today()) {
                return Err(tracerr::new!(E::ContractExpired(
                    contract.period.end()
                )));
            }
        }

        contract.version = tx
            .execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConcurrentModification(contract_id))
            .map_err(tracerr::wrap!())?;

        let equipment_changed =
            previous.holds_equipment() != status.holds_equipment();
        if equipment_changed {
            equipment.status = status.equipment_status();
            tx.execute(Update(equipment))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if equipment_changed {
            self.invalidate(&[Scope::RENTAL_CONTRACTS, Scope::EQUIPMENT])
                .await;
        } else {
            self.invalidate(&[Scope::RENTAL_CONTRACTS]).await;
        }

        Ok(contract)
    }
}

/// Error of [`ChangeRentalContractStatus`] [`Command`] execution.
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

    /// [`rental::Period`] of the [`contract::Rental`] has ended already.
    #[display("Rental period has ended on {_0}")]
    #[from(ignore)]
    ContractExpired(#[error(not(source))] Date),

    /// [`contract::Rental`] doesn't exist.
    #[display("`contract::Rental(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Equipment`] is not [`equipment::Status::Available`].
    #[display("`{_0}` equipment cannot be rented")]
    #[from(ignore)]
    EquipmentNotAvailable(#[error(not(source))] equipment::Status),

    /// [`Equipment`] doesn't exist or is deleted.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`rental::Transition`] is not allowed from the current
    /// [`rental::Status`].
    #[display("{_0}")]
    InvalidTransition(rental::InvalidTransition),

    /// Provided [`contract::Version`] is not the stored one.
    #[display("Expected `{expected}` version, but stored one is `{actual}`")]
    #[from(ignore)]
    VersionMismatch {
        /// [`contract::Version`] the change was based on.
        expected: contract::Version,

        /// Stored [`contract::Version`].
        actual: contract::Version,
    },
}
