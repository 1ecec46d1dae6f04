//! [`Command`] for restoring a soft-deleted [`contract::Selling`].

use common::operations::{
    By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, equipment, Equipment},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    read::contract::rental::HasOpen,
    Service,
};

use super::Command;

/// [`Command`] for restoring a soft-deleted [`contract::Selling`].
///
/// The [`Equipment`] must be [`equipment::Status::Available`] and becomes
/// [`equipment::Status::Sold`] again. Restoring a non-deleted
/// [`contract::Selling`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RestoreSellingContract {
    /// ID of the [`contract::Selling`] to restore.
    pub contract_id: contract::Id,
}

impl<Db, Ch> Command<RestoreSellingContract> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<contract::Selling>, contract::Id>>,
            Ok = Option<contract::Selling>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<contract::Selling>, contract::Id>>,
            Ok = Option<contract::Selling>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HasOpen, equipment::Id>>,
            Ok = HasOpen,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Equipment, equipment::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<contract::Selling, contract::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Update<contract::Selling>,
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
    type Ok = contract::Selling;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RestoreSellingContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RestoreSellingContract { contract_id } = cmd;

        let contract = self
            .database()
            .execute(Select(By::<Option<contract::Selling>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if !contract.is_deleted() {
            return Ok(contract);
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Equipment`.
        tx.execute(Lock(By::<Equipment, _>::new(contract.equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        // Avoid concurrent actions upon the same `contract::Selling`.
        tx.execute(Lock(By::<contract::Selling, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut contract = tx
            .execute(Select(By::<Option<contract::Selling>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if !contract.is_deleted() {
            return Ok(contract);
        }

        let mut equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(
                contract.equipment_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|e| !e.is_deleted())
            .ok_or(E::EquipmentNotExists(contract.equipment_id))
            .map_err(tracerr::wrap!())?;
        if equipment.status != equipment::Status::Available {
            return Err(tracerr::new!(E::EquipmentNotAvailable(
                equipment.status
            )));
        }

        let has_open = tx
            .execute(Select(By::<HasOpen, _>::new(equipment.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_open {
            return Err(tracerr::new!(E::EquipmentRentalsOpen(equipment.id)));
        }

        contract.deleted_at = None;
        contract.version = tx
            .execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConcurrentModification(contract_id))
            .map_err(tracerr::wrap!())?;

        equipment.status = equipment::Status::Sold;
        tx.execute(Update(equipment))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.invalidate(&[Scope::SELLING_CONTRACTS, Scope::EQUIPMENT])
            .await;

        Ok(contract)
    }
}

/// Error of [`RestoreSellingContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`contract::Selling`] was modified concurrently.
    #[display("`contract::Selling(id: {_0})` was modified concurrently")]
    #[from(ignore)]
    ConcurrentModification(#[error(not(source))] contract::Id),

    /// [`contract::Selling`] doesn't exist.
    #[display("`contract::Selling(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Equipment`] is not [`equipment::Status::Available`].
    #[display("`{_0}` equipment cannot be sold")]
    #[from(ignore)]
    EquipmentNotAvailable(#[error(not(source))] equipment::Status),

    /// [`Equipment`] doesn't exist or is deleted.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Equipment`] has open [`contract::Rental`]s.
    #[display("`Equipment(id: {_0})` has open rental contracts")]
    #[from(ignore)]
    EquipmentRentalsOpen(#[error(not(source))] equipment::Id),
}
