//! [`Command`] for restoring a soft-deleted [`contract::Rental`].

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
    read::contract::rental::{Overlap, Overlapping},
    Service,
};

use super::Command;

/// [`Command`] for restoring a soft-deleted [`contract::Rental`].
///
/// An open [`contract::Rental`] is restored only if it still fits its
/// [`Equipment`]. Restoring a non-deleted [`contract::Rental`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RestoreRentalContract {
    /// ID of the [`contract::Rental`] to restore.
    pub contract_id: contract::Id,
}

impl<Db, Ch> Command<RestoreRentalContract> for Service<Db, Ch>
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
        cmd: RestoreRentalContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RestoreRentalContract { contract_id } = cmd;

        let contract = self
            .database()
            .execute(Select(By::<Option<contract::Rental>, _>::new(
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
        if !contract.is_deleted() {
            return Ok(contract);
        }

        if contract.status.is_open() {
            let equipment = tx
                .execute(Select(By::<Option<Equipment>, _>::new(
                    contract.equipment_id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .filter(|e| !e.is_deleted())
                .ok_or(E::EquipmentNotExists(contract.equipment_id))
                .map_err(tracerr::wrap!())?;
            if equipment.status == equipment::Status::Sold {
                return Err(tracerr::new!(E::EquipmentSold(equipment.id)));
            }

            let overlap = Overlap {
                equipment_id: contract.equipment_id,
                period: contract.period,
                except: Some(contract_id),
            };
            if let Some(Overlapping(id)) = tx
                .execute(Select(By::<Option<Overlapping>, _>::new(overlap)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
            {
                return Err(tracerr::new!(E::Overlaps(id)));
            }
        }

        contract.deleted_at = None;
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

/// Error of [`RestoreRentalContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`contract::Rental`] was modified concurrently.
    #[display("`contract::Rental(id: {_0})` was modified concurrently")]
    #[from(ignore)]
    ConcurrentModification(#[error(not(source))] contract::Id),

    /// [`contract::Rental`] doesn't exist.
    #[display("`contract::Rental(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Equipment`] doesn't exist or is deleted.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Equipment`] is sold already.
    #[display("`Equipment(id: {_0})` is sold")]
    #[from(ignore)]
    EquipmentSold(#[error(not(source))] equipment::Id),

    /// [`contract::Rental`] would overlap with another open one.
    #[display("Rental period overlaps with `contract::Rental(id: {_0})`")]
    #[from(ignore)]
    Overlaps(#[error(not(source))] contract::Id),
}
