//! [`Command`] for soft-deleting a [`contract::Rental`].

use common::{
    operations::{
        By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
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

/// [`Command`] for soft-deleting a [`contract::Rental`].
///
/// [`contract::Rental`]s holding their [`Equipment`] cannot be deleted.
/// Deleting an already deleted [`contract::Rental`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRentalContract {
    /// ID of the [`contract::Rental`] to delete.
    pub contract_id: contract::Id,

    /// [`contract::Version`] the deletion is based on, if it should be
    /// checked.
    pub expected_version: Option<contract::Version>,
}

impl<Db, Ch> Command<DeleteRentalContract> for Service<Db, Ch>
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
        cmd: DeleteRentalContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRentalContract {
            contract_id,
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
        if contract.is_deleted() {
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
        if contract.is_deleted() {
            return Ok(contract);
        }
        if let Some(expected) = expected_version {
            if expected != contract.version {
                return Err(tracerr::new!(E::VersionMismatch {
                    expected,
                    actual: contract.version,
                }));
            }
        }
        if contract.status.holds_equipment() {
            return Err(tracerr::new!(E::ContractInProgress(contract.status)));
        }

        contract.deleted_at = Some(DateTime::now().coerce());
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

/// Error of [`DeleteRentalContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`contract::Rental`] was modified concurrently.
    #[display("`contract::Rental(id: {_0})` was modified concurrently")]
    #[from(ignore)]
    ConcurrentModification(#[error(not(source))] contract::Id),

    /// [`contract::Rental`] still holds its [`Equipment`].
    #[display("`{_0}` rental contract cannot be deleted")]
    #[from(ignore)]
    ContractInProgress(#[error(not(source))] rental::Status),

    /// [`contract::Rental`] doesn't exist.
    #[display("`contract::Rental(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Provided [`contract::Version`] is not the stored one.
    #[display("Expected `{expected}` version, but stored one is `{actual}`")]
    #[from(ignore)]
    VersionMismatch {
        /// [`contract::Version`] the deletion was based on.
        expected: contract::Version,

        /// Stored [`contract::Version`].
        actual: contract::Version,
    },
}
