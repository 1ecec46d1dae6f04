//! [`Command`] for soft-deleting a [`contract::Selling`].

use common::{
    operations::{
        By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, equipment, Equipment},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for soft-deleting a [`contract::Selling`].
///
/// The sold [`Equipment`] becomes [`equipment::Status::Available`] again.
/// Deleting an already deleted [`contract::Selling`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteSellingContract {
    /// ID of the [`contract::Selling`] to delete.
    pub contract_id: contract::Id,

    /// [`contract::Version`] the deletion is based on, if it should be
    /// checked.
    pub expected_version: Option<contract::Version>,
}

impl<Db, Ch> Command<DeleteSellingContract> for Service<Db, Ch>
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
        cmd: DeleteSellingContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteSellingContract {
            contract_id,
            expected_version,
        } = cmd;

        let contract = self
            .database()
            .execute(Select(By::<Option<contract::Selling>, _>::new(
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

        contract.deleted_at = Some(DateTime::now().coerce());
        contract.version = tx
            .execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConcurrentModification(contract_id))
            .map_err(tracerr::wrap!())?;

        let equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(
                contract.equipment_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let mut scopes = vec![Scope::SELLING_CONTRACTS];
        if let Some(mut equipment) =
            equipment.filter(|e| e.status == equipment::Status::Sold)
        {
            equipment.status = equipment::Status::Available;
            tx.execute(Update(equipment))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            scopes.push(Scope::EQUIPMENT);
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.invalidate(&scopes).await;

        Ok(contract)
    }
}

/// Error of [`DeleteSellingContract`] [`Command`] execution.
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
