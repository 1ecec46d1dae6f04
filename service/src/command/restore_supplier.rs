//! [`Command`] for restoring a soft-deleted [`Supplier`].

use common::operations::{
    By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{supplier, Supplier},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for restoring a soft-deleted [`Supplier`].
///
/// Restoring a non-deleted [`Supplier`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RestoreSupplier {
    /// ID of the [`Supplier`] to restore.
    pub supplier_id: supplier::Id,
}

impl<Db, Ch> Command<RestoreSupplier> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Supplier, supplier::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Supplier>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
    Ch: Cache<
        Increment<Scope>,
        Ok = cache::Version,
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Supplier;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RestoreSupplier,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RestoreSupplier { supplier_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Supplier`.
        tx.execute(Lock(By::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut supplier = tx
            .execute(Select(By::<Option<Supplier>, _>::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SupplierNotExists(supplier_id))
            .map_err(tracerr::wrap!())?;
        if supplier.deleted_at.take().is_none() {
            return Ok(supplier);
        }

        tx.execute(Update(supplier.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.invalidate(&[Scope::SUPPLIERS]).await;

        Ok(supplier)
    }
}

/// Error of [`RestoreSupplier`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Supplier`] doesn't exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    #[from(ignore)]
    SupplierNotExists(#[error(not(source))] supplier::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
