//! [`Command`] for restoring a soft-deleted [`Customer`].

use common::operations::{
    By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for restoring a soft-deleted [`Customer`].
///
/// Restoring a non-deleted [`Customer`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RestoreCustomer {
    /// ID of the [`Customer`] to restore.
    pub customer_id: customer::Id,
}

impl<Db, Ch> Command<RestoreCustomer> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Customer, customer::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Customer>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
    Ch: Cache<
        Increment<Scope>,
        Ok = cache::Version,
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RestoreCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RestoreCustomer { customer_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Customer`.
        tx.execute(Lock(By::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut customer = tx
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;
        if customer.deleted_at.take().is_none() {
            return Ok(customer);
        }

        tx.execute(Update(customer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.invalidate(&[Scope::CUSTOMERS]).await;

        Ok(customer)
    }
}

/// Error of [`RestoreCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] doesn't exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
