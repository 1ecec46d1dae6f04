//! [`Command`] for soft-deleting a [`Customer`].

use common::{
    operations::{
        By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::contract;
use crate::{
    domain::{customer, Customer},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    read::contract::rental::HasOpen,
    Service,
};

use super::Command;

/// [`Command`] for soft-deleting a [`Customer`].
///
/// Deleting an already deleted [`Customer`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteCustomer {
    /// ID of the [`Customer`] to delete.
    pub customer_id: customer::Id,
}

impl<Db, Ch> Command<DeleteCustomer> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HasOpen, customer::Id>>,
            Ok = HasOpen,
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
        cmd: DeleteCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteCustomer { customer_id } = cmd;

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
        if customer.is_deleted() {
            return Ok(customer);
        }

        let has_open = tx
            .execute(Select(By::<HasOpen, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_open {
            return Err(tracerr::new!(E::CustomerRentalsOpen(customer_id)));
        }

        customer.deleted_at = Some(DateTime::now().coerce());
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

/// Error of [`DeleteCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] doesn't exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Customer`] still has open [`contract::Rental`]s.
    #[display("`Customer(id: {_0})` has open rental contracts")]
    #[from(ignore)]
    CustomerRentalsOpen(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
