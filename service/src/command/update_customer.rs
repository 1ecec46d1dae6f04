//! [`Command`] for updating a [`Customer`].

use common::operations::{
    By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, customer, Customer},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Customer`].
///
/// [`None`] fields are left untouched.
#[derive(Clone, Debug)]
pub struct UpdateCustomer {
    /// ID of the [`Customer`] to update.
    pub customer_id: customer::Id,

    /// New [`contact::Name`] of the [`Customer`].
    pub name: Option<contact::Name>,

    /// New [`contact::Email`] of the [`Customer`].
    pub email: Option<contact::Email>,

    /// New [`contact::Phone`] of the [`Customer`].
    pub phone: Option<contact::Phone>,
}

impl<Db, Ch> Command<UpdateCustomer> for Service<Db, Ch>
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
        cmd: UpdateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCustomer {
            customer_id,
            name,
            email,
            phone,
        } = cmd;

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
            return Err(tracerr::new!(E::CustomerDeleted(customer_id)));
        }

        let mut changed = false;
        if let Some(name) = name.filter(|n| *n != customer.name) {
            customer.name = name;
            changed = true;
        }
        if let Some(email) = email.filter(|e| customer.email.as_ref() != Some(e))
        {
            customer.email = Some(email);
            changed = true;
        }
        if let Some(phone) = phone.filter(|p| customer.phone.as_ref() != Some(p))
        {
            customer.phone = Some(phone);
            changed = true;
        }
        if !changed {
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

/// Error of [`UpdateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] is soft-deleted.
    #[display("`Customer(id: {_0})` is deleted")]
    #[from(ignore)]
    CustomerDeleted(#[error(not(source))] customer::Id),

    /// [`Customer`] doesn't exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
