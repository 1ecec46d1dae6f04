//! [`Command`] for creating a new [`Customer`].

use common::{
    operations::{Commit, Increment, Insert, Transact, Transacted},
    DateTime,
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

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// [`contact::Name`] of a new [`Customer`].
    pub name: contact::Name,

    /// [`contact::Email`] of a new [`Customer`].
    pub email: Option<contact::Email>,

    /// [`contact::Phone`] of a new [`Customer`].
    pub phone: Option<contact::Phone>,
}

impl<Db, Ch> Command<CreateCustomer> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Customer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
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
        cmd: CreateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCustomer { name, email, phone } = cmd;

        if email.is_none() && phone.is_none() {
            return Err(tracerr::new!(E::NoContactInfo));
        }

        let customer = Customer {
            id: customer::Id::new(),
            name,
            email,
            phone,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(customer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(&[Scope::CUSTOMERS]).await;

        Ok(customer)
    }
}

/// Error of [`CreateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// No contact information provided.
    #[display("No contact information provided")]
    NoContactInfo,
}
