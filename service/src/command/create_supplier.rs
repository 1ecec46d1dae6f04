//! [`Command`] for creating a new [`Supplier`].

use common::{
    operations::{Commit, Increment, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, supplier, Supplier},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Supplier`].
#[derive(Clone, Debug)]
pub struct CreateSupplier {
    /// [`contact::Name`] of a new [`Supplier`].
    pub name: contact::Name,

    /// [`contact::Email`] of a new [`Supplier`].
    pub email: Option<contact::Email>,

    /// [`contact::Phone`] of a new [`Supplier`].
    pub phone: Option<contact::Phone>,
}

impl<Db, Ch> Command<CreateSupplier> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Supplier>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
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
        cmd: CreateSupplier,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSupplier { name, email, phone } = cmd;

        if email.is_none() && phone.is_none() {
            return Err(tracerr::new!(E::NoContactInfo));
        }

        let supplier = Supplier {
            id: supplier::Id::new(),
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
        tx.execute(Insert(supplier.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(&[Scope::SUPPLIERS]).await;

        Ok(supplier)
    }
}

/// Error of [`CreateSupplier`] [`Command`] execution.
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
