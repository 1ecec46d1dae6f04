//! [`Command`] for updating a [`Supplier`].

use common::operations::{
    By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for updating a [`Supplier`].
///
/// [`None`] fields are left untouched.
#[derive(Clone, Debug)]
pub struct UpdateSupplier {
    /// ID of the [`Supplier`] to update.
    pub supplier_id: supplier::Id,

    /// New [`contact::Name`] of the [`Supplier`].
    pub name: Option<contact::Name>,

    /// New [`contact::Email`] of the [`Supplier`].
    pub email: Option<contact::Email>,

    /// New [`contact::Phone`] of the [`Supplier`].
    pub phone: Option<contact::Phone>,
}

impl<Db, Ch> Command<UpdateSupplier> for Service<Db, Ch>
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
        cmd: UpdateSupplier,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateSupplier {
            supplier_id,
            name,
            email,
            phone,
        } = cmd;

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
        if supplier.is_deleted() {
            return Err(tracerr::new!(E::SupplierDeleted(supplier_id)));
        }

        let mut changed = false;
        if let Some(name) = name.filter(|n| *n != supplier.name) {
            supplier.name = name;
            changed = true;
        }
        if let Some(email) = email.filter(|e| supplier.email.as_ref() != Some(e))
        {
            supplier.email = Some(email);
            changed = true;
        }
        if let Some(phone) = phone.filter(|p| supplier.phone.as_ref() != Some(p))
        {
            supplier.phone = Some(phone);
            changed = true;
        }
        if !changed {
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

/// Error of [`UpdateSupplier`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Supplier`] is soft-deleted.
    #[display("`Supplier(id: {_0})` is deleted")]
    #[from(ignore)]
    SupplierDeleted(#[error(not(source))] supplier::Id),

    /// [`Supplier`] doesn't exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    #[from(ignore)]
    SupplierNotExists(#[error(not(source))] supplier::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
