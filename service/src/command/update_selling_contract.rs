//! [`Command`] for updating a [`contract::Selling`].

use common::{
    operations::{
        By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
    },
    Date, Money,
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

/// [`Command`] for updating a [`contract::Selling`].
///
/// [`None`] fields are left untouched.
#[derive(Clone, Copy, Debug)]
pub struct UpdateSellingContract {
    /// ID of the [`contract::Selling`] to update.
    pub contract_id: contract::Id,

    /// [`contract::Version`] the update is based on, if it should be checked.
    pub expected_version: Option<contract::Version>,

    /// New sale price.
    pub sale_price: Option<Money>,

    /// New [`Date`] of the sale.
    pub sale_date: Option<Date>,
}

impl<Db, Ch> Command<UpdateSellingContract> for Service<Db, Ch>
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
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
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
        cmd: UpdateSellingContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateSellingContract {
            contract_id,
            expected_version,
            sale_price,
            sale_date,
        } = cmd;

        if let Some(price) = sale_price.filter(|p| !p.is_positive()) {
            return Err(tracerr::new!(E::NonPositivePrice(price)));
        }

        let contract = self
            .database()
            .execute(Select(By::<Option<contract::Selling>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

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
            return Err(tracerr::new!(E::ContractDeleted(contract_id)));
        }
        if let Some(expected) = expected_version {
            if expected != contract.version {
                return Err(tracerr::new!(E::VersionMismatch {
                    expected,
                    actual: contract.version,
                }));
            }
        }

        if let Some(price) = sale_price {
            contract.sale_price = price;
        }
        if let Some(date) = sale_date {
            contract.sale_date = date;
        }

        contract.version = tx
            .execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ConcurrentModification(contract_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.invalidate(&[Scope::SELLING_CONTRACTS]).await;

        Ok(contract)
    }
}

/// Error of [`UpdateSellingContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`contract::Selling`] was modified concurrently.
    #[display("`contract::Selling(id: {_0})` was modified concurrently")]
    #[from(ignore)]
    ConcurrentModification(#[error(not(source))] contract::Id),

    /// [`contract::Selling`] is soft-deleted.
    #[display("`contract::Selling(id: {_0})` is deleted")]
    #[from(ignore)]
    ContractDeleted(#[error(not(source))] contract::Id),

    /// [`contract::Selling`] doesn't exist.
    #[display("`contract::Selling(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Sale price is zero or negative.
    #[display("Sale price must be positive, but is `{_0}`")]
    #[from(ignore)]
    NonPositivePrice(#[error(not(source))] Money),

    /// Provided [`contract::Version`] is not the stored one.
    #[display("Expected `{expected}` version, but stored one is `{actual}`")]
    #[from(ignore)]
    VersionMismatch {
        /// [`contract::Version`] the update was based on.
        expected: contract::Version,

        /// Stored [`contract::Version`].
        actual: contract::Version,
    },
}
