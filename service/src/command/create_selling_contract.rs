//! [`Command`] for creating a new [`contract::Selling`].

use common::{
    operations::{
        By, Commit, Increment, Insert, Lock, Select, Transact, Transacted,
        Update,
    },
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, customer, equipment, Customer, Equipment},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    read::contract::rental::HasOpen,
    Service,
};

use super::Command;

/// [`Command`] for selling an [`Equipment`] to a [`Customer`].
///
/// The [`Equipment`] becomes [`equipment::Status::Sold`].
#[derive(Clone, Copy, Debug)]
pub struct CreateSellingContract {
    /// ID of the [`Equipment`] to sell.
    pub equipment_id: equipment::Id,

    /// ID of the [`Customer`] buying the [`Equipment`].
    pub customer_id: customer::Id,

    /// Price the [`Equipment`] is sold for.
    pub sale_price: Money,

    /// [`Date`] of the sale.
    ///
    /// [`Date::today()`] if [`None`].
    pub sale_date: Option<Date>,
}

impl<Db, Ch> Command<CreateSellingContract> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HasOpen, equipment::Id>>,
            Ok = HasOpen,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Equipment, equipment::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Customer, customer::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Insert<contract::Selling>, Err = Traced<database::Error>>
        + Database<Update<Equipment>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
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
        cmd: CreateSellingContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSellingContract {
            equipment_id,
            customer_id,
            sale_price,
            sale_date,
        } = cmd;

        if !sale_price.is_positive() {
            return Err(tracerr::new!(E::NonPositivePrice(sale_price)));
        }

        self.database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| !c.is_deleted())
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        self.database()
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|e| !e.is_deleted())
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Equipment`.
        tx.execute(Lock(By::<Equipment, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        // Avoid concurrent deletion of the `Customer`.
        tx.execute(Lock(By::<Customer, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|e| !e.is_deleted())
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())?;
        if equipment.status != equipment::Status::Available {
            return Err(tracerr::new!(E::EquipmentNotAvailable(
                equipment.status
            )));
        }

        tx.execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| !c.is_deleted())
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let has_open = tx
            .execute(Select(By::<HasOpen, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_open {
            return Err(tracerr::new!(E::EquipmentRentalsOpen(equipment_id)));
        }

        let contract = contract::Selling {
            id: contract::Id::new(),
            equipment_id,
            customer_id,
            sale_price,
            sale_date: sale_date.unwrap_or_else(Date::today),
            created_at: DateTime::now().coerce(),
            deleted_at: None,
            version: contract::Version::INITIAL,
        };
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        equipment.status = equipment::Status::Sold;
        tx.execute(Update(equipment))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(&[Scope::SELLING_CONTRACTS, Scope::EQUIPMENT])
            .await;

        Ok(contract)
    }
}

/// Error of [`CreateSellingContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] doesn't exist or is deleted.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Equipment`] is not [`equipment::Status::Available`].
    #[display("`{_0}` equipment cannot be sold")]
    EquipmentNotAvailable(#[error(not(source))] equipment::Status),

    /// [`Equipment`] doesn't exist or is deleted.
    #[display("`Equipment(id: {_0})` does not exist")]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Equipment`] still has open [`contract::Rental`]s.
    #[display("`Equipment(id: {_0})` has open rental contracts")]
    EquipmentRentalsOpen(#[error(not(source))] equipment::Id),

    /// Sale price is zero or negative.
    #[display("Sale price must be positive, but is `{_0}`")]
    NonPositivePrice(#[error(not(source))] Money),
}
