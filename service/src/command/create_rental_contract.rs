//! [`Command`] for creating a new [`contract::Rental`].

use common::{
    operations::{
        By, Commit, Increment, Insert, Lock, Select, Transact, Transacted,
    },
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contract::{self, rental},
        customer, equipment, Customer, Equipment,
    },
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    read::contract::rental::{Overlap, Overlapping},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`rental::Status::Draft`]
/// [`contract::Rental`].
#[derive(Clone, Copy, Debug)]
pub struct CreateRentalContract {
    /// ID of the [`Equipment`] to rent.
    pub equipment_id: equipment::Id,

    /// ID of the [`Customer`] renting the [`Equipment`].
    pub customer_id: customer::Id,

    /// [`rental::Period`] the [`Equipment`] is rented for.
    pub period: rental::Period,

    /// Number of [`rental::Shifts`] the [`Equipment`] is rented for.
    pub shifts: rental::Shifts,

    /// Price of a single shift.
    pub shift_price: Money,
}

impl<Db, Ch> Command<CreateRentalContract> for Service<Db, Ch>
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
            Select<By<Option<Overlapping>, Overlap>>,
            Ok = Option<Overlapping>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Equipment, equipment::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Customer, customer::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Insert<contract::Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ch: Cache<
        Increment<Scope>,
        Ok = cache::Version,
        Err = Traced<cache::Error>,
    >,
{
    type Ok = contract::Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRentalContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRentalContract {
            equipment_id,
            customer_id,
            period,
            shifts,
            shift_price,
        } = cmd;

        if !shift_price.is_positive() {
            return Err(tracerr::new!(E::NonPositivePrice(shift_price)));
        }
        if shift_price.checked_mul(shifts.get()).is_none() {
            return Err(tracerr::new!(E::PriceTooLarge(shift_price)));
        }
        if period.start() < Date::today() {
            return Err(tracerr::new!(E::StartDateInPast(period.start())));
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
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        // Avoid concurrent deletion of the `Customer`.
        tx.execute(Lock(By::<Customer, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|e| !e.is_deleted())
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())?;
        if equipment.status == equipment::Status::Sold {
            return Err(tracerr::new!(E::EquipmentSold(equipment_id)));
        }

        tx.execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| !c.is_deleted())
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let overlap = Overlap {
            equipment_id,
            period,
            except: None,
        };
        if let Some(Overlapping(id)) = tx
            .execute(Select(By::<Option<Overlapping>, _>::new(overlap)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::Overlaps(id)));
        }

        let contract = contract::Rental {
            id: contract::Id::new(),
            equipment_id,
            customer_id,
            period,
            shifts,
            shift_price,
            status: rental::Status::Draft,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
            version: contract::Version::INITIAL,
        };
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(&[Scope::RENTAL_CONTRACTS]).await;

        Ok(contract)
    }
}

/// Error of [`CreateRentalContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] doesn't exist or is deleted.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Equipment`] doesn't exist or is deleted.
    #[display("`Equipment(id: {_0})` does not exist")]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Equipment`] is sold already.
    #[display("`Equipment(id: {_0})` is sold")]
    EquipmentSold(#[error(not(source))] equipment::Id),

    /// Shift price is zero or negative.
    #[display("Shift price must be positive, but is `{_0}`")]
    NonPositivePrice(#[error(not(source))] Money),

    /// [`rental::Period`] overlaps with the one of another open
    /// [`contract::Rental`].
    #[display("Rental period overlaps with `contract::Rental(id: {_0})`")]
    Overlaps(#[error(not(source))] contract::Id),

    /// Total price for all the [`rental::Shifts`] doesn't fit into [`Money`].
    #[display("Total price for `{_0}` shift price is too large")]
    PriceTooLarge(#[error(not(source))] Money),

    /// [`rental::Period`] starts in the past.
    #[display("Rental period cannot start in the past: {_0}")]
    StartDateInPast(#[error(not(source))] Date),
}
