//! [`Command`] for creating a new [`Equipment`].

use common::{
    operations::{
        By, Commit, Increment, Insert, Lock, Select, Transact, Transacted,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{equipment, supplier, Equipment, Supplier},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Equipment`].
///
/// New [`Equipment`] is always [`equipment::Status::Available`].
#[derive(Clone, Debug)]
pub struct CreateEquipment {
    /// [`equipment::Name`] of a new [`Equipment`].
    pub name: equipment::Name,

    /// [`equipment::SerialNumber`] of a new [`Equipment`].
    pub serial_number: equipment::SerialNumber,

    /// [`equipment::Brand`] of a new [`Equipment`].
    pub brand: equipment::Brand,

    /// [`equipment::Kind`] of a new [`Equipment`].
    pub kind: equipment::Kind,

    /// ID of the [`Supplier`] a new [`Equipment`] came from.
    pub supplier_id: Option<supplier::Id>,
}

impl<Db, Ch> Command<CreateEquipment> for Service<Db, Ch>
where
    Db: for<'s> Database<
            Select<By<Option<Equipment>, &'s equipment::SerialNumber>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'s> Database<
            Select<By<Option<Equipment>, &'s equipment::SerialNumber>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + for<'s> Database<
            Lock<By<Equipment, &'s equipment::SerialNumber>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Insert<Equipment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ch: Cache<
        Increment<Scope>,
        Ok = cache::Version,
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Equipment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEquipment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEquipment {
            name,
            serial_number,
            brand,
            kind,
            supplier_id,
        } = cmd;

        let occupied = self
            .database()
            .execute(Select(By::<Option<Equipment>, _>::new(&serial_number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if occupied.is_some() {
            return Err(tracerr::new!(E::SerialNumberOccupied(serial_number)));
        }

        if let Some(id) = supplier_id {
            self.database()
                .execute(Select(By::<Option<Supplier>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .filter(|s| !s.is_deleted())
                .ok_or(E::SupplierNotExists(id))
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent creations with the same `SerialNumber`.
        tx.execute(Lock(By::<Equipment, _>::new(&serial_number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let occupied = tx
            .execute(Select(By::<Option<Equipment>, _>::new(&serial_number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if occupied.is_some() {
            return Err(tracerr::new!(E::SerialNumberOccupied(serial_number)));
        }

        let equipment = Equipment {
            id: equipment::Id::new(),
            name,
            serial_number,
            brand,
            kind,
            status: equipment::Status::Available,
            supplier_id,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        tx.execute(Insert(equipment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(&[Scope::EQUIPMENT]).await;

        Ok(equipment)
    }
}

/// Error of [`CreateEquipment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`equipment::SerialNumber`] is already occupied by another
    /// non-deleted [`Equipment`].
    #[display("`{_0}` serial number is occupied")]
    SerialNumberOccupied(#[error(not(source))] equipment::SerialNumber),

    /// [`Supplier`] doesn't exist or is deleted.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
