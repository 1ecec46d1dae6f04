//! [`Command`] for restoring a soft-deleted [`Equipment`].

use common::operations::{
    By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{equipment, Equipment},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for restoring a soft-deleted [`Equipment`].
///
/// Restoring a non-deleted [`Equipment`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RestoreEquipment {
    /// ID of the [`Equipment`] to restore.
    pub equipment_id: equipment::Id,
}

impl<Db, Ch> Command<RestoreEquipment> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + for<'s> Database<
            Select<By<Option<Equipment>, &'s equipment::SerialNumber>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Equipment, equipment::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + for<'s> Database<
            Lock<By<Equipment, &'s equipment::SerialNumber>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Equipment>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
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
        cmd: RestoreEquipment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RestoreEquipment { equipment_id } = cmd;

        let equipment = self
            .database()
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())?;
        if !equipment.is_deleted() {
            return Ok(equipment);
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Equipment`.
        tx.execute(Lock(By::<Equipment, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        // Avoid concurrent creations with the same `SerialNumber`.
        tx.execute(Lock(By::<Equipment, _>::new(&equipment.serial_number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())?;
        if !equipment.is_deleted() {
            return Ok(equipment);
        }

        let occupied = tx
            .execute(Select(By::<Option<Equipment>, _>::new(
                &equipment.serial_number,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if occupied.is_some() {
            return Err(tracerr::new!(E::SerialNumberOccupied(
                equipment.serial_number
            )));
        }

        equipment.deleted_at = None;
        tx.execute(Update(equipment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.invalidate(&[Scope::EQUIPMENT]).await;

        Ok(equipment)
    }
}

/// Error of [`RestoreEquipment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Equipment`] doesn't exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`equipment::SerialNumber`] was taken by another [`Equipment`] since
    /// the deletion.
    #[display("`{_0}` serial number is occupied")]
    #[from(ignore)]
    SerialNumberOccupied(#[error(not(source))] equipment::SerialNumber),
}
