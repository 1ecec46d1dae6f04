//! [`Command`] for soft-deleting an [`Equipment`].

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
    domain::{equipment, Equipment},
    infra::{
        cache::{self, Scope},
        database, Cache, Database,
    },
    read::contract::rental::HasOpen,
    Service,
};

use super::Command;

/// [`Command`] for soft-deleting an [`Equipment`].
///
/// Deleting an already deleted [`Equipment`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteEquipment {
    /// ID of the [`Equipment`] to delete.
    pub equipment_id: equipment::Id,
}

impl<Db, Ch> Command<DeleteEquipment> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
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
        cmd: DeleteEquipment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteEquipment { equipment_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Equipment`.
        tx.execute(Lock(By::<Equipment, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())?;
        if equipment.is_deleted() {
            return Ok(equipment);
        }
        if equipment.status == equipment::Status::Rented {
            return Err(tracerr::new!(E::EquipmentRented(equipment_id)));
        }

        let has_open = tx
            .execute(Select(By::<HasOpen, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_open {
            return Err(tracerr::new!(E::EquipmentRentalsOpen(equipment_id)));
        }

        equipment.deleted_at = Some(DateTime::now().coerce());
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

/// Error of [`DeleteEquipment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Equipment`] doesn't exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Equipment`] is rented at the moment.
    #[display("`Equipment(id: {_0})` is rented")]
    #[from(ignore)]
    EquipmentRented(#[error(not(source))] equipment::Id),

    /// [`Equipment`] still has open [`contract::Rental`]s.
    #[display("`Equipment(id: {_0})` has open rental contracts")]
    #[from(ignore)]
    EquipmentRentalsOpen(#[error(not(source))] equipment::Id),
}
