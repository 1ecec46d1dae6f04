//! [`Command`] for updating an [`Equipment`].

use common::operations::{
    By, Commit, Increment, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for updating an [`Equipment`].
///
/// [`None`] fields are left untouched. [`equipment::SerialNumber`] and
/// [`equipment::Status`] cannot be changed this way.
#[derive(Clone, Debug)]
pub struct UpdateEquipment {
    /// ID of the [`Equipment`] to update.
    pub equipment_id: equipment::Id,

    /// New [`equipment::Name`] of the [`Equipment`].
    pub name: Option<equipment::Name>,

    /// New [`equipment::Brand`] of the [`Equipment`].
    pub brand: Option<equipment::Brand>,

    /// New [`equipment::Kind`] of the [`Equipment`].
    pub kind: Option<equipment::Kind>,

    /// ID of the new [`Supplier`] of the [`Equipment`].
    pub supplier_id: Option<supplier::Id>,
}

impl<Db, Ch> Command<UpdateEquipment> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
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
        cmd: UpdateEquipment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateEquipment {
            equipment_id,
            name,
            brand,
            kind,
            supplier_id,
        } = cmd;

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
            return Err(tracerr::new!(E::EquipmentDeleted(equipment_id)));
        }

        let mut changed = false;
        if let Some(name) = name.filter(|n| *n != equipment.name) {
            equipment.name = name;
            changed = true;
        }
        if let Some(brand) = brand.filter(|b| *b != equipment.brand) {
            equipment.brand = brand;
            changed = true;
        }
        if let Some(kind) = kind.filter(|k| *k != equipment.kind) {
            equipment.kind = kind;
            changed = true;
        }
        if supplier_id.is_some() && supplier_id != equipment.supplier_id {
            equipment.supplier_id = supplier_id;
            changed = true;
        }
        if !changed {
            return Ok(equipment);
        }

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

/// Error of [`UpdateEquipment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Equipment`] is soft-deleted.
    #[display("`Equipment(id: {_0})` is deleted")]
    #[from(ignore)]
    EquipmentDeleted(#[error(not(source))] equipment::Id),

    /// [`Equipment`] doesn't exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Supplier`] doesn't exist or is deleted.
    #[display("`Supplier(id: {_0})` does not exist")]
    #[from(ignore)]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
