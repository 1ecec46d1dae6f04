//! [`Command`] definition.

pub mod change_rental_contract_status;
pub mod create_customer;
pub mod create_equipment;
pub mod create_rental_contract;
pub mod create_selling_contract;
pub mod create_supplier;
pub mod delete_customer;
pub mod delete_equipment;
pub mod delete_rental_contract;
pub mod delete_selling_contract;
pub mod delete_supplier;
pub mod restore_customer;
pub mod restore_equipment;
pub mod restore_rental_contract;
pub mod restore_selling_contract;
pub mod restore_supplier;
pub mod update_customer;
pub mod update_equipment;
pub mod update_rental_contract;
pub mod update_selling_contract;
pub mod update_supplier;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    change_rental_contract_status::ChangeRentalContractStatus,
    create_customer::CreateCustomer, create_equipment::CreateEquipment,
    create_rental_contract::CreateRentalContract,
    create_selling_contract::CreateSellingContract,
    create_supplier::CreateSupplier, delete_customer::DeleteCustomer,
    delete_equipment::DeleteEquipment,
    delete_rental_contract::DeleteRentalContract,
    delete_selling_contract::DeleteSellingContract,
    delete_supplier::DeleteSupplier, restore_customer::RestoreCustomer,
    restore_equipment::RestoreEquipment,
    restore_rental_contract::RestoreRentalContract,
    restore_selling_contract::RestoreSellingContract,
    restore_supplier::RestoreSupplier, update_customer::UpdateCustomer,
    update_equipment::UpdateEquipment,
    update_rental_contract::UpdateRentalContract,
    update_selling_contract::UpdateSellingContract,
    update_supplier::UpdateSupplier,
};

#[cfg(test)]
mod spec {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use common::{
        operations::{
            By, Commit, Insert, Lock, Perform, Select, Transact, Update,
        },
        Date, DateTime, DateTimeOf,
    };
    use tracerr::Traced;

    use crate::{
        domain::{
            contact,
            contract::{self, rental},
            customer, equipment, Customer, Equipment,
        },
        infra::{cache, database, Database},
        read::contract::rental::{HasOpen, Overdue, Overlap, Overlapping},
        task::{self, FinishExpiredRentals, Task as _},
        Config, Service,
    };

    use super::{
        change_rental_contract_status as change_status,
        create_rental_contract as create_rental,
        create_selling_contract as create_selling,
        delete_customer, delete_equipment,
        delete_rental_contract as delete_rental, restore_equipment,
        restore_rental_contract as restore_rental,
        restore_selling_contract as restore_selling,
        update_rental_contract as update_rental, ChangeRentalContractStatus,
        Command as _, CreateRentalContract, CreateSellingContract,
        DeleteCustomer, DeleteEquipment, DeleteRentalContract,
        DeleteSellingContract, RestoreEquipment, RestoreRentalContract,
        RestoreSellingContract, UpdateRentalContract,
    };

    #[derive(Debug, Default)]
    struct State {
        customers: HashMap<customer::Id, Customer>,
        equipment: HashMap<equipment::Id, Equipment>,
        rentals: HashMap<contract::Id, contract::Rental>,
        sellings: HashMap<contract::Id, contract::Selling>,

        /// Makes every versioned write lose to another transaction.
        concurrent_writes: bool,
    }

    /// In-memory [`Database`] applying writes immediately.
    #[derive(Clone, Debug, Default)]
    struct Store(Arc<Mutex<State>>);

    impl Store {
        fn state(&self) -> std::sync::MutexGuard<'_, State> {
            self.0.lock().unwrap()
        }
    }

    impl Database<Transact> for Store {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Commit> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Lock<By<Equipment, equipment::Id>>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<Equipment, equipment::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Lock<By<Customer, customer::Id>>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<Customer, customer::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl<'s> Database<Lock<By<Equipment, &'s equipment::SerialNumber>>>
        for Store
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<Equipment, &'s equipment::SerialNumber>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Lock<By<contract::Selling, contract::Id>>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<contract::Selling, contract::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Lock<By<contract::Rental, contract::Id>>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<contract::Rental, contract::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Select<By<Option<Customer>, customer::Id>>> for Store {
        type Ok = Option<Customer>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Customer>, customer::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.state().customers.get(by.inner()).cloned())
        }
    }

    impl Database<Select<By<Option<Equipment>, equipment::Id>>> for Store {
        type Ok = Option<Equipment>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Equipment>, equipment::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.state().equipment.get(by.inner()).cloned())
        }
    }

    impl<'s>
        Database<Select<By<Option<Equipment>, &'s equipment::SerialNumber>>>
        for Store
    {
        type Ok = Option<Equipment>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<
                By<Option<Equipment>, &'s equipment::SerialNumber>,
            >,
        ) -> Result<Self::Ok, Self::Err> {
            let serial_number = by.into_inner();
            Ok(self
                .state()
                .equipment
                .values()
                .find(|e| {
                    !e.is_deleted() && &e.serial_number == serial_number
                })
                .cloned())
        }
    }

    impl Database<Select<By<Option<contract::Selling>, contract::Id>>>
        for Store
    {
        type Ok = Option<contract::Selling>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<contract::Selling>, contract::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.state().sellings.get(by.inner()).cloned())
        }
    }

    impl Database<Select<By<HasOpen, equipment::Id>>> for Store {
        type Ok = HasOpen;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<HasOpen, equipment::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();
            Ok(HasOpen(self.state().rentals.values().any(|r| {
                r.equipment_id == id && !r.is_deleted() && r.status.is_open()
            })))
        }
    }

    impl Database<Select<By<HasOpen, customer::Id>>> for Store {
        type Ok = HasOpen;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<HasOpen, customer::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();
            Ok(HasOpen(self.state().rentals.values().any(|r| {
                r.customer_id == id && !r.is_deleted() && r.status.is_open()
            })))
        }
    }

    impl Database<Select<By<Option<contract::Rental>, contract::Id>>>
        for Store
    {
        type Ok = Option<contract::Rental>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<contract::Rental>, contract::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.state().rentals.get(by.inner()).cloned())
        }
    }

    impl Database<Select<By<Option<Overlapping>, Overlap>>> for Store {
        type Ok = Option<Overlapping>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Overlapping>, Overlap>>,
        ) -> Result<Self::Ok, Self::Err> {
            let Overlap {
                equipment_id,
                period,
                except,
            } = by.into_inner();
            Ok(self
                .state()
                .rentals
                .values()
                .find(|r| {
                    r.equipment_id == equipment_id
                        && !r.is_deleted()
                        && r.status.is_open()
                        && Some(r.id) != except
                        && r.period.overlaps(&period)
                })
                .map(|r| Overlapping(r.id)))
        }
    }

    impl Database<Select<By<Overdue, Date>>> for Store {
        type Ok = Overdue;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Overdue, Date>>,
        ) -> Result<Self::Ok, Self::Err> {
            let today = by.into_inner();
            Ok(Overdue(
                self.state()
                    .rentals
                    .values()
                    .filter(|r| {
                        r.status == rental::Status::Active
                            && !r.is_deleted()
                            && r.period.end() < today
                    })
                    .map(|r| r.id)
                    .collect(),
            ))
        }
    }

    impl Database<Insert<contract::Rental>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(contract): Insert<contract::Rental>,
        ) -> Result<Self::Ok, Self::Err> {
            _ = self.state().rentals.insert(contract.id, contract);
            Ok(())
        }
    }

    impl Database<Update<contract::Rental>> for Store {
        type Ok = Option<contract::Version>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(mut contract): Update<contract::Rental>,
        ) -> Result<Self::Ok, Self::Err> {
            let mut state = self.state();
            let stored = state
                .rentals
                .get(&contract.id)
                .filter(|r| r.version == contract.version);
            if stored.is_none() || state.concurrent_writes {
                return Ok(None);
            }
            contract.version = contract.version.next();
            let version = contract.version;
            _ = state.rentals.insert(contract.id, contract);
            Ok(Some(version))
        }
    }

    impl Database<Insert<contract::Selling>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(contract): Insert<contract::Selling>,
        ) -> Result<Self::Ok, Self::Err> {
            _ = self.state().sellings.insert(contract.id, contract);
            Ok(())
        }
    }

    impl Database<Update<contract::Selling>> for Store {
        type Ok = Option<contract::Version>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(mut contract): Update<contract::Selling>,
        ) -> Result<Self::Ok, Self::Err> {
            let mut state = self.state();
            let stored = state
                .sellings
                .get(&contract.id)
                .filter(|s| s.version == contract.version);
            if stored.is_none() || state.concurrent_writes {
                return Ok(None);
            }
            contract.version = contract.version.next();
            let version = contract.version;
            _ = state.sellings.insert(contract.id, contract);
            Ok(Some(version))
        }
    }

    impl Database<Update<Customer>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(customer): Update<Customer>,
        ) -> Result<Self::Ok, Self::Err> {
            _ = self.state().customers.insert(customer.id, customer);
            Ok(())
        }
    }

    impl Database<Update<Equipment>> for Store {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(equipment): Update<Equipment>,
        ) -> Result<Self::Ok, Self::Err> {
            _ = self.state().equipment.insert(equipment.id, equipment);
            Ok(())
        }
    }

    fn service() -> Service<Store> {
        Service {
            config: Config::default(),
            database: Store::default(),
            cache: cache::Memory::default(),
        }
    }

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn period(start: Date, end: Date) -> rental::Period {
        rental::Period::new(start, end).unwrap()
    }

    fn add_customer(svc: &Service<Store>) -> customer::Id {
        let customer = Customer {
            id: customer::Id::new(),
            name: contact::Name::new("Jane Roe").unwrap(),
            email: None,
            phone: None,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        let id = customer.id;
        _ = svc.database().state().customers.insert(id, customer);
        id
    }

    fn add_equipment(
        svc: &Service<Store>,
        status: equipment::Status,
    ) -> equipment::Id {
        let equipment = Equipment {
            id: equipment::Id::new(),
            name: equipment::Name::new("320D").unwrap(),
            serial_number: equipment::SerialNumber::new("CAT-0001").unwrap(),
            brand: equipment::Brand::Caterpillar,
            kind: equipment::Kind::Excavator,
            status,
            supplier_id: None,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        let id = equipment.id;
        _ = svc.database().state().equipment.insert(id, equipment);
        id
    }

    fn add_rental(
        svc: &Service<Store>,
        equipment_id: equipment::Id,
        period: rental::Period,
        status: rental::Status,
    ) -> contract::Id {
        let contract = contract::Rental {
            id: contract::Id::new(),
            equipment_id,
            customer_id: customer::Id::new(),
            period,
            shifts: rental::Shifts::new(2).unwrap(),
            shift_price: "100.00USD".parse().unwrap(),
            status,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
            version: contract::Version::INITIAL,
        };
        let id = contract.id;
        _ = svc.database().state().rentals.insert(id, contract);
        id
    }

    fn equipment_status(
        svc: &Service<Store>,
        id: equipment::Id,
    ) -> equipment::Status {
        svc.database().state().equipment[&id].status
    }

    fn upcoming() -> rental::Period {
        period(Date::today(), date(2100, 1, 1))
    }

    fn change(
        contract_id: contract::Id,
        transition: rental::Transition,
    ) -> ChangeRentalContractStatus {
        ChangeRentalContractStatus {
            contract_id,
            transition,
            expected_version: None,
        }
    }

    #[tokio::test]
    async fn activation_rents_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let contract = svc
            .execute(change(id, rental::Transition::Activate))
            .await
            .unwrap();

        assert_eq!(contract.status, rental::Status::Active);
        assert_eq!(contract.version, contract::Version::INITIAL.next());
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Rented);
    }

    #[tokio::test]
    async fn activation_requires_available_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Rented);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let err = svc
            .execute(change(id, rental::Transition::Activate))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            change_status::ExecutionError::EquipmentNotAvailable(
                equipment::Status::Rented,
            ),
        ));
        let stored = svc.database().state().rentals[&id].status;
        assert_eq!(stored, rental::Status::Draft);
    }

    #[tokio::test]
    async fn activation_rejects_ended_period() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let past = period(date(2001, 3, 1), date(2001, 3, 5));
        let id = add_rental(&svc, eq, past, rental::Status::Draft);

        let err = svc
            .execute(change(id, rental::Transition::Activate))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            change_status::ExecutionError::ContractExpired(_),
        ));
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Available);
    }

    #[tokio::test]
    async fn suspension_keeps_equipment_rented() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Rented);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Active);

        let contract = svc
            .execute(change(id, rental::Transition::Suspend))
            .await
            .unwrap();

        assert_eq!(contract.status, rental::Status::Suspended);
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Rented);
    }

    #[tokio::test]
    async fn finishing_releases_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Rented);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Active);

        let contract = svc
            .execute(change(id, rental::Transition::Finish))
            .await
            .unwrap();

        assert_eq!(contract.status, rental::Status::Finished);
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Available);
    }

    #[tokio::test]
    async fn cancelling_draft_leaves_equipment_untouched() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Rented);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let contract = svc
            .execute(change(id, rental::Transition::Cancel))
            .await
            .unwrap();

        assert_eq!(contract.status, rental::Status::Cancelled);
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Rented);
    }

    #[tokio::test]
    async fn rejects_invalid_transition() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Finished);

        let err = svc
            .execute(change(id, rental::Transition::Activate))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            change_status::ExecutionError::InvalidTransition(
                rental::InvalidTransition {
                    from: rental::Status::Finished,
                    transition: rental::Transition::Activate,
                },
            ),
        ));
        let version = svc.database().state().rentals[&id].version;
        assert_eq!(version, contract::Version::INITIAL);
    }

    #[tokio::test]
    async fn rejects_stale_version() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);
        let stale = contract::Version::INITIAL.next();

        let err = svc
            .execute(ChangeRentalContractStatus {
                expected_version: Some(stale),
                ..change(id, rental::Transition::Activate)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            change_status::ExecutionError::VersionMismatch { expected, actual }
                if *expected == stale && *actual == contract::Version::INITIAL,
        ));
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Available);
    }

    #[tokio::test]
    async fn rejects_deleted_contract() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);
        svc.database()
            .state()
            .rentals
            .get_mut(&id)
            .unwrap()
            .deleted_at = Some(DateTime::now().coerce());

        let err = svc
            .execute(change(id, rental::Transition::Activate))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            change_status::ExecutionError::ContractDeleted(_),
        ));
    }

    fn create(
        svc: &Service<Store>,
        equipment_id: equipment::Id,
        period: rental::Period,
    ) -> CreateRentalContract {
        CreateRentalContract {
            equipment_id,
            customer_id: add_customer(svc),
            period,
            shifts: rental::Shifts::new(3).unwrap(),
            shift_price: "80.00EUR".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn creates_draft_rental() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let cmd = create(&svc, eq, upcoming());

        let contract = svc.execute(cmd).await.unwrap();

        assert_eq!(contract.status, rental::Status::Draft);
        assert_eq!(contract.version, contract::Version::INITIAL);
        assert!(svc.database().state().rentals.contains_key(&contract.id));
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Available);
    }

    #[tokio::test]
    async fn rejects_overlapping_rental() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let existing = add_rental(
            &svc,
            eq,
            period(date(2099, 6, 1), date(2099, 6, 10)),
            rental::Status::Suspended,
        );
        let cmd = create(&svc, eq, period(date(2099, 6, 10), date(2099, 7, 1)));

        let err = svc.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_rental::ExecutionError::Overlaps(id) if *id == existing,
        ));
    }

    #[tokio::test]
    async fn ignores_closed_rentals_when_checking_overlap() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let within = period(date(2099, 6, 1), date(2099, 6, 10));
        _ = add_rental(&svc, eq, within, rental::Status::Cancelled);
        _ = add_rental(&svc, eq, within, rental::Status::Finished);
        let cmd = create(&svc, eq, within);

        assert!(svc.execute(cmd).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_rental_starting_in_past() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let cmd = create(&svc, eq, period(date(2001, 1, 1), date(2099, 1, 1)));

        let err = svc.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_rental::ExecutionError::StartDateInPast(_),
        ));
    }

    #[tokio::test]
    async fn rejects_rental_of_sold_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Sold);
        let cmd = create(&svc, eq, upcoming());

        let err = svc.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_rental::ExecutionError::EquipmentSold(id) if *id == eq,
        ));
    }

    #[tokio::test]
    async fn rejects_rental_for_unknown_customer() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let cmd = CreateRentalContract {
            customer_id: customer::Id::new(),
            ..create(&svc, eq, upcoming())
        };

        let err = svc.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_rental::ExecutionError::CustomerNotExists(_),
        ));
    }

    #[tokio::test]
    async fn finishes_only_expired_active_rentals() {
        let svc = service();
        let ended = period(date(2020, 1, 1), date(2020, 1, 10));
        let expired_eq = add_equipment(&svc, equipment::Status::Rented);
        let expired =
            add_rental(&svc, expired_eq, ended, rental::Status::Active);
        let suspended_eq = add_equipment(&svc, equipment::Status::Rented);
        let suspended =
            add_rental(&svc, suspended_eq, ended, rental::Status::Suspended);
        let running_eq = add_equipment(&svc, equipment::Status::Rented);
        let running =
            add_rental(&svc, running_eq, upcoming(), rental::Status::Active);

        let finished = FinishExpiredRentals::new(
            svc.clone(),
            task::finish_expired_rentals::Config::default(),
        )
        .execute(Perform(()))
        .await
        .unwrap();

        assert_eq!(finished, 1);
        let state = svc.database().state();
        assert_eq!(state.rentals[&expired].status, rental::Status::Finished);
        assert_eq!(
            state.rentals[&suspended].status,
            rental::Status::Suspended,
        );
        assert_eq!(state.rentals[&running].status, rental::Status::Active);
        assert_eq!(
            state.equipment[&expired_eq].status,
            equipment::Status::Available,
        );
        assert_eq!(
            state.equipment[&running_eq].status,
            equipment::Status::Rented,
        );
    }

    const HUGE_PRICE: &str = "79228162514264337593543950335USD";

    fn deleted_now<Of: ?Sized>() -> Option<DateTimeOf<Of>> {
        Some(DateTime::now().coerce())
    }

    fn rental_of(svc: &Service<Store>, id: contract::Id) -> contract::Rental {
        svc.database().state().rentals[&id].clone()
    }

    fn selling_of(
        svc: &Service<Store>,
        id: contract::Id,
    ) -> contract::Selling {
        svc.database().state().sellings[&id].clone()
    }

    fn add_selling(
        svc: &Service<Store>,
        equipment_id: equipment::Id,
    ) -> contract::Id {
        let contract = contract::Selling {
            id: contract::Id::new(),
            equipment_id,
            customer_id: customer::Id::new(),
            sale_price: "25000.00USD".parse().unwrap(),
            sale_date: Date::today(),
            created_at: DateTime::now().coerce(),
            deleted_at: None,
            version: contract::Version::INITIAL,
        };
        let id = contract.id;
        _ = svc.database().state().sellings.insert(id, contract);
        id
    }

    fn update(contract_id: contract::Id) -> UpdateRentalContract {
        UpdateRentalContract {
            contract_id,
            expected_version: None,
            period: None,
            shifts: None,
            shift_price: None,
        }
    }

    fn sell(
        svc: &Service<Store>,
        equipment_id: equipment::Id,
    ) -> CreateSellingContract {
        CreateSellingContract {
            equipment_id,
            customer_id: add_customer(svc),
            sale_price: "25000.00USD".parse().unwrap(),
            sale_date: None,
        }
    }

    #[tokio::test]
    async fn rejects_rental_with_overflowing_total_price() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let cmd = CreateRentalContract {
            shift_price: HUGE_PRICE.parse().unwrap(),
            ..create(&svc, eq, upcoming())
        };

        let err = svc.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_rental::ExecutionError::PriceTooLarge(_),
        ));
        assert!(svc.database().state().rentals.is_empty());
    }

    #[tokio::test]
    async fn updates_draft_rental_overlapping_only_itself() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);
        let extended = period(Date::today(), date(2100, 6, 1));

        let contract = svc
            .execute(UpdateRentalContract {
                period: Some(extended),
                shifts: rental::Shifts::new(5),
                ..update(id)
            })
            .await
            .unwrap();

        assert_eq!(contract.period, extended);
        assert_eq!(contract.shifts.get(), 5);
        assert_eq!(contract.version, contract::Version::INITIAL.next());
        assert_eq!(rental_of(&svc, id).period, extended);
    }

    #[tokio::test]
    async fn rejects_update_overlapping_another_rental() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);
        let later = period(date(2200, 1, 1), date(2200, 1, 31));
        let other = add_rental(&svc, eq, later, rental::Status::Draft);

        let err = svc
            .execute(UpdateRentalContract {
                period: Some(period(Date::today(), date(2200, 1, 5))),
                ..update(id)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            update_rental::ExecutionError::Overlaps(o) if *o == other,
        ));
        assert_eq!(rental_of(&svc, id).period, upcoming());
    }

    #[tokio::test]
    async fn rejects_updating_active_rental() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Rented);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Active);

        let err = svc
            .execute(UpdateRentalContract {
                shift_price: Some("90.00USD".parse().unwrap()),
                ..update(id)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            update_rental::ExecutionError::ContractNotDraft(
                rental::Status::Active,
            ),
        ));
    }

    #[tokio::test]
    async fn rejects_update_with_overflowing_total_price() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let err = svc
            .execute(UpdateRentalContract {
                shift_price: Some(HUGE_PRICE.parse().unwrap()),
                ..update(id)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            update_rental::ExecutionError::PriceTooLarge(_),
        ));
        assert_eq!(rental_of(&svc, id).version, contract::Version::INITIAL);
    }

    #[tokio::test]
    async fn rejects_deleting_rental_holding_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Rented);

        for status in [rental::Status::Active, rental::Status::Suspended] {
            let id = add_rental(&svc, eq, upcoming(), status);

            let err = svc
                .execute(DeleteRentalContract {
                    contract_id: id,
                    expected_version: None,
                })
                .await
                .unwrap_err();

            assert!(matches!(
                err.as_ref(),
                delete_rental::ExecutionError::ContractInProgress(s)
                    if *s == status,
            ));
            assert!(!rental_of(&svc, id).is_deleted());
        }
    }

    #[tokio::test]
    async fn deletes_finished_rental() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Finished);

        let contract = svc
            .execute(DeleteRentalContract {
                contract_id: id,
                expected_version: Some(contract::Version::INITIAL),
            })
            .await
            .unwrap();

        assert!(contract.is_deleted());
        assert_eq!(contract.version, contract::Version::INITIAL.next());
        assert!(rental_of(&svc, id).is_deleted());
    }

    #[tokio::test]
    async fn rejects_restoring_overlapping_rental() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);
        svc.database().state().rentals.get_mut(&id).unwrap().deleted_at =
            deleted_now();
        let other = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let err = svc
            .execute(RestoreRentalContract { contract_id: id })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            restore_rental::ExecutionError::Overlaps(o) if *o == other,
        ));
        assert!(rental_of(&svc, id).is_deleted());
    }

    #[tokio::test]
    async fn rejects_restoring_rental_of_sold_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Sold);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);
        svc.database().state().rentals.get_mut(&id).unwrap().deleted_at =
            deleted_now();

        let err = svc
            .execute(RestoreRentalContract { contract_id: id })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            restore_rental::ExecutionError::EquipmentSold(e) if *e == eq,
        ));
    }

    #[tokio::test]
    async fn restores_closed_rental_despite_overlap() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Cancelled);
        svc.database().state().rentals.get_mut(&id).unwrap().deleted_at =
            deleted_now();
        _ = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let contract = svc
            .execute(RestoreRentalContract { contract_id: id })
            .await
            .unwrap();

        assert!(!contract.is_deleted());
        assert!(!rental_of(&svc, id).is_deleted());
    }

    #[tokio::test]
    async fn selling_marks_equipment_sold() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);

        let contract = svc.execute(sell(&svc, eq)).await.unwrap();

        assert_eq!(contract.sale_date, Date::today());
        assert_eq!(contract.version, contract::Version::INITIAL);
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Sold);
        assert!(svc.database().state().sellings.contains_key(&contract.id));
    }

    #[tokio::test]
    async fn rejects_selling_equipment_with_open_rentals() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        _ = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let err = svc.execute(sell(&svc, eq)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_selling::ExecutionError::EquipmentRentalsOpen(e)
                if *e == eq,
        ));
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Available);
    }

    #[tokio::test]
    async fn rejects_selling_to_deleted_customer() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let cmd = sell(&svc, eq);
        svc.database()
            .state()
            .customers
            .get_mut(&cmd.customer_id)
            .unwrap()
            .deleted_at = deleted_now();

        let err = svc.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_selling::ExecutionError::CustomerNotExists(c)
                if *c == cmd.customer_id,
        ));
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Available);
    }

    #[tokio::test]
    async fn deleting_selling_releases_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Sold);
        let id = add_selling(&svc, eq);

        let contract = svc
            .execute(DeleteSellingContract {
                contract_id: id,
                expected_version: Some(contract::Version::INITIAL),
            })
            .await
            .unwrap();

        assert!(contract.is_deleted());
        assert_eq!(contract.version, contract::Version::INITIAL.next());
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Available);
    }

    #[tokio::test]
    async fn restoring_selling_requires_available_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Rented);
        let id = add_selling(&svc, eq);
        svc.database().state().sellings.get_mut(&id).unwrap().deleted_at =
            deleted_now();

        let err = svc
            .execute(RestoreSellingContract { contract_id: id })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            restore_selling::ExecutionError::EquipmentNotAvailable(
                equipment::Status::Rented,
            ),
        ));
        assert!(selling_of(&svc, id).is_deleted());
    }

    #[tokio::test]
    async fn restoring_selling_rejects_open_rentals() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_selling(&svc, eq);
        svc.database().state().sellings.get_mut(&id).unwrap().deleted_at =
            deleted_now();
        _ = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let err = svc
            .execute(RestoreSellingContract { contract_id: id })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            restore_selling::ExecutionError::EquipmentRentalsOpen(e)
                if *e == eq,
        ));
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Available);
    }

    #[tokio::test]
    async fn restoring_selling_marks_equipment_sold() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_selling(&svc, eq);
        svc.database().state().sellings.get_mut(&id).unwrap().deleted_at =
            deleted_now();

        let contract = svc
            .execute(RestoreSellingContract { contract_id: id })
            .await
            .unwrap();

        assert!(!contract.is_deleted());
        assert_eq!(equipment_status(&svc, eq), equipment::Status::Sold);
    }

    #[tokio::test]
    async fn rejects_deleting_customer_with_open_rentals() {
        let svc = service();
        let customer = add_customer(&svc);
        let eq = add_equipment(&svc, equipment::Status::Rented);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Active);
        svc.database().state().rentals.get_mut(&id).unwrap().customer_id =
            customer;

        let err = svc
            .execute(DeleteCustomer {
                customer_id: customer,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            delete_customer::ExecutionError::CustomerRentalsOpen(c)
                if *c == customer,
        ));

        svc.database().state().rentals.get_mut(&id).unwrap().status =
            rental::Status::Finished;
        let deleted = svc
            .execute(DeleteCustomer {
                customer_id: customer,
            })
            .await
            .unwrap();

        assert!(deleted.is_deleted());
    }

    #[tokio::test]
    async fn rejects_deleting_rented_equipment() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Rented);

        let err = svc
            .execute(DeleteEquipment { equipment_id: eq })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            delete_equipment::ExecutionError::EquipmentRented(e) if *e == eq,
        ));
    }

    #[tokio::test]
    async fn rejects_deleting_equipment_with_open_rentals() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        _ = add_rental(&svc, eq, upcoming(), rental::Status::Draft);

        let err = svc
            .execute(DeleteEquipment { equipment_id: eq })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            delete_equipment::ExecutionError::EquipmentRentalsOpen(e)
                if *e == eq,
        ));
        assert!(!svc.database().state().equipment[&eq].is_deleted());
    }

    #[tokio::test]
    async fn rejects_restoring_equipment_with_occupied_serial_number() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        svc.database().state().equipment.get_mut(&eq).unwrap().deleted_at =
            deleted_now();
        _ = add_equipment(&svc, equipment::Status::Available);

        let err = svc
            .execute(RestoreEquipment { equipment_id: eq })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            restore_equipment::ExecutionError::SerialNumberOccupied(n)
                if n.to_string() == "CAT-0001",
        ));
        assert!(svc.database().state().equipment[&eq].is_deleted());
    }

    #[tokio::test]
    async fn restores_equipment_with_free_serial_number() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        svc.database().state().equipment.get_mut(&eq).unwrap().deleted_at =
            deleted_now();

        let equipment = svc
            .execute(RestoreEquipment { equipment_id: eq })
            .await
            .unwrap();

        assert!(!equipment.is_deleted());
    }

    #[tokio::test]
    async fn reports_concurrent_modification() {
        let svc = service();
        let eq = add_equipment(&svc, equipment::Status::Available);
        let id = add_rental(&svc, eq, upcoming(), rental::Status::Draft);
        svc.database().state().concurrent_writes = true;

        let err = svc
            .execute(DeleteRentalContract {
                contract_id: id,
                expected_version: Some(contract::Version::INITIAL),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            delete_rental::ExecutionError::ConcurrentModification(c)
                if *c == id,
        ));

        let err = svc
            .execute(change(id, rental::Transition::Cancel))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            change_status::ExecutionError::ConcurrentModification(c)
                if *c == id,
        ));
        assert!(!rental_of(&svc, id).is_deleted());
    }
}
