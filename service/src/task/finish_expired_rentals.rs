//! [`FinishExpiredRentals`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Perform, Select, Start},
    Date,
};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{
        change_rental_contract_status, ChangeRentalContractStatus, Command,
    },
    domain::contract::{self, rental},
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`FinishExpiredRentals`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between expired [`contract::Rental`]s lookups.
    #[default(time::Duration::from_secs(60 * 60))]
    pub interval: time::Duration,
}

/// [`Task`] finishing [`rental::Status::Active`] [`contract::Rental`]s whose
/// [`rental::Period`] has ended.
///
/// [`rental::Status::Suspended`] ones are left for manual handling.
#[derive(Clone, Copy, Debug)]
pub struct FinishExpiredRentals<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<S> FinishExpiredRentals<S> {
    /// Creates a new [`FinishExpiredRentals`] [`Task`] over the provided
    /// `service`.
    #[must_use]
    pub const fn new(service: S, config: Config) -> Self {
        Self { config, service }
    }
}

impl<Db, Ch> Task<Start<By<FinishExpiredRentals<Self>, Config>>>
    for Service<Db, Ch>
where
    FinishExpiredRentals<Service<Db, Ch>>:
        Task<Perform<()>, Ok = usize, Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<FinishExpiredRentals<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = FinishExpiredRentals::new(self.clone(), by.into_inner());

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => {
                    log::info!("`task::FinishExpiredRentals` finished {n}");
                }
                Err(e) => {
                    log::error!("`task::FinishExpiredRentals` failed: {e}");
                }
            }
        }
    }
}

impl<Db, Ch> Task<Perform<()>> for FinishExpiredRentals<Service<Db, Ch>>
where
    Db: Database<
        Select<By<read::contract::rental::Overdue, Date>>,
        Ok = read::contract::rental::Overdue,
        Err = Traced<database::Error>,
    >,
    Service<Db, Ch>: Command<
        ChangeRentalContractStatus,
        Ok = contract::Rental,
        Err = Traced<change_rental_contract_status::ExecutionError>,
    >,
{
    /// Number of [`contract::Rental`]s finished.
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let read::contract::rental::Overdue(overdue) = self
            .service
            .database()
            .execute(Select(By::<read::contract::rental::Overdue, _>::new(
                Date::today(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        let mut finished = 0;
        for contract_id in overdue {
            let cmd = ChangeRentalContractStatus {
                contract_id,
                transition: rental::Transition::Finish,
                expected_version: None,
            };
            match self.service.execute(cmd).await {
                Ok(_) => finished += 1,
                Err(e) => log::warn!(
                    "failed to finish expired `contract::Rental(id: \
                     {contract_id})`: {e}",
                ),
            }
        }
        Ok(finished)
    }
}

/// Error of [`FinishExpiredRentals`] execution.
pub type ExecutionError = Traced<database::Error>;
