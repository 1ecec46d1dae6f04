//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::error::Error;

use common::operations::{By, Increment, Start};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use infra::Database;
use infra::{cache, Cache};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// [`task::FinishExpiredRentals`] configuration.
    pub finish_expired_rentals: task::finish_expired_rentals::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Ch = cache::Memory> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Cache`] of this [`Service`].
    cache: Ch,
}

impl<Db, Ch> Service<Db, Ch> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        cache: Ch,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::FinishExpiredRentals<Self>,
                        task::finish_expired_rentals::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            cache,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().finish_expired_rentals)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Cache`] of this [`Service`].
    #[must_use]
    pub fn cache(&self) -> &Ch {
        &self.cache
    }
}

impl<Db, Ch> Service<Db, Ch>
where
    Ch: Cache<
        Increment<cache::Scope>,
        Ok = cache::Version,
        Err = Traced<cache::Error>,
    >,
{
    /// Invalidates all the values cached in the provided [`cache::Scope`]s.
    ///
    /// Failures are only logged, as the written data is committed already.
    async fn invalidate(&self, scopes: &[cache::Scope]) {
        for &scope in scopes {
            match self.cache.execute(Increment(scope)).await {
                Ok(v) => log::debug!("`{scope}` cache scope bumped to v{v}"),
                Err(e) => {
                    log::error!("failed to invalidate `{scope}` cache: {e}");
                }
            }
        }
    }
}
