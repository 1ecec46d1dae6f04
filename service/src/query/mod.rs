//! [`Query`] definition.

pub mod customer;
pub mod customers;
pub mod equipment;
pub mod rental_contract;
pub mod rental_contracts;
pub mod selling_contract;
pub mod selling_contracts;
pub mod supplier;
pub mod suppliers;

use std::hash::Hash;

use common::operations::{By, Insert, Select};
use serde::{de::DeserializeOwned, Serialize};
use tracerr::Traced;
use tracing as log;

use crate::{
    infra::{
        cache::{self, Encoded, Key, Scope},
        database, Cache, Database,
    },
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// Description of how the results of a [`CachedQuery`] are cached.
pub trait Cacheable {
    /// [`Scope`] the cached results belong to.
    const SCOPE: Scope;

    /// Name distinguishing the results of different queries in the same
    /// [`Scope`].
    const NAME: &'static str;
}

/// [`Query`] [`Select`]ing a `T`ype from a [`Database`] through a [`Cache`].
///
/// [`Cache`] failures never fail the [`Query`]: they are logged and the
/// [`Database`] is asked directly.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct CachedQuery<T>(T);

impl<W, B> CachedQuery<By<W, B>> {
    /// Creates a new [`CachedQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, Ch, W, B> Query<CachedQuery<By<W, B>>> for Service<Db, Ch>
where
    By<W, B>: Cacheable,
    B: Hash,
    W: Serialize + DeserializeOwned,
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
    Ch: Cache<
            Select<By<cache::Version, Scope>>,
            Ok = cache::Version,
            Err = Traced<cache::Error>,
        > + Cache<
            Select<By<Option<Encoded>, Key>>,
            Ok = Option<Encoded>,
            Err = Traced<cache::Error>,
        > + Cache<Insert<(Key, Encoded)>, Ok = (), Err = Traced<cache::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        CachedQuery(by): CachedQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        let scope = <By<W, B> as Cacheable>::SCOPE;
        let name = <By<W, B> as Cacheable>::NAME;

        // Version is read before the `Database`, so a concurrent write makes
        // the value below land under an already orphaned `Key`.
        let key = self
            .cache()
            .execute(Select(By::<cache::Version, _>::new(scope)))
            .await
            .map_err(|e| {
                log::warn!("failed to read `{scope}` cache version: {e}");
            })
            .ok()
            .map(|version| Key::new(scope, version, name, by.inner()));

        if let Some(key) = &key {
            let hit = self
                .cache()
                .execute(Select(By::<Option<Encoded>, _>::new(key.clone())))
                .await
                .map_err(|e| log::warn!("failed to read `{key}` cache: {e}"))
                .ok()
                .flatten();
            if let Some(encoded) = hit {
                match encoded.decode() {
                    Ok(value) => return Ok(value),
                    Err(e) => log::warn!("failed to decode `{key}` cache: {e}"),
                }
            }
        }

        let value = self
            .database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())?;

        if let Some(key) = key {
            match Encoded::encode(&value) {
                Ok(encoded) => {
                    _ = self
                        .cache()
                        .execute(Insert((key, encoded)))
                        .await
                        .map_err(|e| log::warn!("failed to fill cache: {e}"));
                }
                Err(e) => log::warn!("failed to encode `{key}` cache: {e}"),
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod spec {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use common::operations::{By, Increment, Select};
    use tracerr::Traced;

    use crate::{
        infra::{cache, database, Cache as _, Database},
        Config, Service,
    };

    use super::{Cacheable, CachedQuery, Query as _};

    /// [`Database`] counting how many times it was asked.
    #[derive(Clone, Debug, Default)]
    struct Counting(Arc<AtomicUsize>);

    impl Database<Select<By<u32, u8>>> for Counting {
        type Ok = u32;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<u32, u8>>,
        ) -> Result<Self::Ok, Self::Err> {
            _ = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(u32::from(by.into_inner()) * 10)
        }
    }

    impl Cacheable for By<u32, u8> {
        const SCOPE: cache::Scope = cache::Scope::EQUIPMENT;
        const NAME: &'static str = "times_ten";
    }

    type TimesTen = CachedQuery<By<u32, u8>>;

    fn service() -> Service<Counting> {
        Service {
            config: Config::default(),
            database: Counting::default(),
            cache: cache::Memory::default(),
        }
    }

    fn asked(svc: &Service<Counting>) -> usize {
        svc.database().0.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn serves_repeated_queries_from_cache() {
        let svc = service();

        let first = svc.execute(TimesTen::by(4)).await.unwrap();
        let second = svc.execute(TimesTen::by(4)).await.unwrap();

        assert_eq!(first, 40);
        assert_eq!(second, 40);
        assert_eq!(asked(&svc), 1);
    }

    #[tokio::test]
    async fn distinguishes_arguments() {
        let svc = service();

        _ = svc.execute(TimesTen::by(1)).await.unwrap();
        let other = svc.execute(TimesTen::by(2)).await.unwrap();

        assert_eq!(other, 20);
        assert_eq!(asked(&svc), 2);
    }

    #[tokio::test]
    async fn version_bump_bypasses_stale_values() {
        let svc = service();

        _ = svc.execute(TimesTen::by(3)).await.unwrap();
        _ = svc
            .cache()
            .execute(Increment(cache::Scope::EQUIPMENT))
            .await
            .unwrap();
        _ = svc.execute(TimesTen::by(3)).await.unwrap();

        assert_eq!(asked(&svc), 2);
    }

    #[tokio::test]
    async fn other_scopes_keep_cached_values() {
        let svc = service();

        _ = svc.execute(TimesTen::by(3)).await.unwrap();
        _ = svc
            .cache()
            .execute(Increment(cache::Scope::CUSTOMERS))
            .await
            .unwrap();
        _ = svc.execute(TimesTen::by(3)).await.unwrap();

        assert_eq!(asked(&svc), 1);
    }
}
