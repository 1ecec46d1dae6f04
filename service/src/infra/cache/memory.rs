//! In-process [`Cache`] implementation.

use std::{sync::Arc, time::Duration};

use common::operations::{By, Increment, Insert, Select};
use dashmap::DashMap;
use smart_default::SmartDefault;
use tokio::time::Instant;
use tracerr::Traced;
use tracing as log;

use super::{Cache, Encoded, Error, Key, Scope, Version};

/// [`Memory`] cache configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Time a cached value lives for.
    #[default(Duration::from_secs(300))]
    pub ttl: Duration,

    /// Maximum number of cached values.
    #[default(10_000)]
    pub capacity: usize,
}

/// In-process [`Cache`] shared between clones.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Inner>);

/// Inner state of a [`Memory`] cache.
#[derive(Debug, Default)]
struct Inner {
    /// [`Config`] of the cache.
    config: Config,

    /// Current [`Version`]s of [`Scope`]s.
    versions: DashMap<Scope, Version>,

    /// Cached values.
    entries: DashMap<Key, Entry>,
}

/// Cached value along with its expiration.
#[derive(Debug)]
struct Entry {
    /// [`Encoded`] value.
    value: Encoded,

    /// [`Instant`] this [`Entry`] expires at.
    expires_at: Instant,
}

impl Memory {
    /// Creates a new empty [`Memory`] cache with the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self(Arc::new(Inner {
            config,
            versions: DashMap::new(),
            entries: DashMap::new(),
        }))
    }

    /// Returns number of values currently held, including expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.entries.len()
    }

    /// Indicates whether no values are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.entries.is_empty()
    }

    /// Makes room for a new value, if the capacity is reached.
    ///
    /// Expired values go first. If that's not enough, everything is dropped.
    fn make_room(&self) {
        let Inner {
            config, entries, ..
        } = &*self.0;
        if entries.len() < config.capacity {
            return;
        }

        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);
        if entries.len() >= config.capacity {
            log::debug!(
                "`cache::Memory` is full with {} live values, clearing",
                entries.len(),
            );
            entries.clear();
        }
    }
}

impl Cache<Select<By<Version, Scope>>> for Memory {
    type Ok = Version;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Version, Scope>>,
    ) -> Result<Self::Ok, Self::Err> {
        let scope = by.into_inner();
        Ok(self.0.versions.get(&scope).map(|v| *v).unwrap_or_default())
    }
}

impl Cache<Increment<Scope>> for Memory {
    type Ok = Version;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Increment(scope): Increment<Scope>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut version = self.0.versions.entry(scope).or_default();
        *version = version.next();
        Ok(*version)
    }
}

impl Cache<Select<By<Option<Encoded>, Key>>> for Memory {
    type Ok = Option<Encoded>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Encoded>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        let now = Instant::now();

        // The `Ref` must be released before removing, otherwise the shard
        // deadlocks.
        let hit = self
            .0
            .entries
            .get(&key)
            .map(|e| (e.expires_at > now).then(|| e.value.clone()));
        match hit {
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => {
                _ = self.0.entries.remove_if(&key, |_, e| e.expires_at <= now);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

impl Cache<Insert<(Key, Encoded)>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert((key, value)): Insert<(Key, Encoded)>,
    ) -> Result<Self::Ok, Self::Err> {
        self.make_room();
        let expires_at = Instant::now() + self.0.config.ttl;
        _ = self.0.entries.insert(key, Entry { value, expires_at });
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{By, Increment, Insert, Select};

    use crate::infra::cache::{Cache as _, Encoded, Key, Scope, Version};

    use super::{Config, Memory};

    fn memory(ttl: u64, capacity: usize) -> Memory {
        Memory::new(Config {
            ttl: Duration::from_secs(ttl),
            capacity,
        })
    }

    fn key(n: u32) -> Key {
        Key::new(Scope::EQUIPMENT, Version::default(), "test", &n)
    }

    async fn get(cache: &Memory, key: Key) -> Option<Encoded> {
        cache.execute(Select(By::new(key))).await.unwrap()
    }

    async fn put(cache: &Memory, key: Key, value: &str) {
        let value = Encoded::encode(value).unwrap();
        cache.execute(Insert((key, value))).await.unwrap();
    }

    #[tokio::test]
    async fn versions_start_at_default_and_increase() {
        let cache = memory(60, 10);

        let initial = cache
            .execute(Select(By::<Version, _>::new(Scope::CUSTOMERS)))
            .await
            .unwrap();
        assert_eq!(initial, Version::default());

        let first = cache.execute(Increment(Scope::CUSTOMERS)).await.unwrap();
        let second = cache.execute(Increment(Scope::CUSTOMERS)).await.unwrap();
        assert_eq!(first, initial.next());
        assert_eq!(second, first.next());

        let current = cache
            .execute(Select(By::<Version, _>::new(Scope::CUSTOMERS)))
            .await
            .unwrap();
        assert_eq!(current, second);
    }

    #[tokio::test]
    async fn scopes_are_independent() {
        let cache = memory(60, 10);

        _ = cache.execute(Increment(Scope::EQUIPMENT)).await.unwrap();

        let other = cache
            .execute(Select(By::<Version, _>::new(Scope::SUPPLIERS)))
            .await
            .unwrap();
        assert_eq!(other, Version::default());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let cache = memory(60, 10);
        let clone = cache.clone();

        put(&cache, key(1), "shared").await;

        let hit = get(&clone, key(1)).await.unwrap();
        assert_eq!(hit.decode::<String>().unwrap(), "shared");
    }

    #[tokio::test(start_paused = true)]
    async fn values_expire_after_ttl() {
        let cache = memory(10, 10);
        put(&cache, key(1), "value").await;

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(get(&cache, key(1)).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(get(&cache, key(1)).await.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_drops_expired_values_first() {
        let cache = memory(10, 2);
        put(&cache, key(1), "old").await;

        tokio::time::advance(Duration::from_secs(11)).await;
        put(&cache, key(2), "fresh").await;
        put(&cache, key(3), "newest").await;

        assert_eq!(cache.len(), 2);
        assert!(get(&cache, key(2)).await.is_some());
        assert!(get(&cache, key(3)).await.is_some());
    }

    #[tokio::test]
    async fn full_cache_of_live_values_is_cleared() {
        let cache = memory(60, 2);
        put(&cache, key(1), "a").await;
        put(&cache, key(2), "b").await;

        put(&cache, key(3), "c").await;

        assert_eq!(cache.len(), 1);
        assert!(get(&cache, key(1)).await.is_none());
        assert!(get(&cache, key(3)).await.is_some());
    }
}
