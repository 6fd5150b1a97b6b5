use std::{
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};

use fxhash::FxHashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::{
    directions::DirectionsProvider,
    geo_point::GeoPoint,
    profile::{Profile, ProviderKind},
    route::{RouteQuery, RouteResult},
};

pub const ROUTE_TTL: Duration = Duration::from_secs(5 * 60);
pub const GEOCODE_TTL: Duration = Duration::from_secs(60 * 60);

/// Process-wide memo with a fixed time-to-live per entry.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<FxHashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();

        if let Some((inserted_at, value)) = entries.get(key) {
            if inserted_at.elapsed() < self.ttl {
                return Some(value.clone());
            }

            entries.remove(key);
        }

        None
    }

    /// Also drops every expired entry, so keys never looked up again do not
    /// pile up.
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        entries.retain(|_, (inserted_at, _)| inserted_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exact identity of a route request: provider, profile and the bit pattern of
/// every point in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteCacheKey {
    provider: ProviderKind,
    profile: Profile,
    points: Vec<(u64, u64)>,
}

impl RouteCacheKey {
    pub fn new(provider: ProviderKind, query: &RouteQuery) -> Self {
        Self {
            provider,
            profile: query.profile(),
            points: query.points().iter().map(GeoPoint::to_bits).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeocodeCacheKey {
    query: String,
    proximity: Option<(u64, u64)>,
}

impl GeocodeCacheKey {
    pub fn new(query: &str, proximity: Option<GeoPoint>) -> Self {
        Self {
            query: query.trim().to_string(),
            proximity: proximity.as_ref().map(GeoPoint::to_bits),
        }
    }
}

pub type RouteCache = Arc<TtlCache<RouteCacheKey, RouteResult>>;
pub type GeocodeCache = Arc<TtlCache<GeocodeCacheKey, Option<GeoPoint>>>;

/// Every cache of the process, clearable in one go.
#[derive(Clone)]
pub struct Caches {
    pub routes: RouteCache,
    pub geocodes: GeocodeCache,
}

impl Caches {
    pub fn new(route_ttl: Duration, geocode_ttl: Duration) -> Self {
        Self {
            routes: Arc::new(TtlCache::new(route_ttl)),
            geocodes: Arc::new(TtlCache::new(geocode_ttl)),
        }
    }

    pub fn clear(&self) {
        self.routes.clear();
        self.geocodes.clear();
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new(ROUTE_TTL, GEOCODE_TTL)
    }
}

/// Serves repeated queries for one provider from a shared [`RouteCache`].
pub struct CachedProvider<P> {
    inner: P,
    cache: RouteCache,
}

impl<P: DirectionsProvider> CachedProvider<P> {
    pub fn new(inner: P, cache: RouteCache) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: DirectionsProvider> DirectionsProvider for CachedProvider<P> {
    fn kind(&self) -> ProviderKind {
        self.inner.kind()
    }

    async fn fetch(&self, query: &RouteQuery) -> RouteResult {
        let key = RouteCacheKey::new(self.kind(), query);

        if let Some(result) = self.cache.get(&key) {
            debug!("{}: cache hit for {} route", self.kind(), query.profile());
            return result;
        }

        let result = self.inner.fetch(query).await;

        let cacheable = match &result {
            Ok(_) => true,
            Err(error) => error.is_cacheable(),
        };

        if cacheable {
            self.cache.insert(key, result.clone());
        }

        result
    }
}
