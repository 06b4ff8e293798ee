//! Persistent cache for upstream feed responses.
//!
//! Air-quality, satellite and climate lookups are keyed on rounded
//! coordinates plus the IST date, so repeat queries around the same place
//! hit disk instead of the Open-Meteo APIs. Entries are postcard-encoded
//! into a fjall keyspace and carry their own expiry timestamp; expired
//! entries are evicted on read. TTLs get a ±10% jitter so a burst of
//! lookups stored together doesn't expire in the same instant.

use std::fmt::Debug;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};
use fjall::Keyspace;
use rand::RngExt;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::OnceCell;
use tokio::task;

static GLOBAL_CACHE: OnceCell<ResponseCache> = OnceCell::const_new();

/// Relative spread applied to every stored TTL.
const TTL_JITTER: std::ops::Range<f32> = 0.9..1.1;

#[derive(Serialize, Deserialize)]
struct CachedResponse<T> {
    value: T,
    fresh_until: u64, // Unix timestamp (seconds)
}

pub struct ResponseCache {
    responses: Keyspace,
}

impl ResponseCache {
    fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let responses = db.keyspace("responses", fjall::KeyspaceCreateOptions::default)?;
        Ok(ResponseCache { responses })
    }

    /// Looks up `key`, falling back to `fetch` on a miss and storing the
    /// fetched value with a jittered `ttl`.
    pub async fn remember<T, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Debug + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(fresh) = self.get::<T>(key).await? {
            return Ok(fresh);
        }

        let value = fetch().await?;
        let jitter: f32 = rand::rng().random_range(TTL_JITTER);
        self.put(key, value.clone(), ttl.mul_f32(jitter)).await?;
        Ok(value)
    }

    /// Stores a serializable value with an exact time-to-live.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<()> {
        let fresh_until = SystemTime::now()
            .checked_add(ttl)
            .ok_or(anyhow!("TTL overflow"))?
            .duration_since(UNIX_EPOCH)?
            .as_secs();
        let bytes = postcard::to_stdvec(&CachedResponse { value, fresh_until })?;
        let key = key.as_bytes().to_vec();
        let responses = self.responses.clone();

        let _ = task::spawn_blocking(move || responses.insert(key, bytes)).await?;
        Ok(())
    }

    /// Retrieves a value if it exists and is still fresh. Misses and expired
    /// entries both come back as `None`.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let responses = self.responses.clone();
        let key_bytes = key.as_bytes().to_vec();

        let stored: Option<Vec<u8>> = task::spawn_blocking(move || -> Result<_> {
            Ok(responses.get(key_bytes)?.map(|slice| slice.to_vec()))
        })
        .await??;

        let Some(bytes) = stored else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: CachedResponse<T> = postcard::from_bytes(&bytes)?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        if now < entry.fresh_until {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired, evicting");
            self.remove(key).await?;
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let responses = self.responses.clone();
        let _ = task::spawn_blocking(move || responses.remove(key)).await?;
        Ok(())
    }
}

/// Opens the process-wide cache. **Must be called once before any feed fetch.**
pub fn init(path: impl AsRef<Path>) -> Result<()> {
    let cache = ResponseCache::open(path)?;
    GLOBAL_CACHE
        .set(cache)
        .map_err(|_| anyhow!("Cache already initialized"))?;
    Ok(())
}

/// Returns a reference to the globally initialized cache.
/// # Panics
/// Panics if the cache has not been initialized by calling `cache::init()` first.
fn global() -> &'static ResponseCache {
    GLOBAL_CACHE
        .get()
        .expect("Cache not initialized. Call cache::init() first.")
}

/// [`ResponseCache::remember`] against the global cache. This is the entry
/// point the feed clients use.
pub async fn remember<T, F, Fut>(key: &str, ttl: Duration, fetch: F) -> Result<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Debug + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    global().remember(key, ttl, fetch).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn scratch_cache(tag: &str) -> ResponseCache {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let dir = std::env::temp_dir().join(format!(
            "vayu-cache-{tag}-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        ResponseCache::open(dir).unwrap()
    }

    #[tokio::test]
    async fn round_trips_a_stored_value() {
        let cache = scratch_cache("roundtrip");
        cache
            .put(
                "airq:28.61:77.21:2026-08-25",
                vec![120.5_f64, 98.0],
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let got: Option<Vec<f64>> = cache.get("airq:28.61:77.21:2026-08-25").await.unwrap();
        assert_eq!(got, Some(vec![120.5, 98.0]));
    }

    #[tokio::test]
    async fn unknown_key_is_a_miss() {
        let cache = scratch_cache("miss");
        let got: Option<u32> = cache.get("climate:0.00:0.00:2026-01-01").await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn expired_entry_is_dropped_on_read() {
        let cache = scratch_cache("expiry");
        cache
            .put("satrad:19.08:72.88:2026-08-25", 7_u32, Duration::ZERO)
            .await
            .unwrap();

        let got: Option<u32> = cache.get("satrad:19.08:72.88:2026-08-25").await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn remember_fetches_once_then_serves_from_disk() {
        let cache = scratch_cache("remember");
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let value = cache
                .remember(
                    "climate:12.97:77.59:2026-08-25",
                    Duration::from_secs(60),
                    || async {
                        calls.fetch_add(1, Ordering::Relaxed);
                        Ok(41_u32)
                    },
                )
                .await
                .unwrap();
            assert_eq!(value, 41);
        }

        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }
}
