//! Read-through cached postcode lookups
//!
//! The lookup service sits between the CLI and the remote postcode service.
//! Each operation consults the cache store first and only queries the remote
//! on a miss, persisting a successful answer before returning it. Remote
//! failures propagate unchanged and are never written to the cache, so a
//! transient outage or an authoritative "no matches" can never contaminate
//! the cache with a false answer.

use thiserror::Error;
use tracing::debug;

use crate::api::{ApiError, PostcodeApi};
use crate::cache::{CacheError, CacheStore};
use crate::postcode::normalize;

/// Errors surfaced by the lookup layer
///
/// Cache and remote errors pass through unchanged; the only substitution
/// this layer performs is turning a cache miss into a remote call.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The input normalized to an empty postcode
    #[error("postcode must not be empty")]
    EmptyPostcode,

    /// The cache document could not be read or written
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The remote service call failed or reported no matches
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Cache-first postcode lookups against a remote service
#[derive(Debug)]
pub struct LookupService<A> {
    api: A,
    cache: CacheStore,
}

impl<A: PostcodeApi> LookupService<A> {
    /// Creates a lookup service over the given remote client and cache store
    pub fn new(api: A, cache: CacheStore) -> Self {
        Self { api, cache }
    }

    /// Returns whether `postcode` is a valid postcode
    ///
    /// The input is normalized into the canonical cache key first; input
    /// that normalizes to nothing is rejected before any cache or remote
    /// access. A cached answer is returned without a remote call.
    pub async fn validate(&self, postcode: &str) -> Result<bool, LookupError> {
        let key = normalized_key(postcode)?;

        if let Some(valid) = self.cache.get_valid(&key)? {
            debug!(%key, "validity served from cache");
            return Ok(valid);
        }

        debug!(%key, "validity not cached, querying service");
        let valid = self.api.validate(&key).await?;
        self.cache.set_valid(&key, valid)?;
        Ok(valid)
    }

    /// Returns the postcodes starting with `prefix`
    ///
    /// `ApiError::NoMatches` propagates without being cached: only a
    /// successful answer is ever persisted, so an absent prefix re-queries
    /// the remote on every lookup.
    pub async fn complete(&self, prefix: &str) -> Result<Vec<String>, LookupError> {
        let key = normalized_key(prefix)?;

        if let Some(completions) = self.cache.get_completions(&key)? {
            debug!(%key, "completions served from cache");
            return Ok(completions);
        }

        debug!(%key, "completions not cached, querying service");
        let completions = self.api.autocomplete(&key).await?;
        self.cache.set_completions(&key, completions.clone())?;
        Ok(completions)
    }
}

fn normalized_key(input: &str) -> Result<String, LookupError> {
    let key = normalize(input);
    if key.is_empty() {
        return Err(LookupError::EmptyPostcode);
    }
    Ok(key)
}
