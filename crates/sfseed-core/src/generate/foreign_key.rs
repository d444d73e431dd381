//! # Identifier Pools
//!
//! Reference fields are populated from pools of existing identifiers of the
//! target object. Pools are resolved at most once per target and then reused
//! for the lifetime of the cache; there is no eviction.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::error::Result;

/// Ordered candidate identifiers for one target object. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierPool(Arc<[String]>);

impl IdentifierPool {
    pub fn new(ids: Vec<String>) -> Self {
        Self(ids.into())
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when both handles share the same allocation (a cache hit).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Memoized pool per target object name.
///
/// Absent results are remembered too, so an object with no records is queried
/// only once.
#[derive(Debug, Default)]
pub struct IdentifierCache {
    pools: HashMap<String, Option<IdentifierPool>>,
}

impl IdentifierCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `object_name`, or run `resolve` once and cache it.
    ///
    /// Errors from `resolve` are returned and nothing is cached, so a later
    /// call retries the lookup.
    pub async fn get_or_resolve<F, Fut>(
        &mut self,
        object_name: &str,
        resolve: F,
    ) -> Result<Option<IdentifierPool>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<IdentifierPool>>>,
    {
        if let Some(cached) = self.pools.get(object_name) {
            tracing::debug!(object = object_name, "Identifier pool cache hit");
            return Ok(cached.clone());
        }
        let resolved = resolve().await?;
        self.pools.insert(object_name.to_string(), resolved.clone());
        Ok(resolved)
    }

    pub fn get(&self, object_name: &str) -> Option<&Option<IdentifierPool>> {
        self.pools.get(object_name)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
