//! Shared-instance cache: one instance per key, built on first request.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

/// Identity key for a shared instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Id(u64),
    Name(String),
}

impl From<u64> for CacheKey {
    fn from(id: u64) -> Self {
        CacheKey::Id(id)
    }
}

impl From<&str> for CacheKey {
    fn from(name: &str) -> Self {
        CacheKey::Name(name.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(name: String) -> Self {
        CacheKey::Name(name)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Id(id) => write!(f, "#{}", id),
            CacheKey::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Lazily populated cache of shared instances.
///
/// The first `get` for a key pays one construction; every later `get` for
/// the same key returns a reference to that same instance. Instances are
/// boxed so the reference stays address-stable while the map grows. The
/// cache owns every instance it builds for its whole lifetime, there is no
/// eviction.
pub struct InstanceCache<V> {
    instances: HashMap<CacheKey, Box<V>>,
    build: Box<dyn Fn(&CacheKey) -> V>,
}

impl<V> InstanceCache<V> {
    pub fn new(build: impl Fn(&CacheKey) -> V + 'static) -> Self {
        Self {
            instances: HashMap::new(),
            build: Box::new(build),
        }
    }

    /// Returns the shared instance for `key`, constructing it on first use.
    pub fn get(&mut self, key: impl Into<CacheKey>) -> &V {
        let Self { instances, build } = self;
        match instances.entry(key.into()) {
            Entry::Occupied(slot) => &**slot.into_mut(),
            Entry::Vacant(slot) => {
                debug!(key = %slot.key(), "building shared instance");
                let instance = build(slot.key());
                &**slot.insert(Box::new(instance))
            }
        }
    }

    pub fn contains(&self, key: impl Into<CacheKey>) -> bool {
        self.instances.contains_key(&key.into())
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<V: fmt::Debug> fmt::Debug for InstanceCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceCache")
            .field("instances", &self.instances)
            .finish_non_exhaustive()
    }
}
