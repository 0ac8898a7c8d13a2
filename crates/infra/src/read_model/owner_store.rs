use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use stockledger_core::OwnerId;

use crate::error::StorageError;

/// Owner-isolated key/value store abstraction.
pub trait OwnerStore<K, V>: Send + Sync {
    fn get(&self, owner: OwnerId, key: &K) -> Result<Option<V>, StorageError>;
    fn upsert(&self, owner: OwnerId, key: K, value: V) -> Result<(), StorageError>;
    fn list(&self, owner: OwnerId) -> Result<Vec<V>, StorageError>;
}

impl<K, V, S> OwnerStore<K, V> for Arc<S>
where
    S: OwnerStore<K, V> + ?Sized,
{
    fn get(&self, owner: OwnerId, key: &K) -> Result<Option<V>, StorageError> {
        (**self).get(owner, key)
    }

    fn upsert(&self, owner: OwnerId, key: K, value: V) -> Result<(), StorageError> {
        (**self).upsert(owner, key, value)
    }

    fn list(&self, owner: OwnerId) -> Result<Vec<V>, StorageError> {
        (**self).list(owner)
    }
}

/// In-memory owner-isolated store for tests/dev.
#[derive(Debug)]
pub struct InMemoryOwnerStore<K, V> {
    inner: RwLock<HashMap<(OwnerId, K), V>>,
}

impl<K, V> InMemoryOwnerStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryOwnerStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OwnerStore<K, V> for InMemoryOwnerStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, owner: OwnerId, key: &K) -> Result<Option<V>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::poisoned("owner store"))?;
        Ok(map.get(&(owner, key.clone())).cloned())
    }

    fn upsert(&self, owner: OwnerId, key: K, value: V) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::poisoned("owner store"))?;
        map.insert((owner, key), value);
        Ok(())
    }

    fn list(&self, owner: OwnerId) -> Result<Vec<V>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::poisoned("owner store"))?;
        Ok(map
            .iter()
            .filter_map(|((o, _k), v)| (*o == owner).then(|| v.clone()))
            .collect())
    }
}
