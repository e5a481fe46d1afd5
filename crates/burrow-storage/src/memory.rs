use async_trait::async_trait;
use burrow_core::error::{Result, StorageError};
use burrow_core::repository::{ReadRepository, Repository};
use burrow_core::shortcode::ShortCode;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so reads and writes to different buckets
/// don't block each other. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ShortCode, String>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }
}

impl FromIterator<(ShortCode, String)> for InMemoryRepository {
    fn from_iter<T: IntoIterator<Item = (ShortCode, String)>>(iter: T) -> Self {
        Self {
            storage: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        Ok(self.storage.get(code).map(|url| url.value().clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.storage.len())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, original_url: String) -> Result<()> {
        // The entry guard holds the shard lock, so check-and-insert is atomic.
        match self.storage.entry(code.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(original_url);
                Ok(())
            }
        }
    }
}
