//! Read-through cache of organizational entities, scoped to one operation.

use std::collections::HashMap;

use civica_models::{EntityId, Level, OrgEntity};

use crate::error::{AccessError, AccessResult};
use crate::store::DirectoryStore;

/// Memoises `(level, id)` lookups against a [`DirectoryStore`].
///
/// Built for a single validation pass and dropped afterwards, so it never
/// serves stale rows across requests. Misses are cached too.
pub struct EntityCache<'a> {
    directory: &'a dyn DirectoryStore,
    entries: HashMap<(Level, EntityId), Option<OrgEntity>>,
}

impl<'a> EntityCache<'a> {
    pub fn new(directory: &'a dyn DirectoryStore) -> Self {
        Self {
            directory,
            entries: HashMap::new(),
        }
    }

    pub async fn get(&mut self, level: Level, id: EntityId) -> AccessResult<Option<&OrgEntity>> {
        if !self.entries.contains_key(&(level, id)) {
            let entity = self.directory.find_entity(level, id).await?;
            self.entries.insert((level, id), entity);
        }
        Ok(self.entries.get(&(level, id)).and_then(Option::as_ref))
    }

    /// Like [`get`](Self::get), but a missing entity is a `DanglingReference`.
    pub async fn require(&mut self, level: Level, id: EntityId) -> AccessResult<&OrgEntity> {
        self.get(level, id)
            .await?
            .ok_or(AccessError::DanglingReference {
                level,
                entity_id: id,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    #[tokio::test]
    async fn test_lookups_are_memoised() {
        let store = InMemoryStore::new();
        let localidad = store
            .create_entity(Level::Localidad, "Sur", None)
            .await
            .unwrap();

        let mut cache = EntityCache::new(&store);
        assert!(cache.is_empty());
        let found = cache.get(Level::Localidad, localidad.id).await.unwrap();
        assert_eq!(found.map(|e| e.name.as_str()), Some("Sur"));

        cache.get(Level::Localidad, localidad.id).await.unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_require_reports_dangling_reference() {
        let store = InMemoryStore::new();
        let mut cache = EntityCache::new(&store);
        let err = cache
            .require(Level::Mesa, EntityId::new(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccessError::DanglingReference {
                level: Level::Mesa,
                ..
            }
        ));
        // The miss is cached as well.
        assert_eq!(cache.len(), 1);
    }
}
