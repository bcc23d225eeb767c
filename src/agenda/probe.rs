use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::gateway::Gateway;

/// Capability cache answering "does this column exist on that relation".
///
/// Resolved at most once per process per (relation, column): the lock is held
/// across the probe request, so concurrent first callers wait instead of
/// double-probing. The cache is never invalidated at runtime; a schema change
/// on the backend requires a restart to be picked up.
#[derive(Debug, Clone, Default)]
pub struct ColumnProbe {
    cache: Arc<Mutex<HashMap<String, bool>>>,
}

impl ColumnProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the column exists. A minimal `select <column> limit 1` is
    /// issued on first call; an undefined-column rejection caches `false`,
    /// and any other probe error also resolves `false` so calendar fetches
    /// degrade to the unfiltered query instead of failing. Never propagates.
    pub async fn ensure_column(&self, gateway: &Gateway, relation: &str, column: &str) -> bool {
        let key = format!("{}.{}", relation, column);
        let mut cache = self.cache.lock().await;
        if let Some(conhecido) = cache.get(&key) {
            return *conhecido;
        }

        let existe = match gateway.table(relation).select(column).limit(1).fetch_all().await {
            Ok(_) => true,
            Err(e) if e.is_undefined_column() => {
                tracing::debug!("{} has no column {}: {}", relation, column, e);
                false
            }
            Err(e) => {
                tracing::warn!("probe of {}.{} failed, assuming absent: {}", relation, column, e);
                false
            }
        };

        cache.insert(key, existe);
        existe
    }

    /// Test hook. Production code never re-probes.
    pub async fn reset(&self) {
        self.cache.lock().await.clear();
    }
}
