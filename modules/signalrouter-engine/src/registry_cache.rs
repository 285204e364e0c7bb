//! Read-mostly shared state: the channel registry and the active-source set
//! are process-wide, refreshed on their own cadence, and read every cycle by
//! every source worker. Both are atomic-swapped immutable snapshots — no
//! reader ever blocks on a refresh.

use std::collections::BTreeSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use signalrouter_domains::ChannelRegistry;

/// Atomic-swap holder for the custom-channel registry snapshot.
pub struct RegistryCache {
    inner: ArcSwap<ChannelRegistry>,
}

impl RegistryCache {
    pub fn new(initial: ChannelRegistry) -> Self {
        Self {
            inner: ArcSwap::new(Arc::new(initial)),
        }
    }

    pub fn load(&self) -> Arc<ChannelRegistry> {
        self.inner.load_full()
    }

    pub fn store(&self, registry: ChannelRegistry) {
        self.inner.store(Arc::new(registry));
    }
}

/// Atomic-swap holder for the active source set. Grows monotonically within
/// a process lifetime: a discovery cycle unions freshly
/// discovered indexes and enabled `Source` rows into whatever was already
/// tracked, so a source whose index temporarily disappears from discovery is
/// retained and resumes from its last cursor on reappearance.
pub struct ActiveSources {
    inner: ArcSwap<BTreeSet<String>>,
}

impl ActiveSources {
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::new(Arc::new(BTreeSet::new())),
        }
    }

    pub fn snapshot(&self) -> Arc<BTreeSet<String>> {
        self.inner.load_full()
    }

    /// Unions `discovered` and `enabled_sources` into the tracked set and
    /// stores the result. Returns the new snapshot.
    pub fn refresh(
        &self,
        discovered: impl IntoIterator<Item = String>,
        enabled_sources: impl IntoIterator<Item = String>,
    ) -> Arc<BTreeSet<String>> {
        let mut merged = (*self.inner.load_full()).clone();
        merged.extend(discovered);
        merged.extend(enabled_sources);
        let merged = Arc::new(merged);
        self.inner.store(merged.clone());
        merged
    }
}

impl Default for ActiveSources {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_unions_and_is_monotonic() {
        let sources = ActiveSources::new();
        sources.refresh(vec!["a".to_string()], vec!["b".to_string()]);
        let snap = sources.refresh(Vec::<String>::new(), vec!["c".to_string()]);
        assert_eq!(
            snap.iter().cloned().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn disappearing_source_is_retained_across_refreshes() {
        let sources = ActiveSources::new();
        sources.refresh(vec!["siteA".to_string()], Vec::<String>::new());
        // discovery stops returning siteA; enabled sources also empty
        let snap = sources.refresh(Vec::<String>::new(), Vec::<String>::new());
        assert!(snap.contains("siteA"));
    }

    #[test]
    fn registry_cache_swaps_snapshot() {
        let cache = RegistryCache::new(ChannelRegistry::default());
        assert!(cache.load().channels.is_empty());
        cache.store(ChannelRegistry::new(vec![]));
        assert!(cache.load().channels.is_empty());
    }
}
