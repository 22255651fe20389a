//! Scoped preview resources for attached documents.
//!
//! Every attached file gets a preview URL from a [`PreviewRegistry`]. The
//! returned [`PreviewHandle`] releases its URL when dropped, so replacing,
//! removing, or tearing down a slot can never leave a live preview behind.
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    live: BTreeSet<String>,
}

/// Issues preview URLs and tracks which ones are still live.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a preview URL for a file. Released when the handle drops.
    pub fn acquire(&self, file_name: &str) -> PreviewHandle {
        let url = {
            let mut state = self.lock();
            state.next_id += 1;
            let url = format!("blob:quickcrate/{}/{}", state.next_id, file_name);
            state.live.insert(url.clone());
            url
        };
        tracing::debug!(url = %url, "preview acquired");
        PreviewHandle {
            url,
            registry: self.clone(),
        }
    }

    /// Number of previews that have been acquired and not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.lock().live.contains(url)
    }

    fn release(&self, url: &str) {
        if self.lock().live.remove(url) {
            tracing::debug!(url = %url, "preview released");
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // The state is a plain set; a panic elsewhere cannot leave it torn.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A live preview URL owned by exactly one document slot.
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(&self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_release_on_drop() {
        let registry = PreviewRegistry::new();
        let first = registry.acquire("a.pdf");
        let second = registry.acquire("a.pdf");
        assert_ne!(first.url(), second.url());
        assert_eq!(registry.live_count(), 2);

        let first_url = first.url().to_string();
        drop(first);
        assert!(!registry.is_live(&first_url));
        assert!(registry.is_live(second.url()));
        assert_eq!(registry.live_count(), 1);
    }
}
