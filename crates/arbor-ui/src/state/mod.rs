//! Application state plumbing
//!
//! Page configuration and the idea store backend. Without a `base_url` the
//! board keeps ideas in memory.

pub mod config;
pub mod http_store;

use std::rc::Rc;

use arbor_core::StoreConfig;
use arbor_core::store::{IdeaStore, InMemoryIdeaStore, TracingIdeaStore};

pub use config::{CONFIG_ELEMENT_ID, parse_embedded, read_config};
pub use http_store::HttpIdeaStore;

/// Builds the idea store for a configuration.
pub fn init_store(config: &StoreConfig) -> Rc<dyn IdeaStore> {
    match &config.base_url {
        Some(url) => {
            tracing::info!(base_url = %url, "Using HTTP idea store");
            Rc::new(TracingIdeaStore::new(HttpIdeaStore::new(url.clone())))
        }
        None => {
            tracing::info!("Using in-memory idea store");
            Rc::new(TracingIdeaStore::new(InMemoryIdeaStore::new()))
        }
    }
}

#[cfg(test)]
#[cfg(not(target_arch = "wasm32"))]
mod tests {
    use super::*;
    use arbor_core::store::ProjectScope;

    #[tokio::test]
    async fn test_in_memory_store_without_base_url() {
        let store = init_store(&StoreConfig::default());
        let records = store.list_ideas(&ProjectScope::new("a", "b")).await;
        assert!(matches!(records.as_deref(), Ok([])));
    }
}
