//! Shared, load-once access to the feature registry.

use tokio::sync::OnceCell;
use tracing::info;

use super::{load_features, ContentLayout, FeatureRegistry};

/// Owns the content layout and the lazily built registry.
///
/// The registry is indexed at most once per store, however many callers race
/// on the first [`FeatureStore::ensure_loaded`]. There is no reload.
#[derive(Debug)]
pub struct FeatureStore {
    layout: ContentLayout,
    registry: OnceCell<FeatureRegistry>,
}

impl FeatureStore {
    /// Creates a store; nothing is read until the first load.
    #[must_use]
    pub fn new(layout: ContentLayout) -> Self {
        Self {
            layout,
            registry: OnceCell::new(),
        }
    }

    /// The content layout this store indexes.
    #[must_use]
    pub const fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    /// Returns the registry, indexing the features directory on first use.
    pub async fn ensure_loaded(&self) -> &FeatureRegistry {
        self.registry
            .get_or_init(|| async {
                let features_dir = self.layout.features_dir();
                let registry = load_features(&features_dir).await;
                info!(
                    path = %features_dir.display(),
                    features = registry.len(),
                    "Feature catalog loaded"
                );
                registry
            })
            .await
    }

    /// Returns `true` once the registry has been built.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.registry.initialized()
    }
}
