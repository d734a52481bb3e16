//! Builds the feature registry from the features directory.
//!
//! The scan is one level deep: each immediate subdirectory is a feature,
//! and only its well-known files and source directories are inspected.
//! Existence checks are synchronous; directory listings go through
//! `tokio::fs`.
//!
//! Nothing here fails. A missing features directory gives an empty
//! registry, and a listing that breaks part-way keeps what it collected and
//! is recorded on the feature as a [`DegradedListing`].

use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::{
    display_name, is_source_file, DegradedListing, FeatureInfo, FeatureRegistry, SourceDir,
};

/// Outcome of listing one source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceListing {
    /// The directory does not exist.
    Absent,
    /// Every entry was read.
    Complete(Vec<String>),
    /// Reading stopped early; `files` holds what was collected before.
    Partial {
        /// Source files collected before the failure.
        files: Vec<String>,
        /// The error that stopped the listing.
        error: String,
    },
}

impl SourceListing {
    /// Source files collected, whatever the outcome.
    #[must_use]
    pub fn files(&self) -> &[String] {
        match self {
            Self::Absent => &[],
            Self::Complete(files) | Self::Partial { files, .. } => files,
        }
    }

    /// The failure message, for partial listings.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Partial { error, .. } => Some(error),
            _ => None,
        }
    }

    fn into_files(self) -> Vec<String> {
        match self {
            Self::Absent => Vec::new(),
            Self::Complete(files) | Self::Partial { files, .. } => files,
        }
    }
}

/// Lists the `.ts` / `.tsx` entries of `dir`, in listing order.
pub async fn list_source_files(dir: &Path) -> SourceListing {
    if !dir.is_dir() {
        return SourceListing::Absent;
    }

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            return SourceListing::Partial {
                files: Vec::new(),
                error: e.to_string(),
            }
        }
    };

    let mut names = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => names.push(Ok(entry.file_name().to_string_lossy().into_owned())),
            Ok(None) => break,
            Err(e) => {
                names.push(Err(e));
                break;
            }
        }
    }
    listing_from_entries(names)
}

/// Filters a stream of entry names; the first error ends the listing.
fn listing_from_entries(names: impl IntoIterator<Item = io::Result<String>>) -> SourceListing {
    let mut files = Vec::new();
    for name in names {
        match name {
            Ok(name) if is_source_file(&name) => files.push(name),
            Ok(_) => {}
            Err(e) => {
                return SourceListing::Partial {
                    files,
                    error: e.to_string(),
                }
            }
        }
    }
    SourceListing::Complete(files)
}

/// Indexes a single feature directory.
pub async fn index_feature(slug: &str, path: &Path) -> FeatureInfo {
    let components = list_source_files(&path.join(SourceDir::Components.dir_name())).await;
    let hooks = list_source_files(&path.join(SourceDir::Hooks.dir_name())).await;
    let adapters = list_source_files(&path.join(SourceDir::Adapters.dir_name())).await;
    feature_from_listings(slug, path, [components, hooks, adapters])
}

/// Builds a [`FeatureInfo`] from the components, hooks and adapters
/// listings, in that order.
fn feature_from_listings(slug: &str, path: &Path, listings: [SourceListing; 3]) -> FeatureInfo {
    let [components, hooks, adapters] = listings;
    let mut degraded = Vec::new();
    let component_files = record(slug, SourceDir::Components, components, &mut degraded);
    let hook_files = record(slug, SourceDir::Hooks, hooks, &mut degraded);
    let adapter_files = record(slug, SourceDir::Adapters, adapters, &mut degraded);

    FeatureInfo {
        name: display_name(slug),
        slug: slug.to_string(),
        path: path.to_path_buf(),
        has_config: path.join("config.md").exists(),
        has_prompt: path.join("prompt.txt").exists(),
        has_types: path.join("types.ts").exists(),
        component_files,
        hook_files,
        adapter_files,
        degraded,
    }
}

/// Takes the files out of a listing, recording a partial failure.
fn record(
    slug: &str,
    dir: SourceDir,
    listing: SourceListing,
    degraded: &mut Vec<DegradedListing>,
) -> Vec<String> {
    if let Some(error) = listing.error() {
        warn!(
            feature = slug,
            dir = dir.dir_name(),
            error,
            "Source listing incomplete"
        );
        degraded.push(DegradedListing {
            dir,
            error: error.to_string(),
        });
    }
    listing.into_files()
}

/// Scans `features_dir` and returns the registry.
pub async fn load_features(features_dir: &Path) -> FeatureRegistry {
    if !features_dir.exists() {
        warn!(
            path = %features_dir.display(),
            "Features directory not found; serving an empty catalog"
        );
        return FeatureRegistry::default();
    }

    let mut entries = match tokio::fs::read_dir(features_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                path = %features_dir.display(),
                error = %e,
                "Failed to list features directory; serving an empty catalog"
            );
            return FeatureRegistry::default();
        }
    };

    let mut features = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Features listing stopped early");
                break;
            }
        };

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let slug = entry.file_name().to_string_lossy().into_owned();
        let info = index_feature(&slug, &path).await;
        debug!(
            feature = %info.slug,
            components = info.component_files.len(),
            hooks = info.hook_files.len(),
            adapters = info.adapter_files.len(),
            "Indexed feature"
        );
        features.push(info);
    }

    FeatureRegistry::from_features(features)
}
