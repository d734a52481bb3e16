//! The Feature Kit content catalog.
//!
//! A content root holds one directory per feature plus two fixed guidance
//! documents:
//!
//! ```text
//! <root>/
//! ├── instructions/
//! │   ├── feature-constitution.md
//! │   └── demo.md
//! └── sandbox/variant-1/features/
//!     └── <slug>/
//!         ├── config.md
//!         ├── prompt.txt
//!         ├── types.ts
//!         ├── components/*.{ts,tsx}
//!         ├── hooks/*.{ts,tsx}
//!         └── adapters/*.{ts,tsx}
//! ```
//!
//! # Modules
//!
//! - [`resolver`] — Locating the content root
//! - [`indexer`] — Building the registry from the features directory
//! - [`store`] — One-shot, shared registry initialisation

pub mod indexer;
pub mod resolver;
pub mod store;

pub use indexer::load_features;
pub use resolver::{resolve_root, FsProbe, PathProbe, Resolution, ResolveInputs, RootSource};
pub use store::FeatureStore;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Features directory, relative to the content root.
pub const FEATURES_SUBPATH: &str = "sandbox/variant-1/features";

/// Constitution document, relative to the content root.
pub const CONSTITUTION_SUBPATH: &str = "instructions/feature-constitution.md";

/// Demo guide document, relative to the content root.
pub const DEMO_GUIDE_SUBPATH: &str = "instructions/demo.md";

/// Paths derived from a resolved content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout {
    root: PathBuf,
}

impl ContentLayout {
    /// Creates a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The content root itself.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one subdirectory per feature.
    #[must_use]
    pub fn features_dir(&self) -> PathBuf {
        self.root.join(FEATURES_SUBPATH)
    }

    /// Location of the feature constitution.
    #[must_use]
    pub fn constitution_path(&self) -> PathBuf {
        self.root.join(CONSTITUTION_SUBPATH)
    }

    /// Location of the demo guide.
    #[must_use]
    pub fn demo_guide_path(&self) -> PathBuf {
        self.root.join(DEMO_GUIDE_SUBPATH)
    }
}

/// One of the source directories listed for every feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDir {
    /// `components/`
    Components,
    /// `hooks/`
    Hooks,
    /// `adapters/`
    Adapters,
}

impl SourceDir {
    /// Directory name inside a feature.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Hooks => "hooks",
            Self::Adapters => "adapters",
        }
    }
}

/// A source listing that failed part-way through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedListing {
    /// Which directory was being listed.
    pub dir: SourceDir,
    /// The error that stopped the listing.
    pub error: String,
}

/// Everything the index knows about one feature directory.
///
/// Built once by the indexer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInfo {
    /// Display name, e.g. `Auto Save Form`.
    pub name: String,
    /// Directory name, e.g. `auto-save-form`.
    pub slug: String,
    /// Absolute path of the feature directory.
    pub path: PathBuf,
    /// `config.md` exists.
    pub has_config: bool,
    /// `prompt.txt` exists.
    pub has_prompt: bool,
    /// `types.ts` exists.
    pub has_types: bool,
    /// Source files in `components/`.
    pub component_files: Vec<String>,
    /// Source files in `hooks/`.
    pub hook_files: Vec<String>,
    /// Source files in `adapters/`.
    pub adapter_files: Vec<String>,
    /// Listings that stopped early; empty on a clean index.
    pub degraded: Vec<DegradedListing>,
}

impl FeatureInfo {
    /// Whether the feature ships any hook sources.
    #[must_use]
    pub fn has_hooks(&self) -> bool {
        !self.hook_files.is_empty()
    }

    /// Whether the feature ships any adapter sources.
    #[must_use]
    pub fn has_adapters(&self) -> bool {
        !self.adapter_files.is_empty()
    }

    /// Path of a directory inside the feature.
    #[must_use]
    pub fn source_dir(&self, dir: SourceDir) -> PathBuf {
        self.path.join(dir.dir_name())
    }

    /// Files recorded for a source directory.
    #[must_use]
    pub fn source_files(&self, dir: SourceDir) -> &[String] {
        match dir {
            SourceDir::Components => &self.component_files,
            SourceDir::Hooks => &self.hook_files,
            SourceDir::Adapters => &self.adapter_files,
        }
    }

    /// Path of `config.md`.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config.md")
    }

    /// Path of `prompt.txt`.
    #[must_use]
    pub fn prompt_path(&self) -> PathBuf {
        self.path.join("prompt.txt")
    }

    /// Path of `types.ts`.
    #[must_use]
    pub fn types_path(&self) -> PathBuf {
        self.path.join("types.ts")
    }
}

/// Features keyed by slug, in directory-listing order.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: IndexMap<String, FeatureInfo>,
}

impl FeatureRegistry {
    /// Builds a registry from indexed features. Later duplicates of a slug
    /// replace earlier ones, which cannot happen for directory names.
    #[must_use]
    pub fn from_features(features: impl IntoIterator<Item = FeatureInfo>) -> Self {
        Self {
            features: features
                .into_iter()
                .map(|f| (f.slug.clone(), f))
                .collect(),
        }
    }

    /// Looks up a feature by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&FeatureInfo> {
        self.features.get(slug)
    }

    /// Iterates features in index order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureInfo> {
        self.features.values()
    }

    /// Number of registered features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if no features were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Case-insensitive substring match against display name and slug.
    ///
    /// An empty query matches every feature.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&FeatureInfo> {
        let needle = query.to_lowercase();
        self.iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&needle) || f.slug.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Derives a display name from a slug: `auto-save-form` → `Auto Save Form`.
#[must_use]
pub fn display_name(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `true` for TypeScript sources (`.ts` / `.tsx`).
#[must_use]
pub fn is_source_file(name: &str) -> bool {
    name.ends_with(".ts") || name.ends_with(".tsx")
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A feature with nothing but the given component files.
    pub fn feature(slug: &str, components: &[&str]) -> FeatureInfo {
        FeatureInfo {
            name: display_name(slug),
            slug: slug.to_string(),
            path: PathBuf::from("/kit").join(slug),
            has_config: false,
            has_prompt: false,
            has_types: false,
            component_files: components.iter().map(ToString::to_string).collect(),
            hook_files: Vec::new(),
            adapter_files: Vec::new(),
            degraded: Vec::new(),
        }
    }
}
