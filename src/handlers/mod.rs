//! Catalog operations behind the MCP tools and resources.
//!
//! Each operation returns Markdown. Feature-scoped operations follow a fixed
//! policy for absent artefacts:
//!
//! | Artefact | When absent |
//! |---|---|
//! | components | error |
//! | `config.md` (documentation) | error |
//! | `prompt.txt` (integration instructions) | error |
//! | `types.ts` | informational text |
//! | hooks / adapters | informational text |
//!
//! Aggregate reads never fail as a whole: a file that cannot be read is
//! replaced by a placeholder in its own section.

pub mod render;

use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, warn};

use crate::catalog::{ContentLayout, FeatureInfo, FeatureStore, SourceDir};
use crate::error::{FeatureError, FeatureResult};

use render::{component_scaffold, push_code_section, push_feature_summary};

/// The catalog service shared by every request.
#[derive(Debug)]
pub struct FeatureKit {
    store: FeatureStore,
}

impl FeatureKit {
    /// Creates the service for a content layout. Indexing is deferred.
    #[must_use]
    pub fn new(layout: ContentLayout) -> Self {
        Self {
            store: FeatureStore::new(layout),
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &FeatureStore {
        &self.store
    }

    /// Looks up a feature, loading the registry if needed.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::UnknownFeature`] for unregistered slugs.
    pub async fn feature(&self, slug: &str) -> FeatureResult<&FeatureInfo> {
        self.store
            .ensure_loaded()
            .await
            .get(slug)
            .ok_or_else(|| FeatureError::UnknownFeature {
                slug: slug.to_string(),
            })
    }

    /// Summary of every registered feature.
    pub async fn list_features(&self) -> String {
        let registry = self.store.ensure_loaded().await;

        let mut out = String::from("# Feature Kit - Available Features\n\n");
        let _ = writeln!(out, "Total: {} features\n", registry.len());
        for info in registry.iter() {
            push_feature_summary(&mut out, info);
        }
        out
    }

    /// Every component source of a feature.
    ///
    /// # Errors
    ///
    /// Fails for unknown slugs and for features without component files.
    pub async fn feature_code(&self, slug: &str) -> FeatureResult<String> {
        let info = self.feature(slug).await?;
        if info.component_files.is_empty() {
            return Err(FeatureError::NoComponentFiles {
                feature: info.name.clone(),
                dir: info.source_dir(SourceDir::Components),
            });
        }

        let mut out = format!("# {} - Component Code\n\n", info.name);
        push_sources(&mut out, info, SourceDir::Components).await;
        Ok(out)
    }

    /// The feature's `config.md`.
    ///
    /// # Errors
    ///
    /// Fails for unknown slugs, missing documentation, or read errors.
    pub async fn documentation(&self, slug: &str) -> FeatureResult<String> {
        let info = self.feature(slug).await?;
        if !info.has_config {
            return Err(FeatureError::MissingArtefact {
                feature: info.name.clone(),
                artefact: "documentation (config.md)",
            });
        }

        let body = read_text(&info.config_path()).await?;
        Ok(format!("# {} - Documentation\n\n{body}", info.name))
    }

    /// The feature's `prompt.txt`.
    ///
    /// # Errors
    ///
    /// Fails for unknown slugs, missing prompt, or read errors.
    pub async fn integration_instructions(&self, slug: &str) -> FeatureResult<String> {
        let info = self.feature(slug).await?;
        if !info.has_prompt {
            return Err(FeatureError::MissingArtefact {
                feature: info.name.clone(),
                artefact: "integration instructions (prompt.txt)",
            });
        }

        let body = read_text(&info.prompt_path()).await?;
        Ok(format!("# {} - Integration Instructions\n\n{body}", info.name))
    }

    /// The feature's `types.ts`, or a note that it has none.
    ///
    /// # Errors
    ///
    /// Fails for unknown slugs or read errors.
    pub async fn types(&self, slug: &str) -> FeatureResult<String> {
        let info = self.feature(slug).await?;
        if !info.has_types {
            return Ok(format!(
                "Feature '{}' does not have a types.ts file.",
                info.name
            ));
        }

        let body = read_text(&info.types_path()).await?;
        let mut out = format!("# {} - Type Definitions\n\n", info.name);
        let _ = write!(out, "```typescript\n{}\n```\n", body.trim_end_matches('\n'));
        Ok(out)
    }

    /// Every hook source of a feature, or a note that it has none.
    ///
    /// # Errors
    ///
    /// Fails for unknown slugs.
    pub async fn hooks(&self, slug: &str) -> FeatureResult<String> {
        let info = self.feature(slug).await?;
        if !info.has_hooks() {
            return Ok(format!("Feature '{}' does not have any hooks.", info.name));
        }

        let mut out = format!("# {} - Hooks\n\n", info.name);
        push_sources(&mut out, info, SourceDir::Hooks).await;
        Ok(out)
    }

    /// Every adapter source of a feature, or a note that it has none.
    ///
    /// # Errors
    ///
    /// Fails for unknown slugs.
    pub async fn adapters(&self, slug: &str) -> FeatureResult<String> {
        let info = self.feature(slug).await?;
        if !info.has_adapters() {
            return Ok(format!(
                "Feature '{}' does not have any adapters.",
                info.name
            ));
        }

        let mut out = format!("# {} - Adapters\n\n", info.name);
        push_sources(&mut out, info, SourceDir::Adapters).await;
        Ok(out)
    }

    /// The feature constitution, verbatim.
    ///
    /// # Errors
    ///
    /// Fails if the document is missing or unreadable.
    pub async fn constitution(&self) -> FeatureResult<String> {
        read_document("Feature constitution", &self.store.layout().constitution_path()).await
    }

    /// The demo guide, verbatim.
    ///
    /// # Errors
    ///
    /// Fails if the document is missing or unreadable.
    pub async fn demo_guide(&self) -> FeatureResult<String> {
        read_document("Demo guide", &self.store.layout().demo_guide_path()).await
    }

    /// Guidance for building a new component, embedding the constitution.
    ///
    /// # Errors
    ///
    /// Propagates constitution read failures.
    pub async fn create_component(
        &self,
        component_name: &str,
        description: &str,
        requirements: Option<&str>,
    ) -> FeatureResult<String> {
        let constitution = self.constitution().await?;
        Ok(component_scaffold(
            component_name,
            description,
            requirements,
            &constitution,
        ))
    }

    /// Features whose name or slug contains `query`, ignoring case.
    pub async fn search(&self, query: &str) -> String {
        let registry = self.store.ensure_loaded().await;
        let hits = registry.search(query);
        debug!(query, hits = hits.len(), "Feature search");

        if hits.is_empty() {
            return format!("No features found matching \"{query}\".");
        }

        let mut out = format!("# Search Results for \"{query}\"\n\n");
        let _ = writeln!(out, "Found {} features\n", hits.len());
        for info in hits {
            push_feature_summary(&mut out, info);
        }
        out
    }
}

async fn read_text(path: &Path) -> FeatureResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FeatureError::Read {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_document(document: &'static str, path: &Path) -> FeatureResult<String> {
    if !path.exists() {
        return Err(FeatureError::MissingDocument {
            document,
            path: path.to_path_buf(),
        });
    }
    read_text(path).await
}

/// Appends one fenced section per recorded file in `dir`.
async fn push_sources(out: &mut String, info: &FeatureInfo, dir: SourceDir) {
    let base = info.source_dir(dir);
    for file in info.source_files(dir) {
        let path = base.join(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => push_code_section(out, file, &body),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read source file");
                push_code_section(out, file, &format!("// Error reading file: {e}"));
            }
        }
    }
}
