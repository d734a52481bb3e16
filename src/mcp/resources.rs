//! MCP resources.
//!
//! Resources mirror the read-only part of the tool surface under the
//! `feature-kit://` scheme:
//!
//! - `feature-kit://constitution`
//! - `feature-kit://demo-guide`
//! - `feature-kit://feature/{slug}` (the feature's documentation)

use serde::{Deserialize, Serialize};

use crate::catalog::FeatureRegistry;

/// URI scheme prefix.
pub const SCHEME: &str = "feature-kit://";

/// MIME type of every resource.
pub const MIME_MARKDOWN: &str = "text/markdown";

/// A parsed resource URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    /// The feature constitution.
    Constitution,
    /// The demo guide.
    DemoGuide,
    /// Documentation of one feature.
    Feature(String),
}

impl ResourceUri {
    /// Parses a `feature-kit://` URI. Returns `None` for anything else.
    #[must_use]
    pub fn parse(uri: &str) -> Option<Self> {
        let path = uri.trim().strip_prefix(SCHEME)?;
        match path {
            "constitution" => Some(Self::Constitution),
            "demo-guide" => Some(Self::DemoGuide),
            _ => {
                let slug = path.strip_prefix("feature/")?;
                (!slug.is_empty() && !slug.contains('/')).then(|| Self::Feature(slug.to_string()))
            }
        }
    }

    /// Formats the URI.
    #[must_use]
    pub fn to_uri(&self) -> String {
        match self {
            Self::Constitution => format!("{SCHEME}constitution"),
            Self::DemoGuide => format!("{SCHEME}demo-guide"),
            Self::Feature(slug) => format!("{SCHEME}feature/{slug}"),
        }
    }
}

/// Definition of an MCP resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// Resource URI.
    pub uri: String,
    /// Human-readable name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource.
    pub mime_type: String,
}

/// Content of an MCP resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    /// Resource URI.
    pub uri: String,
    /// MIME type.
    pub mime_type: String,
    /// Text content.
    pub text: String,
}

impl ResourceContent {
    /// Markdown content for `uri`.
    #[must_use]
    pub fn markdown(uri: &ResourceUri, text: String) -> Self {
        Self {
            uri: uri.to_uri(),
            mime_type: MIME_MARKDOWN.to_string(),
            text,
        }
    }
}

/// Two fixed documents followed by one entry per feature.
#[must_use]
pub fn list_resources(registry: &FeatureRegistry) -> Vec<ResourceDefinition> {
    let mut resources = Vec::with_capacity(registry.len() + 2);

    resources.push(ResourceDefinition {
        uri: ResourceUri::Constitution.to_uri(),
        name: "Feature Constitution".to_string(),
        description: Some("Standards and guidelines every feature must follow".to_string()),
        mime_type: MIME_MARKDOWN.to_string(),
    });
    resources.push(ResourceDefinition {
        uri: ResourceUri::DemoGuide.to_uri(),
        name: "Demo Guide".to_string(),
        description: Some("How to build demo pages for features".to_string()),
        mime_type: MIME_MARKDOWN.to_string(),
    });

    resources.extend(registry.iter().map(|info| ResourceDefinition {
        uri: ResourceUri::Feature(info.slug.clone()).to_uri(),
        name: info.name.clone(),
        description: Some(format!("Documentation for the {} feature", info.name)),
        mime_type: MIME_MARKDOWN.to_string(),
    }));

    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::feature;

    #[test]
    fn parse_fixed_uris() {
        assert_eq!(
            ResourceUri::parse("feature-kit://constitution"),
            Some(ResourceUri::Constitution)
        );
        assert_eq!(
            ResourceUri::parse("feature-kit://demo-guide"),
            Some(ResourceUri::DemoGuide)
        );
    }

    #[test]
    fn parse_feature_uri() {
        assert_eq!(
            ResourceUri::parse("feature-kit://feature/auto-save-form"),
            Some(ResourceUri::Feature("auto-save-form".to_string()))
        );
    }

    #[test]
    fn reject_invalid_uris() {
        assert_eq!(ResourceUri::parse("http://example.com"), None);
        assert_eq!(ResourceUri::parse("feature-kit://unknown"), None);
        assert_eq!(ResourceUri::parse("feature-kit://feature/"), None);
        assert_eq!(ResourceUri::parse("feature-kit://feature/a/b"), None);
    }

    #[test]
    fn uri_formatting_round_trips() {
        for uri in [
            ResourceUri::Constitution,
            ResourceUri::DemoGuide,
            ResourceUri::Feature("filter-sheet".to_string()),
        ] {
            assert_eq!(ResourceUri::parse(&uri.to_uri()), Some(uri));
        }
    }

    #[test]
    fn list_has_fixed_documents_then_features() {
        let registry = FeatureRegistry::from_features([
            feature("auto-save-form", &[]),
            feature("filter-sheet", &[]),
        ]);
        let resources = list_resources(&registry);

        assert_eq!(resources.len(), 4);
        assert_eq!(resources[0].uri, "feature-kit://constitution");
        assert_eq!(resources[1].uri, "feature-kit://demo-guide");
        assert_eq!(resources[2].uri, "feature-kit://feature/auto-save-form");
        assert_eq!(resources[2].name, "Auto Save Form");
        assert!(resources.iter().all(|r| r.mime_type == "text/markdown"));
    }

    #[test]
    fn definition_serialises_camel_case() {
        let registry = FeatureRegistry::default();
        let json = serde_json::to_value(&list_resources(&registry)[0]).unwrap();
        assert_eq!(json["mimeType"], "text/markdown");
    }
}
