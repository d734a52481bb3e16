//! The MCP tool surface.
//!
//! [`ToolName`] is the closed set of tools this server exposes. Adding a
//! tool means adding a variant; `as_str`, `definition` and
//! [`ToolRequest::parse`] all match exhaustively on it.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Every tool exposed over MCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// `list_features`
    ListFeatures,
    /// `get_feature_code`
    GetFeatureCode,
    /// `get_feature_documentation`
    GetFeatureDocumentation,
    /// `get_feature_integration_instructions`
    GetFeatureIntegrationInstructions,
    /// `get_feature_types`
    GetFeatureTypes,
    /// `get_feature_hooks`
    GetFeatureHooks,
    /// `get_feature_adapters`
    GetFeatureAdapters,
    /// `get_feature_constitution`
    GetFeatureConstitution,
    /// `get_demo_guide`
    GetDemoGuide,
    /// `create_component`
    CreateComponent,
    /// `search_features`
    SearchFeatures,
}

impl ToolName {
    /// All tools, in the order `tools/list` reports them.
    pub const ALL: [Self; 11] = [
        Self::ListFeatures,
        Self::GetFeatureCode,
        Self::GetFeatureDocumentation,
        Self::GetFeatureIntegrationInstructions,
        Self::GetFeatureTypes,
        Self::GetFeatureHooks,
        Self::GetFeatureAdapters,
        Self::GetFeatureConstitution,
        Self::GetDemoGuide,
        Self::CreateComponent,
        Self::SearchFeatures,
    ];

    /// Wire name of the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListFeatures => "list_features",
            Self::GetFeatureCode => "get_feature_code",
            Self::GetFeatureDocumentation => "get_feature_documentation",
            Self::GetFeatureIntegrationInstructions => "get_feature_integration_instructions",
            Self::GetFeatureTypes => "get_feature_types",
            Self::GetFeatureHooks => "get_feature_hooks",
            Self::GetFeatureAdapters => "get_feature_adapters",
            Self::GetFeatureConstitution => "get_feature_constitution",
            Self::GetDemoGuide => "get_demo_guide",
            Self::CreateComponent => "create_component",
            Self::SearchFeatures => "search_features",
        }
    }

    /// Looks up a tool by wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    /// The `tools/list` entry for this tool.
    #[must_use]
    pub fn definition(self) -> ToolDefinition {
        let (description, input_schema) = match self {
            Self::ListFeatures => (
                "List every feature in the Feature Kit catalog with counts of component, \
                 hook and adapter files and whether documentation, an integration prompt \
                 and type definitions are available.",
                no_arguments(),
            ),
            Self::GetFeatureCode => (
                "Get the source code of every component file of a feature.",
                feature_argument(),
            ),
            Self::GetFeatureDocumentation => (
                "Get the documentation (config.md) of a feature.",
                feature_argument(),
            ),
            Self::GetFeatureIntegrationInstructions => (
                "Get the step-by-step integration instructions (prompt.txt) of a feature.",
                feature_argument(),
            ),
            Self::GetFeatureTypes => (
                "Get the TypeScript type definitions (types.ts) of a feature.",
                feature_argument(),
            ),
            Self::GetFeatureHooks => (
                "Get the source code of every React hook shipped with a feature.",
                feature_argument(),
            ),
            Self::GetFeatureAdapters => (
                "Get the source code of every data adapter shipped with a feature.",
                feature_argument(),
            ),
            Self::GetFeatureConstitution => (
                "Get the Feature Kit constitution: the standards every feature must follow.",
                no_arguments(),
            ),
            Self::GetDemoGuide => (
                "Get the guide for building demo pages for features.",
                no_arguments(),
            ),
            Self::CreateComponent => (
                "Get guidance and a suggested file layout for a new component, following \
                 the Feature Kit constitution. Does not write any files.",
                json!({
                    "type": "object",
                    "properties": {
                        "componentName": {
                            "type": "string",
                            "description": "Name of the component to create"
                        },
                        "description": {
                            "type": "string",
                            "description": "What the component does"
                        },
                        "requirements": {
                            "type": "string",
                            "description": "Optional: specific requirements or constraints"
                        }
                    },
                    "required": ["componentName", "description"]
                }),
            ),
            Self::SearchFeatures => (
                "Search features by name or slug (case-insensitive substring match).",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Text to look for in feature names and slugs"
                        }
                    },
                    "required": ["query"]
                }),
            ),
        };

        ToolDefinition {
            name: self.as_str().to_string(),
            description: Some(description.to_string()),
            input_schema,
        }
    }
}

fn no_arguments() -> Value {
    json!({
        "type": "object",
        "properties": {}
    })
}

fn feature_argument() -> Value {
    json!({
        "type": "object",
        "properties": {
            "featureName": {
                "type": "string",
                "description": "Feature slug, e.g. 'auto-save-form' (see list_features)"
            }
        },
        "required": ["featureName"]
    })
}

/// Definitions of every tool, for `tools/list`.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.into_iter().map(ToolName::definition).collect()
}

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Why a `tools/call` could not be turned into a [`ToolRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolParseError {
    /// No tool has this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    /// A required string argument is absent or not a string.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    /// Summarise the catalog.
    ListFeatures,
    /// Component sources of a feature.
    FeatureCode {
        /// Feature slug.
        feature: String,
    },
    /// `config.md` of a feature.
    FeatureDocumentation {
        /// Feature slug.
        feature: String,
    },
    /// `prompt.txt` of a feature.
    FeatureIntegrationInstructions {
        /// Feature slug.
        feature: String,
    },
    /// `types.ts` of a feature.
    FeatureTypes {
        /// Feature slug.
        feature: String,
    },
    /// Hook sources of a feature.
    FeatureHooks {
        /// Feature slug.
        feature: String,
    },
    /// Adapter sources of a feature.
    FeatureAdapters {
        /// Feature slug.
        feature: String,
    },
    /// The constitution document.
    FeatureConstitution,
    /// The demo guide document.
    DemoGuide,
    /// Scaffold guidance for a new component.
    CreateComponent {
        /// Component name as given by the caller.
        component_name: String,
        /// What the component does.
        description: String,
        /// Optional extra constraints.
        requirements: Option<String>,
    },
    /// Name/slug search.
    SearchFeatures {
        /// Substring to look for.
        query: String,
    },
}

impl ToolRequest {
    /// Validates a tool name and its arguments.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown tools or missing required arguments.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, ToolParseError> {
        let tool =
            ToolName::parse(name).ok_or_else(|| ToolParseError::UnknownTool(name.to_string()))?;
        let feature = || required_str(arguments, "featureName");

        Ok(match tool {
            ToolName::ListFeatures => Self::ListFeatures,
            ToolName::GetFeatureCode => Self::FeatureCode { feature: feature()? },
            ToolName::GetFeatureDocumentation => {
                Self::FeatureDocumentation { feature: feature()? }
            }
            ToolName::GetFeatureIntegrationInstructions => {
                Self::FeatureIntegrationInstructions { feature: feature()? }
            }
            ToolName::GetFeatureTypes => Self::FeatureTypes { feature: feature()? },
            ToolName::GetFeatureHooks => Self::FeatureHooks { feature: feature()? },
            ToolName::GetFeatureAdapters => Self::FeatureAdapters { feature: feature()? },
            ToolName::GetFeatureConstitution => Self::FeatureConstitution,
            ToolName::GetDemoGuide => Self::DemoGuide,
            ToolName::CreateComponent => Self::CreateComponent {
                component_name: required_str(arguments, "componentName")?,
                description: required_str(arguments, "description")?,
                requirements: arguments
                    .get("requirements")
                    .and_then(Value::as_str)
                    .map(ToString::to_string),
            },
            ToolName::SearchFeatures => Self::SearchFeatures {
                query: required_str(arguments, "query")?,
            },
        })
    }
}

fn required_str(arguments: &Value, key: &'static str) -> Result<String, ToolParseError> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or(ToolParseError::MissingParameter(key))
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error result; the text is prefixed with `Error: `.
    #[must_use]
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!("Error: {message}"),
            }],
            is_error: true,
        }
    }

    /// The text of the first content item.
    #[must_use]
    pub fn first_text(&self) -> &str {
        self.content.first().map_or("", |c| match c {
            ToolContent::Text { text } => text,
        })
    }
}
