//! Error types for feature-kit-mcp.
//!
//! Two families live here:
//!
//! - [`ConfigError`] covers loading the optional configuration file and is
//!   only ever seen at startup.
//! - [`FeatureError`] covers catalog lookups and content reads. These are
//!   rendered into `isError` tool content at the dispatch boundary and never
//!   terminate the process.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised while serving catalog content.
///
/// The messages are shown verbatim to the MCP client after an `Error: `
/// prefix, so they are phrased as guidance rather than diagnostics.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// No feature is registered under the requested slug.
    #[error("Feature '{slug}' not found. Use list_features to see available features.")]
    UnknownFeature {
        /// The slug that was requested.
        slug: String,
    },

    /// A required per-feature artefact (documentation, integration prompt) is absent.
    #[error("Feature '{feature}' does not have {artefact}")]
    MissingArtefact {
        /// Display name of the feature.
        feature: String,
        /// Human-readable description of the missing artefact.
        artefact: &'static str,
    },

    /// The feature's `components/` directory holds no source files.
    #[error("No component files found for feature '{feature}' in {}", dir.display())]
    NoComponentFiles {
        /// Display name of the feature.
        feature: String,
        /// The components directory that was inspected.
        dir: PathBuf,
    },

    /// One of the fixed guidance documents is missing.
    #[error("{document} not found at {}", path.display())]
    MissingDocument {
        /// Human-readable document title.
        document: &'static str,
        /// Where the document was expected.
        path: PathBuf,
    },

    /// A content file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}

/// Result type for catalog operations.
pub type FeatureResult<T> = Result<T, FeatureError>;
