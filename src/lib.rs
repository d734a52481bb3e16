//! feature-kit-mcp: MCP server for the Feature Kit component catalog
//!
//! Feature Kit is a catalog of UI features, each a directory holding
//! component sources, documentation, an integration prompt and optional
//! types, hooks and adapters. This crate indexes that directory tree and
//! serves it to AI coding assistants over the Model Context Protocol.
//!
//! The server is read-only: it never writes to the catalog, and the index is
//! built once per process.
//!
//! # Modules
//!
//! - [`catalog`] — Content root resolution, indexing and the shared registry
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`handlers`] — Catalog operations rendered as Markdown
//! - [`mcp`] — MCP protocol implementation

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mcp;
