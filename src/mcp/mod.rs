//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the Feature Kit catalog as MCP tools and resources over stdio,
//! one JSON-RPC 2.0 message per line.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          MCP Server                          │
//! │                                                              │
//! │   ┌─────────────┐    ┌─────────────┐    ┌────────────────┐   │
//! │   │  Transport  │───▶│   Server    │───▶│ Tools          │   │
//! │   │   (stdio)   │    │ (lifecycle) │    │ Resources      │   │
//! │   └─────────────┘    └─────────────┘    └────────────────┘   │
//! │                                                 │            │
//! │                                                 ▼            │
//! │                                         ┌────────────────┐   │
//! │                                         │  FeatureKit    │   │
//! │                                         │  (catalog)     │   │
//! │                                         └────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::StdioTransport;
