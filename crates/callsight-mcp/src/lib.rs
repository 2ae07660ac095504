//! # Callsight MCP
//!
//! Model Context Protocol server for the Callsight pipeline. Exposes the
//! transcript store and the classification engine as MCP tools over stdio,
//! for use by an external LLM orchestrator.

pub mod error;
pub mod server;
pub mod service;

pub use error::{ServerError, ServerResult};
pub use server::CallsightServer;
pub use service::{AnalysisOutcome, AnalysisService, BatchItem, BatchOutcome};
