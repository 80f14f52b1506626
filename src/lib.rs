//! Deterministic context assembly for LLM prompts.
//!
//! `context-assembly` discovers documentation files under glob patterns,
//! resolves documents sharded across many files (with or without an index),
//! validates every path against a project boundary, trims content to a token
//! budget at line boundaries, and orders the result from general background
//! to task-specific content. Identical filesystem state and configuration
//! always produce a byte-identical payload.
//!
//! The engine is synchronous and keeps no state between passes; run separate
//! [`assembly::ContextAssembler`] instances to assemble payloads in parallel.
//! Logging goes through `tracing`; installing a subscriber is up to the caller.

pub mod assembly;
pub mod discovery;
pub mod document;
pub mod ordering;
pub mod security;
pub mod selection;
pub mod sharding;
pub mod types;

pub use assembly::{ContextAssembler, Section};
pub use security::{ProjectBoundary, SecurityError};
pub use types::{ContextError, ContextPayload, PayloadEntry};
