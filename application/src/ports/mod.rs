//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts the caller's adapters must implement.

pub mod confirmation;
pub mod execution_progress;
pub mod tool_adapter;
