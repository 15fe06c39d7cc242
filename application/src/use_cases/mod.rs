//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod error_handler;
pub mod execute_tool;
pub mod orchestrator;
pub mod tool_execution_engine;
