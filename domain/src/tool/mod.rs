//! Tool domain module
//!
//! Defines what the agent may call and how calls are tracked:
//!
//! - [`ToolDescriptor`]: name, required permission tiers, confirmation flag
//! - [`ToolCatalog`]: ordered, exact-match registry built once at startup
//! - [`ToolCall`]: an invocation request with arguments
//! - [`AlternativeToolMatcher`]: keyword search used when a name is unknown
//! - [`Invocation`]: per-call state machine
//!
//! # Catalogue
//!
//! | Tool | Tier | Confirmation |
//! |------|------|:---:|
//! | `get_tasks` | ReadOnly | - |
//! | `create_task` | ModifyTasks | yes |
//! | `update_task` | ModifyTasks | yes |
//! | `delete_task` | ModifyTasks | yes |
//! | `start_timer` | TimerControl | - |
//! | `stop_timer` | TimerControl | - |
//! | `get_time_data` | ReadOnly | - |
//! | `analyze_productivity` | ReadOnly | - |

pub mod catalogue;
pub mod entities;
pub mod invocation;
pub mod matcher;

pub use entities::{ToolCall, ToolCatalog, ToolDescriptor, ToolParameter};
pub use invocation::{Invocation, InvocationState};
pub use matcher::{AlternativeSuggestion, AlternativeToolMatcher};
