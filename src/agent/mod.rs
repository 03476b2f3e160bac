//! Agent orchestration
//!
//! A bounded ReAct loop choosing among a small closed set of tools per user
//! turn, plus the tool set itself.

pub mod orchestrator;
pub mod tools;

pub use orchestrator::{AgentAnswer, Orchestrator, Step};
pub use tools::{ToolChoice, ToolOutput, ToolSet};
