#![forbid(unsafe_code)]

//! `geoprompt` — chat-driven map assistant server.
//!
//! Turns natural-language prompts into executed capability calls and
//! client map actions: an LLM planner proposes intent steps, the
//! orchestrator runs each step's capability calls in order, pauses when a
//! result is ambiguous, and resumes once the user picks an option.

pub mod actions;
pub mod api;
pub mod capabilities;
pub mod config;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod planner;
pub mod registry;
pub mod stores;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
