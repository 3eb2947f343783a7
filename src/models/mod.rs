//! Domain models: plans, capability results, items, map actions, chat
//! request/response shapes, and session messages.

pub mod action;
pub mod capability;
pub mod intent;
pub mod item;
pub mod message;
pub mod plan;
pub mod response;
