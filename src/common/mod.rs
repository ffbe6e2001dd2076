//! Common types and utilities shared across tailstore.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants
//! - Error types
//! - Identifiers (Rid, SlotId)

pub mod config;
pub mod error;
mod rid;
mod slot_id;

pub use error::{Error, Result};
pub use rid::Rid;
pub use slot_id::SlotId;
