//! Shared types for the order weight editor
//!
//! Data model of an order under edit, money and external-id helpers,
//! and the unified error/response types used by every crate.

pub mod error;
pub mod gid;
pub mod money;
pub mod order;

// Re-exports
pub use axum::Json;
pub use http;
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
