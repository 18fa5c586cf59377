//! Order edit data model
//!
//! - Types: the order as read from the platform (line items, variants,
//!   discount applications)
//! - Edit: what the reconciliation engine derives from it (resolved items,
//!   decoded adjustment records, deltas, session outcomes)

pub mod edit;
pub mod types;

// Re-exports
pub use edit::{
    AdjustmentKind, AdjustmentRecord, AppliedAction, AppliedEdit, EditDelta, EditOutcome,
    LineItemEdit, ResolvedLineItem, WeightSource,
};
pub use types::*;
