//! Order edit reconciliation engine
//!
//! # Modules
//!
//! - [`codec`] - reference/weight markers embedded in adjustment text
//! - [`classifier`] - originals vs. adjustments left by earlier sessions
//! - [`resolver`] - inferred weight and price per pound
//! - [`diff`] - operator edits → per-item deltas
//! - [`orchestrator`] - begin/apply/commit edit session
//! - [`service`] - the above wired to the platform collaborators
//!
//! Everything except the orchestrator and the service is a pure function
//! over its inputs.

pub mod classifier;
pub mod codec;
pub mod diff;
pub mod error;
pub mod orchestrator;
pub mod resolver;
pub mod service;

pub use classifier::{Classification, classify};
pub use diff::{apply_edits, diff};
pub use error::{Anomaly, ReconcileError, ReconcileResult};
pub use orchestrator::{EditSession, EditSessionOptions, SessionState};
pub use resolver::{Resolution, resolve};
pub use service::{OrderView, ReconcileService};
