//! Edit Server - order weight edit service
//!
//! Lets an operator correct the billed weight of per-pound items on a
//! placed order. The reconciliation engine infers weight and price per
//! pound from the order, diffs the operator's edits, and replays them as an
//! order-edit session on the commerce platform.
//!
//! ```text
//! edit-server/src/
//! ├── core/       # config, state, server
//! ├── reconcile/  # codec, classifier, resolver, diff, orchestrator
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # logging, error re-exports
//! ```

pub mod api;
pub mod core;
pub mod reconcile;
pub mod utils;

pub use crate::core::{Config, Server, ServerError, ServerState};
pub use reconcile::{EditSessionOptions, ReconcileError, ReconcileService};
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Load `.env`, read the configuration and start logging
pub fn setup_environment() -> crate::core::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );

    Ok(config)
}
