//! Hash-Chained Vote Ledger
//!
//! One vote per voter per election, each accepted vote sealed into an
//! append-only hash chain that can be replayed and verified independently.

pub mod auth;
pub mod chain;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, Result};
pub use ledger::{ChainStatus, VoteLedger};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the vote ledger with proper logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vote_ledger=info".into()),
        )
        .init();

    tracing::info!("🗳️  Vote ledger v{} initialized", VERSION);
    Ok(())
}
