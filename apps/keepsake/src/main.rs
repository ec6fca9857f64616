//! # Keepsake - Settings Inspector
//!
//! The main binary for the Keepsake widget-state persistence engine.
//!
//! This application inspects and edits persisted settings databases
//! produced through `keepsake_core::RedbStore`, outside a running UI:
//!
//! ```bash
//! # List persisted keys
//! keepsake -D app-settings.db keys
//!
//! # Read one entry
//! keepsake -D app-settings.db get mainWindow/fontSize
//!
//! # Write and remove entries
//! keepsake -D app-settings.db set mainWindow/fontSize 14 --kind int
//! keepsake -D app-settings.db remove mainWindow/_geometry
//! ```

use clap::Parser;
use keepsake::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — KEEPSAKE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("KEEPSAKE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "keepsake=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments and execute
    let cli = cli::Cli::parse();
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
