//! # Relayer Processor
//!
//! Startup check for the bridge relayer message processor.
//!
//! Loads `.env`, builds the processor config from the environment, logs a
//! redacted summary and opens the database and queue once to verify they are
//! reachable.
//!
//! ## Usage
//!
//! ```bash
//! cargo run
//! ```

use std::sync::Arc;

use color_eyre::{eyre::WrapErr, Result};
use dotenvy::dotenv;
use log::info;

use relayer_processor::{config::ProcessorConfig, logging::setup_logging, services::open_resources};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error reporting with eyre
    color_eyre::install().wrap_err("Failed to initialize error reporting")?;

    dotenv().ok();
    setup_logging().wrap_err("Failed to initialize logging")?;

    let config = Arc::new(ProcessorConfig::from_env().wrap_err("Failed to load processor config")?);
    config.log_summary();

    let (database, queue) = open_resources(&config.database, &config.queue)
        .await
        .wrap_err("Failed to open processor resources")?;

    database.ping().await.wrap_err("Database ping failed")?;
    queue.ping().await.wrap_err("Queue ping failed")?;
    info!(
        "Processor resources ready (queue prefetch {})",
        queue.prefetch_count()
    );

    database.close().await;
    Ok(())
}
