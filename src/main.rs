//! user-table - resilient user directory
//!
//! Main entry point.
//!
//! # Overview
//!
//! Runs one table session end to end:
//! - Configuration loading ([`ConfigManager`]) from `config/settings.yaml` and `USER_TABLE_*`
//! - Logging infrastructure (file rotation + console output)
//! - A single-threaded tokio runtime (all async work is interleaved, never parallel)
//! - One acquisition cycle: remote API first, bundled `data/users.json` on any failure
//!
//! The resulting rows are logged in the default order (id ascending). Rendering
//! them is left to whatever front end embeds the library.

use anyhow::{Context, Result, bail};
use user_table::models::Settings;
use user_table::{APP_NAME, AcquisitionResult, ConfigManager, UserTableSession, VERSION};

fn main() -> Result<()> {
    let config_manager = ConfigManager::new("config")?;
    let settings = config_manager.load_settings()?;

    // Held until exit so buffered log lines are flushed
    let _guard = user_table::logging::setup_logging(
        &settings.log_dir,
        "user-table",
        settings.debug_mode,
        true,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let result = runtime.block_on(run(settings));

    tracing::info!("Shutdown complete");
    result
}

async fn run(settings: Settings) -> Result<()> {
    let session = UserTableSession::from_settings(&settings)?;

    session
        .start()
        .await
        .context("Acquisition task terminated unexpectedly")?;

    match session.acquisition() {
        AcquisitionResult::Ready(_) => {}
        AcquisitionResult::Failed(message) => {
            tracing::error!("Error loading users: {}", message);
            session.state().metrics().log_summary();
            bail!("Error loading users: {}", message);
        }
        AcquisitionResult::Loading => bail!("Acquisition did not settle"),
    }

    if let Some(view) = session.view() {
        if view.is_empty() {
            tracing::info!("No users found");
        }
        for user in view.rows.iter() {
            tracing::info!(
                "{:>4}  {:<26} {:<18} {:<28} {:<24} {}",
                user.id,
                user.name,
                user.username,
                user.email,
                user.phone,
                user.company_name()
            );
        }
        tracing::info!("{}", view.summary());
    }

    session.state().metrics().log_summary();
    Ok(())
}
