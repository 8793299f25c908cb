//! Polyana Engine binary
//!
//! Wires configuration, state and the background scheduler together,
//! then parks until ctrl-c.

use polyana_engine::{print_banner, BackgroundTasks, Config, EngineState, Scheduler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    polyana_engine::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    print_banner();
    tracing::info!("Polyana engine starting...");

    // 2. Engine state (store, managers, seed data)
    let state = EngineState::initialize(&config).await?;
    tracing::info!(
        epoch = %state.epoch(),
        timezone = %config.venue_tz,
        "Engine state initialized"
    );

    // 3. Background cadences
    let mut tasks = BackgroundTasks::new();
    Scheduler::new(state.clone()).spawn_all(&mut tasks);
    tasks.log_summary();

    // 4. Park until shutdown is requested
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    tasks.shutdown().await;
    tracing::info!("Engine stopped");

    Ok(())
}
