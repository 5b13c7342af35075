// Headless bootstrap: telemetry setup plus a single local game instance,
// useful for soak-testing the simulation without a transport layer.

use std::io::Result;
use std::sync::Arc;

use crate::domain::area::AreaDefinition;
use crate::frameworks::config;
use crate::use_cases::GameRegistry;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Runs one local game instance until interrupted.
pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let registry = Arc::new(GameRegistry::new(config::default_settings()));
    let seed = config::demo_seed();
    let area = AreaDefinition::default();
    let roster = vec![("local-1".to_string(), "Drifter".to_string())];

    let handle = registry
        .create_game("local".to_string(), seed, &area, roster)
        .await
        .map_err(|error| std::io::Error::other(format!("failed to create game: {error:?}")))?;
    tracing::info!(seed, "local game running, ctrl-c to stop");

    let mut snapshots = handle.snapshot_tx.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = snapshots.recv() => {
                match update {
                    Ok(update) if update.tick % 300 == 0 => {
                        tracing::info!(
                            tick = update.tick,
                            level = update.level,
                            enemies = update.enemies.len(),
                            kills = update.total_kills,
                            "world status"
                        );
                    }
                    Ok(_) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                    // The loop ended on its own (game over).
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    registry.remove_game("local").await;
    Ok(())
}
