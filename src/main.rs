//! Pose Duel - motion-to-combat engine
//!
//! Replays a landmark feed into a single match. It handles:
//! - Pose model initialization (opening the feed gates the match)
//! - Frame pacing at the configured frame rate
//! - Snapshot output for the presentation layer

use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use pose_duel::config::Config;
use pose_duel::feed::{FeedMsg, GameEvent, LandmarkFeed, MatchMsg};
use pose_duel::game::{GameMatch, MatchHandle};
use pose_duel::util::time::{frame_duration, Timer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    let seed = config.match_seed.unwrap_or_else(rand::random);
    let match_id = Uuid::new_v4();
    info!("Starting Pose Duel");
    info!(%match_id, seed, feed = %config.frame_feed.display(), fps = config.target_fps, "Match configured");

    let (game_match, handle) = GameMatch::new(match_id, seed, config.snapshot_interval);
    let match_task = tokio::spawn(game_match.run());

    let presenter = tokio::spawn(present(handle.subscribe(), config.emit_snapshots));

    // Pose model initialization
    let feed = match LandmarkFeed::open(&config.frame_feed).await {
        Ok(feed) => feed,
        Err(e) => {
            error!(match_id = %handle.id, error = %e, "Pose model unavailable, match stays in loading");
            handle.model_failed(e.to_string()).await?;
            shutdown_signal().await;
            return Ok(());
        }
    };
    handle.model_ready().await?;

    tokio::select! {
        result = pump_frames(feed, &handle, &config) => {
            if let Err(e) = result {
                error!(error = %e, "Frame feed failed");
            }
        }
        _ = shutdown_signal() => {}
    }

    // Dropping the last handle stops the match task, which closes the presenter
    drop(handle);
    let _ = match_task.await;
    let _ = presenter.await;

    info!("Shutdown complete");
    Ok(())
}

/// Feed frames into the match at the configured rate
async fn pump_frames(
    mut feed: LandmarkFeed<tokio::fs::File>,
    handle: &MatchHandle,
    config: &Config,
) -> anyhow::Result<()> {
    let clock = Timer::new();
    let mut ticker = interval(frame_duration(config.target_fps));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frames = 0u64;
    while let Some(msg) = feed.next_msg().await? {
        match msg {
            FeedMsg::Restart => {
                info!("Restart requested by feed");
                handle.restart().await?;
            }
            frame => {
                ticker.tick().await;
                if let Some(input) = frame.into_frame(config.canvas, clock.elapsed_ms_f64()) {
                    handle.submit_frame(input).await?;
                    frames += 1;
                }
            }
        }
    }

    info!(match_id = %handle.id, frames, skipped = feed.skipped(), "Landmark feed exhausted");
    Ok(())
}

/// Log notifications and optionally print snapshots as JSON lines
async fn present(mut updates: broadcast::Receiver<MatchMsg>, emit_snapshots: bool) {
    loop {
        match updates.recv().await {
            Ok(msg) => {
                if let MatchMsg::Snapshot { events, .. } = &msg {
                    for event in events {
                        if let GameEvent::Notification { text } = event {
                            info!(%text, "Notification");
                        }
                    }
                }
                if let MatchMsg::MatchEnd { outcome, stats } = &msg {
                    info!(?outcome, frames = stats.frames_played, "Match ended");
                }
                if emit_snapshots {
                    match serde_json::to_string(&msg) {
                        Ok(line) => println!("{}", line),
                        Err(e) => warn!(error = %e, "Failed to serialize match update"),
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "Presenter lagged behind match updates");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
