//! keywatch-daemon: global hotkey recognition daemon
//!
//! Watches the system-wide keyboard feed and fires a configured action
//! exactly once each time a bound key combination becomes fully pressed,
//! regardless of which window has input focus.
//!
//! Scope:
//! - Spec-string compilation into normalized key sets
//! - Edge-triggered combo matching with anti-repeat
//! - Global keyboard hook on a dedicated thread
//! - Fired actions handed to the host over a channel; what the host does
//!   with them (screenshots, window moves, ...) lives elsewhere

mod action;
mod config;
mod hotkey;

use std::sync::Arc;

use anyhow::Result;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::hotkey::{GlobalListener, HotkeyEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "keywatch-daemon starting"
    );

    let config = Config::load();

    // Fired actions flow from the hook thread to this task
    let (action_tx, mut action_rx) = mpsc::channel(64);

    let engine = Arc::new(HotkeyEngine::new(action_tx));
    engine.rebuild(config.bindings());

    let listener = GlobalListener::new(Arc::clone(&engine));

    if config.disable_global {
        info!("global hotkeys disabled by configuration");
    } else {
        match listener.start() {
            Ok(()) => info!("global listener started"),
            Err(e) => {
                error!(?e, "failed to start global listener");
                warn!("continuing without global hotkeys - in-focus shortcuts are unaffected");
            }
        }
    }

    info!("daemon initialized, entering main loop");

    tokio::select! {
        // Hand fired actions to the host application
        _ = async {
            while let Some(fired) = action_rx.recv().await {
                info!(action = %fired.action, "action fired");
                match serde_json::to_string(&fired) {
                    Ok(json) => println!("{}", json),
                    Err(e) => warn!(?e, "failed to serialize fired action"),
                }
            }
        } => {
            info!("action channel closed");
        }

        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    info!("shutting down...");
    listener.stop();
    info!("keywatch-daemon stopped");

    Ok(())
}

/// Wait for SIGTERM or SIGINT.
async fn shutdown_signal() -> Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = sigint.recv() => info!("received SIGINT"),
    }

    Ok(())
}
