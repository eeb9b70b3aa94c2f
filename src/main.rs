//! TripHub Console — admin realtime client
//!
//! Headless entry point that wires the REST gateways and the realtime
//! connection together, then pumps server events into the notification
//! and chat state machines until interrupted.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use triphub_api::{ApiClient, HttpChatGateway, HttpNotificationGateway};
use triphub_core::config::AppConfig;
use triphub_core::error::AppError;
use triphub_core::types::id::TripId;
use triphub_realtime::transport::WebSocketTransport;
use triphub_realtime::{
    feedback_channel, ChatService, ConnectionManager, DwellTimer, NotificationService, UiEvent,
};

#[derive(Debug, Parser)]
#[command(name = "triphub-console", about = "TripHub admin realtime console")]
struct Args {
    /// Configuration environment (selects config/<env>.toml).
    #[arg(long, default_value = "development")]
    env: String,

    /// Admin bearer token. Falls back to the TRIPHUB_TOKEN variable.
    #[arg(long)]
    token: Option<String>,

    /// Community trip room to open alongside the admin room.
    #[arg(long)]
    trip_id: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, args).await {
        tracing::error!("Console error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig, args: Args) -> Result<(), AppError> {
    tracing::info!("Starting TripHub console v{}", env!("CARGO_PKG_VERSION"));

    let token = args
        .token
        .or_else(|| std::env::var("TRIPHUB_TOKEN").ok())
        .ok_or_else(|| {
            AppError::configuration("No admin token: pass --token or set TRIPHUB_TOKEN")
        })?;

    // ── REST gateways ────────────────────────────────────────────
    let api = ApiClient::new(&config.api, token.clone())?;
    let notification_gateway = Arc::new(HttpNotificationGateway::new(api.clone()));
    let chat_gateway = Arc::new(HttpChatGateway::new(api));

    // ── Realtime connection ──────────────────────────────────────
    let transport = Arc::new(WebSocketTransport::new(&config.realtime));
    let manager = Arc::new(ConnectionManager::new(&config.realtime, transport));
    let mut events = manager
        .take_events()
        .ok_or_else(|| AppError::internal("Event stream already taken"))?;

    let (feedback, mut toasts) = feedback_channel(32);

    let notifications = Arc::new(NotificationService::new(
        notification_gateway,
        feedback.clone(),
    ));
    let chat = args.trip_id.as_deref().map(|trip_id| {
        Arc::new(ChatService::new(
            TripId::new(trip_id),
            &config.realtime,
            chat_gateway,
            Arc::clone(&manager),
            feedback.clone(),
        ))
    });

    manager.connect(Some(&token)).await;

    // ── Initial state ────────────────────────────────────────────
    notifications.refresh().await?;
    tracing::info!(
        unread = notifications.unread_count(),
        favorites = notifications.favorite_count(),
        "Notifications loaded"
    );

    if let Some(chat) = &chat {
        chat.join_room().await?;
        chat.refresh().await?;
        tracing::info!(
            trip_id = %args.trip_id.as_deref().unwrap_or_default(),
            messages = chat.transcript().len(),
            "Trip transcript loaded"
        );
    }

    // The list is "on screen" for the lifetime of the console, so the
    // auto-read dwell starts counting immediately.
    let dwell = DwellTimer::new(Duration::from_millis(config.realtime.auto_read_dwell_ms));
    dwell.view_activated(Arc::clone(&notifications));

    // ── Event pump ───────────────────────────────────────────────
    loop {
        tokio::select! {
            _ = shutdown_signal() => {
                tracing::info!("Shutdown signal received, disconnecting...");
                break;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::warn!("Event stream closed");
                    break;
                };
                notifications.apply_event(&event);
                if let Some(chat) = &chat {
                    chat.apply_event(&event);
                }
            }
            toast = toasts.recv() => {
                if let Some(UiEvent::Error { context, message }) = toast {
                    tracing::warn!(context = %context, "{}", message);
                }
            }
        }
    }

    dwell.view_deactivated();
    manager.disconnect().await;
    tracing::info!("TripHub console shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
