use dxvoice_cli::{config, stdio};
use dxvoice_session::Session;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("DXVOICE_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration, cannot start without valid config");

    // stdout carries session updates, so logs go to stderr.
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let session = Session::new(config.session.clone())
        .expect("invalid session settings, check the [session] table in config");

    tracing::info!(
        session = %session.id(),
        base_url = %config.session.base_url,
        variant = ?config.session.variant,
        "starting dxvoice session"
    );

    let (event_tx, event_rx) = mpsc::channel(64);
    let (update_tx, update_rx) = mpsc::channel(64);

    let reader = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = stdio::read_events(stdin, event_tx).await {
            tracing::error!("failed to read events from stdin: {}", e);
        }
    });
    let writer = tokio::spawn(async move {
        if let Err(e) = stdio::write_updates(update_rx, tokio::io::stdout()).await {
            tracing::error!("failed to write updates to stdout: {}", e);
        }
    });

    tokio::select! {
        () = session.run(event_rx, update_tx) => {}
        () = shutdown_signal() => {}
    }

    reader.abort();
    if let Err(e) = writer.await {
        tracing::error!("update writer task failed: {}", e);
    }

    tracing::info!("dxvoice session shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, ending session"); }
        () = terminate => { tracing::info!("received SIGTERM, ending session"); }
    }
}
