mod app;
mod config;
mod guard;
mod handlers;
mod state;
mod storage;

use anyhow::Result;
use clap::Parser;
use launchkit_auth::{AuthConfig, AuthState};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::create_app, config::Config, state::AppState};

/// Port the mock IdP listens on in development.
#[cfg(feature = "auth-mock")]
const MOCK_IDP_PORT: u16 = 3001;

/// launchkit - Sign-in, user sync and route protection for a SaaS site
#[derive(Parser, Debug)]
#[command(name = "launchkit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "launchkit=debug,launchkit_auth=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let auth_config = AuthConfig::from_env()?;
    tracing::info!(
        provider_url = %auth_config.provider_url,
        base_url = %auth_config.base_url,
        oauth_provider = %auth_config.oauth_provider,
        "Loaded auth configuration"
    );

    #[cfg(feature = "auth-mock")]
    spawn_mock_idp();

    let auth = AuthState::new(auth_config)?;
    let state = AppState::new(&config, auth).await?;

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(feature = "auth-mock")]
fn spawn_mock_idp() {
    tracing::warn!("Using the mock identity provider, do not deploy this build");
    tokio::spawn(async {
        let server = launchkit_auth::mock_idp::MockIdpServer::new(MOCK_IDP_PORT);
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "Mock IdP server stopped");
        }
    });
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
