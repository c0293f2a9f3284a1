use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Interface to bind (overrides DASHBOARD_HOST)")]
    pub host: Option<String>,

    #[arg(long, short, help = "Port to listen on (overrides DASHBOARD_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Backend API base URL (overrides BACKEND_API_URL)")]
    pub backend_url: Option<String>,
}

impl ServeArgs {
    /// Command-line flags win over the environment
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }
    }
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    args.apply(&mut config);

    tracing::info!(
        environment = ?config.environment,
        backend = %config.backend.base_url,
        policy = ?config.security.role_policy,
        "starting admin dashboard"
    );

    let bind_addr = config.bind_addr();
    let state = AppState::new(config)?;
    let app = crate::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("admin dashboard listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("admin dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
