use clap::Args;
use serde_json::json;

use crate::backend::BackendClient;
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Args, Debug, Default)]
pub struct PingArgs {
    #[arg(long, help = "Backend API base URL (overrides BACKEND_API_URL)")]
    pub backend_url: Option<String>,
}

/// Probe `GET /overview` and report whether the backend answers with a valid envelope
pub async fn handle(args: PingArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(url) = args.backend_url {
        config.backend.base_url = url;
    }

    let backend = BackendClient::new(&config.backend)?;
    let started = std::time::Instant::now();

    match backend.overview().await {
        Ok(stats) => output_success(
            &output_format,
            &format!("Backend {} is up", backend.base_url()),
            Some(json!({
                "backend": backend.base_url(),
                "latency_ms": started.elapsed().as_millis() as u64,
                "totals": {
                    "users": stats.total_users,
                    "projects": stats.total_projects,
                    "categories": stats.total_categories,
                    "profiles": stats.total_profiles,
                }
            })),
        ),
        Err(e) => {
            output_error(
                &output_format,
                &format!("Backend {} is down: {}", backend.base_url(), e),
                Some("BACKEND_UNAVAILABLE"),
            )?;
            anyhow::bail!("backend check failed")
        }
    }
}
