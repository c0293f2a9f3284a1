pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "admin-dashboard")]
#[command(about = "Admin dashboard for projects, categories and profiles")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format instead of text")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the dashboard web server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Check that the backend API is reachable")]
    Ping(commands::ping::PingArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        Some(Commands::Ping(args)) => commands::ping::handle(args, output_format).await,
    }
}
