use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use vct_onboarding::config::OnboardingConfig;
use vct_onboarding::driver::{ConsoleNavigator, Driver};
use vct_onboarding::gateway::{PlacementRouteState, create_gateway, placement_routes};
use vct_onboarding::store::{Database, LibSqlBackend};

#[derive(Parser, Debug)]
#[command(name = "vct-onboarding")]
#[command(about = "VCT career onboarding: milestone journey, intake form and placement")]
#[command(version)]
struct Cli {
    /// Runs the interactive onboarding driver when omitted
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the placement endpoints and the stored placement over HTTP
    Serve {
        /// Overrides ONBOARDING_PORT
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = OnboardingConfig::from_env().context("Invalid configuration")?;

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?,
    );

    match cli.command {
        Some(Command::Serve { port }) => {
            let port = port.unwrap_or(config.port);
            let app = placement_routes(PlacementRouteState { db });
            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
                .await
                .with_context(|| format!("Failed to bind port {port}"))?;
            tracing::info!(port, "Placement service started");
            axum::serve(listener, app).await?;
        }
        None => {
            eprintln!("VCT onboarding v{}", env!("CARGO_PKG_VERSION"));
            let gateway = create_gateway(&config)?;
            let mut driver = Driver::new(&config, gateway, db, Arc::new(ConsoleNavigator));
            driver.run(BufReader::new(tokio::io::stdin())).await?;
        }
    }

    Ok(())
}
