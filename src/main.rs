//! Huella CLI - carbon-footprint prediction server
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server (form page, `/predict`, `/health`)
//! - `check` - Load the artifacts, report schema width and rule drift, exit

use clap::{Parser, Subcommand};
use huella::{
    api::{create_router, AppState},
    artifacts::Artifacts,
    config::{ArtifactArgs, ServeArgs},
    error::{HuellaError, Result},
    model::{Aggregation, RegressionModel, TreeNode},
    reconcile::ReconcileRules,
    service::ServiceState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Huella - carbon-footprint prediction server
#[derive(Parser)]
#[command(name = "huella")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the prediction server
    ///
    /// Examples:
    ///   huella serve --artifacts ./artifacts
    ///   huella serve -p 8080 --unit-divisor 1000 --unit-label "t CO2e/year"
    Serve(ServeArgs),
    /// Validate artifacts and reconciliation rules without serving
    ///
    /// Examples:
    ///   huella check --artifacts ./artifacts
    Check(ArtifactArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await?,
        Commands::Check(args) => check(&args)?,
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let addr = args.socket_addr()?;
    let conversion = args.artifacts.conversion()?;

    let service = ServiceState::load(&args.artifacts.paths(), ReconcileRules::survey(), conversion);
    let ready = service.is_ready();
    let state = AppState::new(service, args.unit_label)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| HuellaError::Server(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, ready, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HuellaError::Server(format!("Server error: {e}")))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn check(args: &ArtifactArgs) -> Result<()> {
    args.conversion()?;
    let artifacts = Artifacts::load(&args.paths())?;
    let warnings = ReconcileRules::survey().validate(artifacts.schema());

    println!("Schema:   {} features", artifacts.schema().len());
    println!("Model:    {}", model_summary(artifacts.model()));
    if warnings.is_empty() {
        println!("Rules:    all reconciliation rules match the schema");
    } else {
        println!("Rules:    {} warning(s)", warnings.len());
        for warning in &warnings {
            println!("  - {warning}");
        }
    }

    Ok(())
}

/// One-line description of a loaded model for `check`
fn model_summary(model: &RegressionModel) -> String {
    match model {
        RegressionModel::Linear { coefficients, .. } => {
            format!("linear ({} coefficients)", coefficients.len())
        },
        RegressionModel::TreeEnsemble {
            aggregation, trees, ..
        } => {
            let combine = match aggregation {
                Aggregation::Mean => "mean",
                Aggregation::Sum => "boosted sum",
            };
            let depth = trees.iter().map(TreeNode::depth).max().unwrap_or(0);
            format!(
                "tree_ensemble ({} trees, {combine}, max depth {depth})",
                trees.len()
            )
        },
    }
}
