//! Front Conference PDFs
//!
//! Serves the speakers agreement form and PDF endpoint, or renders a single
//! agreement to disk with the `render` subcommand.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use agreement::config::DEFAULT_LOGO;
use agreement_server::{app, render_to_file, AppState};
use anyhow::Context;
use clap::{Parser, Subcommand};
use pdf_core::{VectorGraphic, VectorOptions};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for the server
#[derive(Parser, Debug)]
#[command(name = "front-pdfs")]
#[command(about = "Front Conference speakers agreement generator")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// SVG file used as header logo instead of the built-in one
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one agreement to a file and exit
    Render {
        /// JSON file with configuration overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output PDF path
        #[arg(long)]
        out: PathBuf,
    },
}

fn load_logo(path: Option<&PathBuf>) -> anyhow::Result<Arc<str>> {
    let markup: Arc<str> = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read logo {}", path.display()))?
            .into(),
        None => Arc::from(DEFAULT_LOGO),
    };

    VectorGraphic::parse(&markup, VectorOptions::default()).context("logo is not usable SVG")?;
    Ok(markup)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(load_logo(args.logo.as_ref())?);

    if let Some(Command::Render { config, out }) = args.command {
        let overrides = config
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))
            })
            .transpose()?;

        let pages = render_to_file(&state, overrides.as_deref(), &out)?;
        info!("Wrote {} ({} pages)", out.display(), pages);
        return Ok(());
    }

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
