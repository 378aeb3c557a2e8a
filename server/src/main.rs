use anyhow::Result;
use axum::Router;
use clap::Parser;
use pagetrail_core::feed::{ingest, read_pages};
use pagetrail_core::PageIndex;
use pagetrail_server::build_app;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Page records to index at startup (JSON/JSONL file or directory)
    #[arg(long)]
    pages: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let index = Arc::new(PageIndex::new());
    if let Some(path) = &args.pages {
        ingest(&index, read_pages(path)?);
    }
    let app: Router = build_app(index);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
