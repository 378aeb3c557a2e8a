use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use pagetrail_core::feed::{ingest, read_pages};
use pagetrail_core::{PageIndex, QueryOutcome, Syntax};
use std::io::{self, Write};
use tracing_subscriber::{fmt, EnvFilter};

mod repl;

#[derive(Parser)]
#[command(name = "pagetrail")]
#[command(about = "Query the pages you visited with boolean keyword queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query against the head and body indexes
    Query {
        /// Page records to index (JSON/JSONL file or directory)
        #[arg(long)]
        pages: String,
        /// Query syntax: prefix (`and(a,or(b,c))`) or infix (`a AND b OR c`)
        #[arg(long, default_value_t = Syntax::Prefix)]
        syntax: Syntax,
        /// Print the outcome as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Query text, or `/all` to list every page
        query: String,
    },
    /// List every indexed URL
    All {
        #[arg(long)]
        pages: String,
    },
    /// List URLs in the order they were loaded
    History {
        #[arg(long)]
        pages: String,
    },
    /// Show the head and body words stored for a URL
    Show {
        #[arg(long)]
        pages: String,
        #[arg(long)]
        url: String,
    },
    /// Interactive query prompt
    Repl {
        #[arg(long)]
        pages: Option<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Query { pages, syntax, json, query } => {
            let index = load_index(Some(&pages))?;
            let outcome = index.query(syntax, &query).map_err(|e| anyhow!("syntax error: {e}"))?;
            if json {
                serde_json::to_writer_pretty(&mut out, &outcome)?;
                writeln!(out)?;
            } else {
                render_outcome(&mut out, &outcome)?;
            }
        }
        Commands::All { pages } => {
            for url in load_index(Some(&pages))?.all_urls() {
                writeln!(out, "{url}")?;
            }
        }
        Commands::History { pages } => {
            for doc in load_index(Some(&pages))?.history() {
                writeln!(out, "{}\t{}", doc.visited_at, doc.url)?;
            }
        }
        Commands::Show { pages, url } => {
            let index = load_index(Some(&pages))?;
            let doc = index.document(&url).ok_or_else(|| anyhow!("{url} has not been indexed"))?;
            writeln!(out, "{}", doc.summary())?;
        }
        Commands::Repl { pages } => {
            let index = load_index(pages.as_deref())?;
            repl::run(&index, io::stdin().lock(), &mut out)?;
        }
    }
    Ok(())
}

fn load_index(pages: Option<&str>) -> Result<PageIndex> {
    let index = PageIndex::new();
    if let Some(path) = pages {
        let stats = ingest(&index, read_pages(path)?);
        tracing::info!(path, inserted = stats.inserted, duplicates = stats.duplicates, "loaded pages");
    }
    Ok(index)
}

pub(crate) fn render_outcome<W: Write>(out: &mut W, outcome: &QueryOutcome) -> io::Result<()> {
    match outcome {
        QueryOutcome::All { urls } => render_list(out, "All pages", urls),
        QueryOutcome::Matches { query, head, body } => {
            writeln!(out, "query: {query}")?;
            render_list(out, "Head matches", head)?;
            render_list(out, "Body matches", body)
        }
    }
}

fn render_list<W: Write>(out: &mut W, title: &str, urls: &[String]) -> io::Result<()> {
    writeln!(out, "[{title}: {}]", urls.len())?;
    for url in urls {
        writeln!(out, "  {url}")?;
    }
    Ok(())
}
