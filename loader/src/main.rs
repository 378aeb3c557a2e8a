use anyhow::{anyhow, Context, Result};
use clap::Parser;
use pagetrail_core::feed::{write_page, PageRecord};
use reqwest::{header, Client};
use std::collections::{HashSet, VecDeque};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

mod extract;

use extract::{complete_url, extract_sections};

const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "pagetrail-loader")]
#[command(about = "Load pages and report their head and body text as page records")]
struct Cli {
    /// File with URLs to load (one per line, `#` starts a comment)
    #[arg(long)]
    urls: String,
    /// Output JSONL file; records are appended
    #[arg(long, default_value = "./pages.jsonl")]
    output: String,
    /// Number of pages loaded at once
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent header sent with every request
    #[arg(long, default_value = "pagetrail-loader/0.1")]
    user_agent: String,
    /// Also report each page to a running pagetrail server, e.g. http://localhost:8080
    #[arg(long)]
    post_to: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let mut pending: VecDeque<Url> = VecDeque::new();
    let mut seen: HashSet<String> = HashSet::new();
    for line in BufReader::new(File::open(&args.urls)?).lines() {
        let s = line?.trim().to_string();
        if s.is_empty() || s.starts_with('#') { continue; }
        match complete_url(&s) {
            Ok(u) if seen.insert(u.to_string()) => pending.push_back(u),
            Ok(_) => {}
            Err(err) => tracing::warn!(url = %s, %err, "skipping malformed url"),
        }
    }
    if pending.is_empty() { return Err(anyhow!("no valid urls in {}", args.urls)); }
    tracing::info!(urls = pending.len(), concurrency = args.concurrency, output = %args.output, "loading pages");

    let mut out = open_output(Path::new(&args.output))?;
    let mut tasks: JoinSet<Result<PageRecord>> = JoinSet::new();
    let mut loaded = 0usize;
    let mut failed = 0usize;

    loop {
        while tasks.len() < args.concurrency.max(1) {
            let Some(url) = pending.pop_front() else { break };
            let client = client.clone();
            tasks.spawn(async move { load_page(&client, url).await });
        }
        let Some(joined) = tasks.join_next().await else { break };
        let page = match joined {
            Ok(Ok(page)) => page,
            Ok(Err(err)) => {
                failed += 1;
                tracing::warn!(%err, "page not loaded");
                continue;
            }
            Err(err) => {
                failed += 1;
                tracing::warn!(%err, "load task failed");
                continue;
            }
        };

        write_page(&mut out, &page)?;
        loaded += 1;
        if let Some(base) = &args.post_to {
            if let Err(err) = report_page(&client, base, &page).await {
                tracing::warn!(url = %page.url, %err, "could not report page to server");
            }
        }
    }
    out.flush()?;

    tracing::info!(loaded, failed, output = %args.output, "done");
    Ok(())
}

/// Open the JSONL output for appending, creating missing parent directories.
fn open_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening output file {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Fetch one page and extract its sections. Non-HTML and oversized pages are errors.
async fn load_page(client: &Client, url: Url) -> Result<PageRecord> {
    if url.scheme() == "file" {
        let path = url.to_file_path().map_err(|_| anyhow!("{url} is not a local path"))?;
        let html = tokio::fs::read_to_string(&path).await?;
        let (head, body) = extract_sections(&html);
        return Ok(PageRecord { url: url.to_string(), head, body });
    }

    let resp = client.get(url.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(anyhow!("{url}: status {}", resp.status()));
    }
    if let Some(ct) = resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        if !ct.starts_with("text/html") {
            return Err(anyhow!("{url}: not html ({ct})"));
        }
    }
    // report where the page ended up after redirects
    let location = resp.url().to_string();
    let bytes = resp.bytes().await?;
    if bytes.len() > MAX_PAGE_BYTES {
        return Err(anyhow!("{url}: page larger than {MAX_PAGE_BYTES} bytes"));
    }
    let html = String::from_utf8_lossy(&bytes);
    let (head, body) = extract_sections(&html);
    tracing::debug!(url = %location, head_len = head.len(), body_len = body.len(), "page loaded");
    Ok(PageRecord { url: location, head, body })
}

async fn report_page(client: &Client, base: &str, page: &PageRecord) -> Result<()> {
    let endpoint = format!("{}/pages", base.trim_end_matches('/'));
    client.post(endpoint).json(page).send().await?.error_for_status()?;
    Ok(())
}
