//! Page records exchanged between the page loader and the query front ends.
//!
//! A record is what the loader reports once a page finished loading: its URL plus
//! the extracted head and body text. Records travel as JSON or JSON Lines.

use crate::engine::PageIndex;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    #[serde(default)]
    pub head: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub inserted: usize,
    pub duplicates: usize,
}

/// Read records from a `.jsonl` file, a `.json` file (object or array), or a
/// directory walked recursively in file-name order.
pub fn read_pages<P: AsRef<Path>>(path: P) -> Result<Vec<PageRecord>> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else {
        files.push(path.to_path_buf());
    }

    let mut pages = Vec::new();
    for file in files {
        if extension(&file) == Some("jsonl") {
            read_jsonl(&file, &mut pages)?;
        } else {
            read_json(&file, &mut pages)?;
        }
    }
    Ok(pages)
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn read_jsonl(file: &Path, pages: &mut Vec<PageRecord>) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let page = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid page record", file.display(), n + 1))?;
        pages.push(page);
    }
    Ok(())
}

fn read_json(file: &Path, pages: &mut Vec<PageRecord>) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("{}: invalid JSON", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                pages.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => pages.push(serde_json::from_value(json)?),
        _ => tracing::warn!(file = %file.display(), "ignoring JSON that is neither object nor array"),
    }
    Ok(())
}

/// Append one record as a JSON line.
pub fn write_page<W: Write>(writer: &mut W, page: &PageRecord) -> Result<()> {
    serde_json::to_writer(&mut *writer, page)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Report every record to the index as a page load.
pub fn ingest<I>(index: &PageIndex, pages: I) -> IngestStats
where
    I: IntoIterator<Item = PageRecord>,
{
    let mut stats = IngestStats::default();
    for page in pages {
        if index.on_page_loaded(&page.url, &page.head, &page.body).inserted {
            stats.inserted += 1;
        } else {
            stats.duplicates += 1;
        }
    }
    tracing::info!(inserted = stats.inserted, duplicates = stats.duplicates, "ingested pages");
    stats
}
