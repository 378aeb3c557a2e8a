use crate::render_outcome;
use anyhow::Result;
use pagetrail_core::{PageIndex, ResultPanel, Syntax};
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  <query>                    run a query in the current syntax (`/all` lists every page)
  :prefix | :infix           switch query syntax
  :load <url> | <head> | <body>
                             report a loaded page
  :show <url>                words stored for a page
  :history                   pages in visit order
  :stats                     index sizes
  :help                      this text
  :quit";

/// Read commands line by line until `:quit` or end of input.
pub fn run<R: BufRead, W: Write>(index: &PageIndex, input: R, out: &mut W) -> Result<()> {
    let mut panel = ResultPanel::new();
    let mut syntax = Syntax::Prefix;
    writeln!(out, "{} pages indexed; query syntax: {syntax} (:help for commands)", index.len())?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() { continue; }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };
        match command {
            ":quit" | ":q" => break,
            ":help" => writeln!(out, "{HELP}")?,
            ":prefix" => {
                syntax = Syntax::Prefix;
                writeln!(out, "query syntax: {syntax}")?;
            }
            ":infix" => {
                syntax = Syntax::Infix;
                writeln!(out, "query syntax: {syntax}")?;
            }
            ":load" => {
                let mut parts = arg.splitn(3, '|').map(str::trim);
                match parts.next().filter(|u| !u.is_empty()) {
                    Some(url) => {
                        let head = parts.next().unwrap_or("");
                        let body = parts.next().unwrap_or("");
                        let reg = index.on_page_loaded(url, head, body);
                        let status = if reg.inserted { "indexed" } else { "already indexed" };
                        writeln!(out, "{status}: {url}")?;
                    }
                    None => writeln!(out, "usage: :load <url> | <head> | <body>")?,
                }
            }
            ":show" => match index.document(arg) {
                Some(doc) => writeln!(out, "{}", doc.summary())?,
                None => writeln!(out, "not indexed: {arg}")?,
            },
            ":history" => {
                for doc in index.history() {
                    writeln!(out, "{}\t{}", doc.visited_at, doc.url)?;
                }
            }
            ":stats" => {
                let stats = index.stats();
                writeln!(
                    out,
                    "documents: {}, head terms: {}, body terms: {}",
                    stats.documents, stats.head_terms, stats.body_terms
                )?;
            }
            _ => match panel.submit(index, syntax, line) {
                Ok(outcome) => render_outcome(out, outcome)?,
                Err(err) => {
                    writeln!(out, "syntax error: {err}")?;
                    if let Some(previous) = panel.current() {
                        writeln!(out, "(showing previous results)")?;
                        render_outcome(out, previous)?;
                    }
                }
            },
        }
    }
    Ok(())
}
