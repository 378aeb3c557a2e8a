use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Add `http://` to addresses typed without a scheme, the way an address bar does.
pub fn complete_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(anyhow!("empty url"));
    }
    let lower = raw.to_ascii_lowercase();
    let full = if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("file:") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    Ok(Url::parse(&full)?)
}

/// Split a page into the text indexed for its head and for its body.
///
/// Head text is the title plus `description`/`keywords` meta content. Body text
/// is every text node under `<body>` outside script, style and noscript.
pub fn extract_sections(html: &str) -> (String, String) {
    let doc = Html::parse_document(html);
    let sel_title = Selector::parse("head title").expect("valid selector");
    let sel_meta = Selector::parse("head meta[name][content]").expect("valid selector");
    let sel_body = Selector::parse("body").expect("valid selector");

    let mut head: Vec<String> = doc
        .select(&sel_title)
        .map(|n| n.text().collect::<String>().trim().to_string())
        .collect();
    for meta in doc.select(&sel_meta) {
        let name = meta.value().attr("name").unwrap_or_default();
        if name.eq_ignore_ascii_case("description") || name.eq_ignore_ascii_case("keywords") {
            if let Some(content) = meta.value().attr("content") {
                head.push(content.trim().to_string());
            }
        }
    }
    head.retain(|s| !s.is_empty());

    let body = doc.select(&sel_body).next().map(visible_text).unwrap_or_default();
    (head.join(" "), body)
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| matches!(el.value().name(), "script" | "style" | "noscript"));
        let text = text.trim();
        if !hidden && !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join(" ")
}
