use anyhow::Context;
use serde::Deserialize;
use smol_str::SmolStr;
use std::io::Read;
use std::path::Path;
use url::Url;

use crate::file::FileEntry;

#[derive(Debug, Deserialize)]
struct EntryDto {
    name: SmolStr,
    url: Option<SmolStr>,
    size: Option<SmolStr>,
}

/// Resolves a link of a listing page against the page's base URL.
/// The base names a directory even without a trailing `/`. Links that do not resolve are kept as is.
pub fn resolve_url(base_url: &str, href: &str) -> SmolStr {
    let base = if base_url.ends_with('/') {
        Url::parse(base_url)
    } else {
        Url::parse(&format!("{base_url}/"))
    };
    match base.and_then(|base| base.join(href)) {
        Ok(url) => url.as_str().into(),
        Err(e) => {
            log::debug!("Cannot resolve {} against {}: {}", href, base_url, e);
            href.into()
        }
    }
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn between<'a>(s: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = s.find(start)? + start.len();
    let len = s[from..].find(end)?;
    Some(&s[from..from + len])
}

/// Extracts `(href, text, size)` from one table row or autoindex line.
fn parse_row(row: &str) -> Option<(String, String, String)> {
    let href = between(row, "href=\"", "\"")?;
    if href.is_empty() || href.ends_with('/') || href.starts_with('?') || href.starts_with('#') {
        return None;
    }
    let after_href = &row[row.find("href=\"")?..];
    let text = between(after_href, ">", "</a>").unwrap_or_default().trim();

    let size = match between(row, "class=\"size\"", "<") {
        Some(cell) => cell.trim_start_matches('>').trim(),
        // autoindex pages put the size last on the line, after the date
        None => row
            .rsplit("</a>")
            .next()
            .filter(|_| row.contains("</a>"))
            .and_then(|tail| tail.split_whitespace().last())
            .unwrap_or_default(),
    };
    let size = if size == "-" { "" } else { size };

    Some((unescape(href), unescape(text), unescape(size)))
}

/// Parses a mirror's HTML directory listing.
///
/// Rows are the `<tr>` elements of the listing table; pages without a table are read line by line.
/// Links to directories and to the parent directory are skipped.
pub fn parse_html(html: &str, base_url: &str) -> Vec<FileEntry> {
    let rows: Vec<&str> = if html.contains("<tr") {
        html.split("<tr").skip(1).collect()
    } else {
        html.lines().collect()
    };

    rows.into_iter()
        .filter_map(parse_row)
        .map(|(href, text, size)| {
            let name = if text.is_empty() {
                href.rsplit('/').next().unwrap_or_default().to_owned()
            } else {
                text
            };
            FileEntry::new(name, resolve_url(base_url, &href), size)
        })
        .collect()
}

/// Parses a YAML sequence of `{ name, url?, size? }`.
pub fn parse_yaml(yaml: &str, base_url: &str) -> anyhow::Result<Vec<FileEntry>> {
    let entries: Vec<EntryDto> =
        serde_yaml_ng::from_str(yaml).context("Failed to parse YAML listing")?;
    Ok(entries
        .into_iter()
        .map(|e| {
            let url = e.url.unwrap_or_else(|| resolve_url(base_url, &e.name));
            FileEntry {
                name: e.name,
                url,
                size: e.size.unwrap_or_default(),
            }
        })
        .collect())
}

/// Loads a saved listing. `-` reads from stdin.
pub fn load(path: &Path, base_url: &str) -> anyhow::Result<Vec<FileEntry>> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read listing from stdin")?;
        content
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read listing {}", path.display()))?
    };

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let entries = if is_yaml {
        parse_yaml(&content, base_url)?
    } else {
        parse_html(&content, base_url)
    };
    log::debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}
