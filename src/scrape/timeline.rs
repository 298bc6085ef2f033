//! Page text and timeline table extraction.

use super::selector;
use crate::error::ExtractError;
use crate::timestamp::{parse_offset, DELIMITER};
use scraper::{Html, Node};

pub const DEFAULT_MARKER: &str =
    "A live webcast of this mission will begin about 15 minutes prior to liftoff";

const SKIPPED_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// All visible text of the document, one chunk per line.
///
/// Lines are trimmed and additionally split on runs of two spaces, which is
/// how cell and column boundaries usually survive flattening.
pub fn page_text(html: &Html) -> String {
    let mut raw = String::new();
    for node in html.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_TAGS.contains(&e.name()))
        });
        if !hidden {
            raw.push_str(text);
        }
    }

    raw.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop everything before the first occurrence of `marker`.
pub fn trim_to_marker<'a>(text: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return text;
    }
    match text.find(marker) {
        Some(pos) => &text[pos..],
        None => text,
    }
}

/// Rows of any table whose first cell is a relative time, as `TIME|EVENT` lines.
pub fn table_timeline(html: &Html) -> Result<Vec<String>, ExtractError> {
    let row_sel = selector("table tr")?;
    let cell_sel = selector("td, th")?;

    let mut lines = Vec::new();
    for row in html.select(&row_sel) {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|c| {
                c.text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        let Some((time, rest)) = cells.split_first() else {
            continue;
        };
        if parse_offset(time).is_none() {
            continue;
        }
        let event = rest
            .iter()
            .filter(|c| !c.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        if event.is_empty() {
            continue;
        }
        lines.push(format!("{time}{DELIMITER}{event}"));
    }
    Ok(lines)
}
