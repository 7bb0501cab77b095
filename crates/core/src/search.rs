use std::collections::BTreeMap;

use serde::Serialize;

use layout::{DocumentText, PageText};

/// Plain text of a page: run texts joined by single spaces.
pub fn page_text(page: &PageText) -> String {
    page.items
        .iter()
        .map(|run| run.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive comparison of two single chars.  Chars whose lowercase
/// form spans several chars (`İ`) still count as one position.
fn same_char(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Char offsets (into `text` as given) of every case-insensitive occurrence
/// of `query`, overlapping matches included.  An empty query matches
/// nothing.
pub fn find_occurrences(text: &str, query: &str) -> Vec<usize> {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let haystack: Vec<char> = text.chars().collect();
    if haystack.len() < needle.len() {
        return Vec::new();
    }

    (0..=haystack.len() - needle.len())
        .filter(|&start| {
            haystack[start..start + needle.len()]
                .iter()
                .zip(&needle)
                .all(|(&a, &b)| same_char(a, b))
        })
        .collect()
}

/// A page with at least one hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMatches {
    pub page_number: usize,
    pub offsets: Vec<usize>,
}

/// Search every page, keyed by page number.  Pages without a hit are left
/// out.
pub fn search_document(document: &DocumentText, query: &str) -> BTreeMap<usize, Vec<usize>> {
    document
        .pages
        .iter()
        .filter_map(|page| {
            let offsets = find_occurrences(&page_text(page), query);
            (!offsets.is_empty()).then_some((page.page_number, offsets))
        })
        .collect()
}

/// Flattened form of [`search_document`] for display.
pub fn search_results(document: &DocumentText, query: &str) -> Vec<PageMatches> {
    search_document(document, query)
        .into_iter()
        .map(|(page_number, offsets)| PageMatches {
            page_number,
            offsets,
        })
        .collect()
}

/// Up to `radius` chars either side of a hit, for result listings.
pub fn snippet(text: &str, offset: usize, query_len: usize, radius: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = offset.saturating_sub(radius);
    let end = (offset + query_len + radius).min(chars.len());
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}
