//! Bold / italic classification from font names.
//!
//! PDFs rarely carry an explicit weight.  What they do carry is a font name
//! such as `Arial-BoldMT` or `TimesNewRomanPS-ItalicMT`, and this module
//! reads emphasis out of that string:
//!
//! 1. substring match on the lower-cased name (`bold`, `black`, `heavy` /
//!    `italic`, `oblique`);
//! 2. standalone tokens after splitting on `-` and `_` (`b`, `thick`, ...);
//! 3. for generic embedded names like `g_d0_f3` only: a content sniff on the
//!    run's text (short, no period, all-caps or a known header word).
//!
//! Step 3 is a best-effort guess with low confidence.  The confidence is
//! carried on every item and paragraph so consumers can ignore weak
//! emphasis.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::types::{FontStyle, FontWeight, PositionedTextItem};

const BOLD_SUBSTRINGS: &[&str] = &["bold", "black", "heavy"];
const ITALIC_SUBSTRINGS: &[&str] = &["italic", "oblique"];
const BOLD_TOKENS: &[&str] = &["bold", "black", "heavy", "thick", "b"];
const ITALIC_TOKENS: &[&str] = &["italic", "oblique", "slant", "i"];

const HEADER_KEYWORDS: &[&str] = &[
    "abstract",
    "introduction",
    "conclusion",
    "conclusions",
    "summary",
    "references",
    "contents",
    "appendix",
    "acknowledgements",
    "acknowledgments",
    "background",
    "methods",
    "results",
    "discussion",
];
const HEADER_PREFIXES: &[&str] = &["chapter ", "section ", "part ", "appendix "];

/// Runs longer than this are never sniffed as bold headers.
const CONTENT_SNIFF_MAX_CHARS: usize = 50;

const CONFIDENCE_SUBSTRING: f32 = 0.95;
const CONFIDENCE_TOKEN: f32 = 0.85;
const CONFIDENCE_DESCRIPTIVE: f32 = 0.6;
const CONFIDENCE_CONTENT: f32 = 0.35;

fn generic_font_pattern() -> &'static Regex {
    static RE_GENERIC: OnceLock<Regex> = OnceLock::new();
    RE_GENERIC.get_or_init(|| Regex::new(r"(?i)^g_d\d+_f\d+$").unwrap())
}

// ---------------------------------------------------------------------------
// Per-item classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    FontName,
    FontNameToken,
    ContentHeuristic,
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontClassification {
    pub weight: FontWeight,
    pub style: FontStyle,
    pub confidence: f32,
    pub method: DetectionMethod,
}

/// `true` for embedded subset names that say nothing about the face.
pub fn is_generic_font_name(font_name: &str) -> bool {
    let name = font_name.trim();
    name.is_empty() || generic_font_pattern().is_match(name)
}

fn tokens(lower: &str) -> impl Iterator<Item = &str> {
    lower.split(['-', '_', ',', '+']).filter(|t| !t.is_empty())
}

fn has_substring(lower: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| lower.contains(n))
}

fn has_token(lower: &str, wanted: &[&str]) -> bool {
    tokens(lower).any(|t| wanted.contains(&t))
}

/// Content sniff used only for generic font names.
pub fn looks_like_bold_header(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.chars().count() >= CONTENT_SNIFF_MAX_CHARS || text.contains('.') {
        return false;
    }

    let has_letters = text.chars().any(char::is_alphabetic);
    let all_caps = has_letters
        && text
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase);
    if all_caps {
        return true;
    }

    let lower = text.to_lowercase();
    let bare = lower.trim_end_matches(':');
    HEADER_KEYWORDS.contains(&bare) || HEADER_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Classify a single run from its font name (and, for generic names, its
/// text).  Never fails: no information resolves to normal with zero
/// confidence.
pub fn classify_font(font_name: &str, text: &str) -> FontClassification {
    let lower = font_name.trim().to_lowercase();

    let style = if has_substring(&lower, ITALIC_SUBSTRINGS) || has_token(&lower, ITALIC_TOKENS) {
        FontStyle::Italic
    } else {
        FontStyle::Normal
    };

    if has_substring(&lower, BOLD_SUBSTRINGS) {
        return FontClassification {
            weight: FontWeight::Bold,
            style,
            confidence: CONFIDENCE_SUBSTRING,
            method: DetectionMethod::FontName,
        };
    }

    if has_token(&lower, BOLD_TOKENS) {
        return FontClassification {
            weight: FontWeight::Bold,
            style,
            confidence: CONFIDENCE_TOKEN,
            method: DetectionMethod::FontNameToken,
        };
    }

    if is_generic_font_name(&lower) {
        if !lower.is_empty() && looks_like_bold_header(text) {
            return FontClassification {
                weight: FontWeight::Bold,
                style,
                confidence: CONFIDENCE_CONTENT,
                method: DetectionMethod::ContentHeuristic,
            };
        }
        return FontClassification {
            weight: FontWeight::Normal,
            style,
            confidence: 0.0,
            method: DetectionMethod::Undetermined,
        };
    }

    FontClassification {
        weight: FontWeight::Normal,
        style,
        confidence: CONFIDENCE_DESCRIPTIVE,
        method: DetectionMethod::FontName,
    }
}

// ---------------------------------------------------------------------------
// Aggregate diagnostics
// ---------------------------------------------------------------------------

/// Verdict of the aggregate bold test over a set of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoldTestResult {
    pub is_bold: bool,
    pub confidence: f32,
    pub font_name: String,
    pub detected_weight: FontWeight,
    pub method: DetectionMethod,
}

impl BoldTestResult {
    fn empty(font_name: &str) -> Self {
        Self {
            is_bold: false,
            confidence: 0.0,
            font_name: font_name.to_string(),
            detected_weight: FontWeight::Normal,
            method: DetectionMethod::FontName,
        }
    }
}

/// Bold verdict from the dominant `(font_family, weight)` pair of `items`.
///
/// `confidence` is the share of items carrying the dominant pair.  The
/// verdict is bold only when that pair is bold and covers more than half of
/// the items.
pub fn test_bold_from_font_info(items: &[PositionedTextItem]) -> BoldTestResult {
    if items.is_empty() {
        return BoldTestResult::empty("unknown");
    }

    let mut counts: Vec<((&str, FontWeight), usize)> = Vec::new();
    for item in items {
        let key = (item.font_family.as_str(), item.font_weight);
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }

    let mut dominant = counts[0];
    for entry in &counts[1..] {
        if entry.1 > dominant.1 {
            dominant = *entry;
        }
    }
    let ((family, weight), count) = dominant;

    BoldTestResult {
        is_bold: weight == FontWeight::Bold && count * 2 > items.len(),
        confidence: count as f32 / items.len() as f32,
        font_name: family.to_string(),
        detected_weight: weight,
        method: DetectionMethod::FontName,
    }
}

/// Run [`test_bold_from_font_info`] over the items whose text contains
/// `target` (case-insensitive).
pub fn check_text_bold_status(items: &[PositionedTextItem], target: &str) -> BoldTestResult {
    let needle = target.to_lowercase();
    let matching: Vec<PositionedTextItem> = items
        .iter()
        .filter(|i| i.text.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if matching.is_empty() {
        return BoldTestResult::empty("not-found");
    }
    test_bold_from_font_info(&matching)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(text: &str, family: &str, weight: FontWeight) -> PositionedTextItem {
        PositionedTextItem {
            text: text.to_string(),
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            font_size: 10.0,
            font_family: family.to_string(),
            font_weight: weight,
            font_style: FontStyle::Normal,
            emphasis_confidence: 1.0,
        }
    }

    // =====================================================================
    // classify_font
    // =====================================================================

    #[test]
    fn test_substring_detection() {
        let c = classify_font("Arial-BoldMT", "anything");
        assert_eq!(c.weight, FontWeight::Bold);
        assert_eq!(c.method, DetectionMethod::FontName);

        let c = classify_font("Helvetica-Black", "x");
        assert_eq!(c.weight, FontWeight::Bold);

        let c = classify_font("TimesNewRomanPS-ItalicMT", "x");
        assert_eq!(c.weight, FontWeight::Normal);
        assert_eq!(c.style, FontStyle::Italic);

        let c = classify_font("Courier-Oblique", "x");
        assert_eq!(c.style, FontStyle::Italic);
    }

    #[test]
    fn test_token_detection() {
        let c = classify_font("Minion-B", "x");
        assert_eq!(c.weight, FontWeight::Bold);
        assert_eq!(c.method, DetectionMethod::FontNameToken);

        let c = classify_font("Garamond_Thick", "x");
        assert_eq!(c.weight, FontWeight::Bold);

        let c = classify_font("ABCDEF+Minion-B", "x");
        assert_eq!(c.method, DetectionMethod::FontNameToken);

        let c = classify_font("Minion-I", "x");
        assert_eq!(c.style, FontStyle::Italic);
        assert_eq!(c.weight, FontWeight::Normal);
    }

    #[test]
    fn test_plain_descriptive_name_is_normal() {
        let c = classify_font("Helvetica", "INTRODUCTION");
        assert_eq!(c.weight, FontWeight::Normal);
        assert_eq!(c.style, FontStyle::Normal);
        assert_eq!(c.method, DetectionMethod::FontName);
        assert!(c.confidence > 0.5);
    }

    #[test]
    fn test_generic_name_uses_content_heuristic() {
        let c = classify_font("g_d0_f3", "INTRODUCTION");
        assert_eq!(c.weight, FontWeight::Bold);
        assert_eq!(c.method, DetectionMethod::ContentHeuristic);
        assert!(c.confidence < 0.5, "content sniffing must stay low-confidence");

        let c = classify_font("g_d12_f1", "Chapter 3");
        assert_eq!(c.weight, FontWeight::Bold);
    }

    #[test]
    fn test_generic_name_with_body_text_is_undetermined() {
        let c = classify_font("g_d0_f3", "This is ordinary body text.");
        assert_eq!(c.weight, FontWeight::Normal);
        assert_eq!(c.method, DetectionMethod::Undetermined);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn test_empty_name_never_sniffs() {
        let c = classify_font("", "INTRODUCTION");
        assert_eq!(c.weight, FontWeight::Normal);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn test_looks_like_bold_header() {
        assert!(looks_like_bold_header("RESULTS AND DISCUSSION"));
        assert!(looks_like_bold_header("Summary:"));
        assert!(!looks_like_bold_header("A.B.C"));
        assert!(!looks_like_bold_header("12345"));
        assert!(!looks_like_bold_header(&"A".repeat(50)));
        assert!(!looks_like_bold_header("just some words"));
    }

    // =====================================================================
    // test_bold_from_font_info / check_text_bold_status
    // =====================================================================

    #[test]
    fn test_bold_from_font_info_empty() {
        let result = test_bold_from_font_info(&[]);
        assert!(!result.is_bold);
        assert_eq!(result.font_name, "unknown");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_bold_from_font_info_majority() {
        let items = vec![
            make_item("a", "Times", FontWeight::Bold),
            make_item("b", "Times", FontWeight::Bold),
            make_item("c", "Times", FontWeight::Bold),
            make_item("d", "Times", FontWeight::Normal),
        ];
        let result = test_bold_from_font_info(&items);
        assert!(result.is_bold);
        assert_eq!(result.detected_weight, FontWeight::Bold);
        assert_eq!(result.font_name, "Times");
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn test_bold_from_font_info_tie_is_first_seen_and_not_bold() {
        let items = vec![
            make_item("a", "Times", FontWeight::Bold),
            make_item("b", "Times", FontWeight::Normal),
        ];
        let result = test_bold_from_font_info(&items);
        assert_eq!(result.detected_weight, FontWeight::Bold);
        assert!(!result.is_bold, "exactly half is not a majority");
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_check_text_bold_status_filters_case_insensitively() {
        let items = vec![
            make_item("Chapter One", "Georgia", FontWeight::Bold),
            make_item("chapter notes", "Georgia", FontWeight::Bold),
            make_item("body text", "Georgia", FontWeight::Normal),
        ];
        let result = check_text_bold_status(&items, "CHAPTER");
        assert!(result.is_bold);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_check_text_bold_status_not_found() {
        let items = vec![make_item("body", "Georgia", FontWeight::Normal)];
        let result = check_text_bold_status(&items, "missing");
        assert!(!result.is_bold);
        assert_eq!(result.font_name, "not-found");
        assert_eq!(result.confidence, 0.0);
    }
}
