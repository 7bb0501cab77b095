//! Read-aloud support: the paragraph queue, highlight boxes and the text
//! handed to a speech engine.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use layout::{Paragraph, Rect};

/// Growth applied on every side of a paragraph box while it is spoken.
pub const HIGHLIGHT_PADDING: f32 = 4.0;

pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;
pub const DEFAULT_RATE: f32 = 1.0;

/// Clamp a speech rate to what speech engines accept.  Non-finite input
/// falls back to the default rate.
pub fn clamp_rate(rate: f32) -> f32 {
    if !rate.is_finite() {
        return DEFAULT_RATE;
    }
    rate.clamp(MIN_RATE, MAX_RATE)
}

pub fn highlight_rect(bounds: &Rect) -> Rect {
    Rect::new(
        bounds.x - HIGHLIGHT_PADDING,
        bounds.y - HIGHLIGHT_PADDING,
        bounds.width + 2.0 * HIGHLIGHT_PADDING,
        bounds.height + 2.0 * HIGHLIGHT_PADDING,
    )
}

// ---------------------------------------------------------------------------
// Speech text
// ---------------------------------------------------------------------------

/// Turn paragraph text into something a speech engine reads naturally.
///
/// Applies NFC normalization, ligature expansion, hyphenation repair across
/// line breaks, list-bullet removal, replacement-character removal and
/// whitespace collapsing.  Enumeration numbers are kept; they are spoken.
pub fn speech_text(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    for (ligature, replacement) in [
        ('\u{FB00}', "ff"),
        ('\u{FB01}', "fi"),
        ('\u{FB02}', "fl"),
        ('\u{FB03}', "ffi"),
        ('\u{FB04}', "ffl"),
    ] {
        result = result.replace(ligature, replacement);
    }

    static RE_HYPHEN: OnceLock<Regex> = OnceLock::new();
    let re_hyphen =
        RE_HYPHEN.get_or_init(|| Regex::new(r"(\p{Alphabetic})-\s*\n\s*(\p{Lowercase})").unwrap());
    result = re_hyphen.replace_all(&result, "$1$2").to_string();

    static RE_BULLET: OnceLock<Regex> = OnceLock::new();
    let re_bullet = RE_BULLET.get_or_init(|| Regex::new(r"(?m)^\s*[•◦▪●○■\-*·◊]\s+").unwrap());
    result = re_bullet.replace_all(&result, "").to_string();

    result = result.replace('\u{FFFD}', "");

    static RE_SPACE: OnceLock<Regex> = OnceLock::new();
    let re_space = RE_SPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_space.replace_all(&result, " ").trim().to_string()
}

// ---------------------------------------------------------------------------
// Reading queue
// ---------------------------------------------------------------------------

/// One paragraph as it will be spoken.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub paragraph_index: usize,
    pub text: String,
    pub highlight: Rect,
}

/// Paragraphs of one page, read in order.
///
/// `current` is `None` before reading starts and again after the last
/// paragraph finishes.
#[derive(Debug, Clone, Default)]
pub struct ReadingQueue {
    utterances: Vec<Utterance>,
    current: Option<usize>,
}

impl ReadingQueue {
    /// Queue every paragraph with speakable text.  Table rows are read cell
    /// by cell, separated by commas.
    pub fn new(paragraphs: &[Paragraph]) -> Self {
        let utterances = paragraphs
            .iter()
            .enumerate()
            .filter_map(|(paragraph_index, para)| {
                let raw = match &para.cells {
                    Some(cells) if para.is_table_row => cells
                        .iter()
                        .map(|c| c.text.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    _ => para.text.clone(),
                };
                let text = speech_text(&raw);
                (!text.is_empty()).then(|| Utterance {
                    paragraph_index,
                    text,
                    highlight: highlight_rect(&para.bounds),
                })
            })
            .collect();

        Self {
            utterances,
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn current(&self) -> Option<&Utterance> {
        self.current.and_then(|i| self.utterances.get(i))
    }

    /// Move to the next utterance.  From the idle state this starts at the
    /// first one; past the last one the queue goes back to idle.
    pub fn advance(&mut self) -> Option<&Utterance> {
        self.current = match self.current {
            None if !self.utterances.is_empty() => Some(0),
            Some(i) if i + 1 < self.utterances.len() => Some(i + 1),
            _ => None,
        };
        self.current()
    }

    /// Step back one utterance, staying on the first.
    pub fn back(&mut self) -> Option<&Utterance> {
        if let Some(i) = self.current {
            self.current = Some(i.saturating_sub(1));
        }
        self.current()
    }

    /// Jump to the utterance of a paragraph (e.g. the one the user clicked).
    pub fn seek(&mut self, paragraph_index: usize) -> Option<&Utterance> {
        let position = self
            .utterances
            .iter()
            .position(|u| u.paragraph_index == paragraph_index)?;
        self.current = Some(position);
        self.current()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
