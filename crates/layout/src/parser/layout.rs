//! Line grouping and paragraph segmentation.
//!
//! This module turns the flat list of positioned runs of one page into
//! reading structure.  Both stages are pure single-pass sweeps: no
//! backtracking, no shared state, safe to re-run on every page or zoom
//! change.
//!
//! # Pipeline
//!
//! ```text
//! PositionedTextItem[]  ->  Line[]  ->  Paragraph[]
//!                     group_into_lines  group_into_paragraphs
//!                                       (style, list, table rows)
//! ```

use std::sync::OnceLock;

use regex::Regex;

use super::table::{build_table_row, RowDetector};
use crate::config::LayoutConfig;
use crate::style::aggregate_style;
use crate::types::{Line, Paragraph, PositionedTextItem, Rect};

// ---------------------------------------------------------------------------
// Line markers
// ---------------------------------------------------------------------------

fn numbered_pattern() -> &'static Regex {
    static RE_NUMBERED: OnceLock<Regex> = OnceLock::new();
    RE_NUMBERED.get_or_init(|| Regex::new(r"^\s*(\d+)[.)]\s+").unwrap())
}

fn bullet_pattern() -> &'static Regex {
    static RE_BULLET: OnceLock<Regex> = OnceLock::new();
    RE_BULLET.get_or_init(|| Regex::new(r"^\s*[•◦▪\-*·◊]\s+").unwrap())
}

/// Leading enumeration number of a line such as `"12. Foo"` or `"3) bar"`.
pub fn list_number(text: &str) -> Option<u64> {
    numbered_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

pub fn is_numbered_item(text: &str) -> bool {
    numbered_pattern().is_match(text)
}

pub fn is_bullet_item(text: &str) -> bool {
    bullet_pattern().is_match(text)
}

/// Short, period-free, non-blank lines are treated as section headers.
pub fn is_section_header(text: &str, config: &LayoutConfig) -> bool {
    text.chars().count() < config.header_max_chars
        && !text.contains('.')
        && !text.trim().is_empty()
}

/// `true` when at least `config.list_line_ratio` of the lines open with a
/// bullet or an enumeration marker.
pub fn is_list_paragraph(lines: &[Line], config: &LayoutConfig) -> bool {
    if lines.is_empty() {
        return false;
    }
    let marked = lines
        .iter()
        .map(Line::text)
        .filter(|t| is_numbered_item(t) || is_bullet_item(t))
        .count();
    marked as f32 / lines.len() as f32 >= config.list_line_ratio
}

// ---------------------------------------------------------------------------
// Public API: item -> line grouping
// ---------------------------------------------------------------------------

/// Group a page's items into horizontal lines.
///
/// Items are sorted by `(y, x)` and swept once.  The first item of each line
/// is its anchor: a later item joins the line when its y is within
/// `line_tolerance_factor` times the anchor's font size of the anchor's y.
/// Superscripts and other staggered glyphs inside that band merge into the
/// line; anything further away opens a new one.
pub fn group_into_lines(items: &[PositionedTextItem], config: &LayoutConfig) -> Vec<Line> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<PositionedTextItem> = items.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<PositionedTextItem> = Vec::new();
    let mut anchor_y = 0.0_f32;
    let mut anchor_font_size = 0.0_f32;

    for item in sorted {
        if current.is_empty() {
            anchor_y = item.y;
            anchor_font_size = item.font_size;
            current.push(item);
            continue;
        }

        let reference = if anchor_font_size > 0.0 {
            anchor_font_size
        } else {
            item.font_size
        };
        let tolerance = reference * config.line_tolerance_factor;

        if (item.y - anchor_y).abs() <= tolerance {
            current.push(item);
        } else {
            lines.push(Line::new(std::mem::take(&mut current)));
            anchor_y = item.y;
            anchor_font_size = item.font_size;
            current.push(item);
        }
    }

    if !current.is_empty() {
        lines.push(Line::new(current));
    }

    lines
}

// ---------------------------------------------------------------------------
// Public API: line -> paragraph grouping
// ---------------------------------------------------------------------------

/// Why a line opened a new paragraph.  Only the first matching signal is
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakReason {
    VerticalGap,
    SectionHeader,
    NumberRestart,
    Indent,
}

/// Decide whether `curr` starts a new paragraph after `prev`.
///
/// `open_number` is the enumeration number of the list item currently open
/// (if any).
pub fn paragraph_break(
    prev: &Line,
    curr: &Line,
    open_number: Option<u64>,
    config: &LayoutConfig,
) -> Option<BreakReason> {
    let font_size = curr.average_font_size();
    let text = curr.text();

    let gap = curr.top() - prev.bottom();
    if gap > font_size * config.paragraph_gap_factor {
        return Some(BreakReason::VerticalGap);
    }

    if is_section_header(&text, config) {
        return Some(BreakReason::SectionHeader);
    }

    if is_numbered_item(&text) && list_number(&text) != open_number {
        return Some(BreakReason::NumberRestart);
    }

    let x_diff = (curr.left() - prev.left()).abs();
    if x_diff > font_size * config.indent_factor {
        return Some(BreakReason::Indent);
    }

    None
}

/// Group consecutive lines into paragraphs.
///
/// A line opens a new paragraph when (first match wins) the vertical gap to
/// the previous line is large, it looks like a section header, it is an
/// enumerated item whose number differs from the open one, or its left
/// edge jumps by more than the indent threshold.  Lines accepted by
/// `detector` always become single-line table-row paragraphs.
pub fn group_into_paragraphs(
    lines: Vec<Line>,
    config: &LayoutConfig,
    detector: &dyn RowDetector,
) -> Vec<Paragraph> {
    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    let mut open_number: Option<u64> = None;

    for line in lines {
        if line.is_empty() {
            continue;
        }

        if detector.is_table_row(&line) {
            if !current.is_empty() {
                paragraphs.push(build_paragraph(std::mem::take(&mut current), config));
            }
            paragraphs.push(build_table_row(line, config));
            open_number = None;
            continue;
        }

        let number = list_number(&line.text());

        let Some(prev) = current.last() else {
            open_number = number;
            current.push(line);
            continue;
        };

        if paragraph_break(prev, &line, open_number, config).is_some() {
            paragraphs.push(build_paragraph(std::mem::take(&mut current), config));
            open_number = number;
        } else if number.is_some() {
            open_number = number;
        }

        current.push(line);
    }

    if !current.is_empty() {
        paragraphs.push(build_paragraph(current, config));
    }

    paragraphs
}

/// Assemble a [`Paragraph`] from a finished group of lines.
///
/// List paragraphs keep one line per row (`\n`), everything else is joined
/// with single spaces.  Geometry is the tight union of the member items and
/// style is the majority vote over them.
pub fn build_paragraph(lines: Vec<Line>, config: &LayoutConfig) -> Paragraph {
    let is_list = is_list_paragraph(&lines, config);
    let separator = if is_list { "\n" } else { " " };

    let text = lines
        .iter()
        .map(Line::text)
        .collect::<Vec<_>>()
        .join(separator);

    let items = lines.iter().flat_map(|l| l.items.iter());
    let bounds = Rect::bounding(items.clone().map(PositionedTextItem::bounds)).unwrap_or_default();
    let style = aggregate_style(items);

    Paragraph {
        lines,
        text,
        bounds,
        style,
        is_list,
        is_table_row: false,
        cells: None,
        line_height: config.line_height,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
