use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LayoutError;

// ---------------------------------------------------------------------------
// Font metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontWeight::Normal => write!(f, "normal"),
            FontWeight::Bold => write!(f, "bold"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontStyle::Normal => write!(f, "normal"),
            FontStyle::Italic => write!(f, "italic"),
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

/// Slack allowed when comparing float edges for containment.
const EDGE_EPSILON: f32 = 1e-3;

/// An axis-aligned rectangle in page-pixel space (y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns `true` when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EDGE_EPSILON
            && other.y >= self.y - EDGE_EPSILON
            && other.right() <= self.right() + EDGE_EPSILON
            && other.bottom() <= self.bottom() + EDGE_EPSILON
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Tight union of every rectangle, or `None` for an empty input.
    pub fn bounding(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }
}

/// Occlusion rectangle painted over original text before the overlay.
pub type Mask = Rect;

// ---------------------------------------------------------------------------
// Extractor input
// ---------------------------------------------------------------------------

fn full_confidence() -> f32 {
    1.0
}

/// One glyph run as extracted from the page, with style already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedTextItem {
    #[serde(alias = "str")]
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    #[serde(default)]
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    /// How much the weight/style verdict can be trusted (0..=1).
    #[serde(default = "full_confidence")]
    pub emphasis_confidence: f32,
}

impl PositionedTextItem {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// An item is usable when it carries visible text and finite geometry.
    pub fn is_well_formed(&self) -> bool {
        !self.text.trim().is_empty()
            && [self.x, self.y, self.width, self.height, self.font_size]
                .iter()
                .all(|v| v.is_finite())
            && self.font_size > 0.0
    }
}

/// A raw run as handed over by the PDF text extractor.  Weight and style
/// are optional: when absent they are inferred from the font name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(alias = "str")]
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    #[serde(default, alias = "fontName")]
    pub font_family: String,
    #[serde(default)]
    pub font_weight: Option<FontWeight>,
    #[serde(default)]
    pub font_style: Option<FontStyle>,
}

impl TextRun {
    /// Resolve the run into a [`PositionedTextItem`].
    ///
    /// Extractor-supplied weight/style win; missing values fall back to
    /// [`crate::bold::classify_font`].  Confidence is 1.0 only when both
    /// were supplied, otherwise it is the classifier's.
    pub fn into_item(self) -> PositionedTextItem {
        let detected = crate::bold::classify_font(&self.font_family, &self.text);

        let emphasis_confidence = match (self.font_weight, self.font_style) {
            (Some(_), Some(_)) => 1.0,
            _ => detected.confidence,
        };
        let font_weight = self.font_weight.unwrap_or(detected.weight);
        let font_style = self.font_style.unwrap_or(detected.style);

        PositionedTextItem {
            text: self.text,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            font_size: self.font_size,
            font_family: self.font_family,
            font_weight,
            font_style,
            emphasis_confidence,
        }
    }
}

fn first_page() -> usize {
    1
}

/// Everything the extractor produces for one rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    #[serde(default = "first_page")]
    pub page_number: usize,
    #[serde(default)]
    pub items: Vec<TextRun>,
    pub page_width: f32,
    pub page_height: f32,
}

impl PageText {
    /// Resolved, well-formed items.  Blank or non-finite runs are dropped so
    /// that downstream stages never see an empty paragraph.
    pub fn positioned_items(&self) -> Vec<PositionedTextItem> {
        self.items
            .iter()
            .cloned()
            .map(TextRun::into_item)
            .filter(PositionedTextItem::is_well_formed)
            .collect()
    }
}

/// A multi-page extractor dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentText {
    #[serde(default)]
    pub pages: Vec<PageText>,
}

impl DocumentText {
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(json).map_err(|e| LayoutError::Input(e.to_string()))
    }

    /// Look up a page by its 1-based page number.
    pub fn page(&self, page_number: usize) -> Result<&PageText, LayoutError> {
        self.pages
            .iter()
            .find(|p| p.page_number == page_number)
            .ok_or(LayoutError::PageOutOfRange {
                page: page_number,
                total: self.pages.len(),
            })
    }
}

// ---------------------------------------------------------------------------
// Reconstructed structure
// ---------------------------------------------------------------------------

/// Items judged to share one visual row, ordered left-to-right.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub items: Vec<PositionedTextItem>,
}

impl Line {
    pub fn new(mut items: Vec<PositionedTextItem>) -> Self {
        items.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { items }
    }

    /// Item texts joined by a single space, trimmed.
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(|i| i.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    pub fn top(&self) -> f32 {
        self.items.iter().map(|i| i.y).fold(f32::INFINITY, f32::min)
    }

    /// Top edge plus the tallest item's height.
    pub fn bottom(&self) -> f32 {
        let tallest = self
            .items
            .iter()
            .map(|i| i.height)
            .fold(f32::NEG_INFINITY, f32::max);
        self.top() + tallest
    }

    pub fn left(&self) -> f32 {
        self.items.iter().map(|i| i.x).fold(f32::INFINITY, f32::min)
    }

    pub fn average_font_size(&self) -> f32 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.items.iter().map(|i| i.font_size).sum::<f32>() / self.items.len() as f32
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(self.items.iter().map(PositionedTextItem::bounds))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Majority-vote style of a run of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f32,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub emphasis_confidence: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 0.0,
            font_family: "serif".to_string(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            emphasis_confidence: 0.0,
        }
    }
}

/// One cell of a table-row paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub text: String,
    #[serde(flatten)]
    pub bounds: Rect,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// A logical block of consecutive lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(skip)]
    pub lines: Vec<Line>,
    pub text: String,
    #[serde(flatten)]
    pub bounds: Rect,
    #[serde(flatten)]
    pub style: TextStyle,
    pub is_list: bool,
    pub is_table_row: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<TableCell>>,
    pub line_height: f32,
}

impl Paragraph {
    /// Every item of every member line, in line order.
    pub fn items(&self) -> impl Iterator<Item = &PositionedTextItem> {
        self.lines.iter().flat_map(|l| l.items.iter())
    }
}

/// Line-level geometry: a mask stretching to the right page edge plus the
/// box the replacement text is laid into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineGeometry {
    pub mask: Mask,
    pub bounds: LineBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBounds {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
}

/// Vertical positioning of a translated block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Anchor {
    /// Reuse the original absolute y.
    Absolute { y: f32 },
    /// Flow after the previous block with the given top margin.
    #[serde(rename_all = "camelCase")]
    Flow { margin_top: f32 },
}

/// Where and how one translated paragraph (or table cell) is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPlacement {
    pub paragraph_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_index: Option<usize>,
    pub x: f32,
    pub width: f32,
    pub anchor: Anchor,
    #[serde(flatten)]
    pub style: TextStyle,
    pub line_height: f32,
}
