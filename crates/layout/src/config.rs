//! Tunable thresholds for layout reconstruction.
//!
//! Every heuristic reads its cut-off from [`LayoutConfig`] instead of an
//! inline literal.  The defaults are the constants below; a per-document
//! profile (JSON) may override any subset of them.

use serde::{Deserialize, Serialize};

use crate::geometry::PlacementMode;
use crate::LayoutError;

// ---------------------------------------------------------------------------
// Default constants
// ---------------------------------------------------------------------------

/// An item joins the open line when its y is within this fraction of the
/// line's reference font size.
pub const LINE_TOLERANCE_FACTOR: f32 = 0.5;

/// A vertical gap above this fraction of the current line's font size
/// starts a new paragraph.
pub const PARAGRAPH_GAP_FACTOR: f32 = 0.8;

/// A left-edge shift above this multiple of the font size is a new indent.
pub const INDENT_FACTOR: f32 = 2.0;

/// Lines shorter than this (and without a period) read as section headers.
pub const HEADER_MAX_CHARS: usize = 40;

/// Fraction of bullet/numbered lines needed to flag a paragraph as a list.
pub const LIST_LINE_RATIO: f32 = 0.6;

/// Uniform CSS-style line height for every rendered block.
pub const LINE_HEIGHT: f32 = 1.2;

pub const MASK_PADDING_VERTICAL: f32 = 4.0;
pub const MASK_PADDING_LEFT: f32 = 2.0;
pub const MASK_PADDING_RIGHT: f32 = 4.0;

/// Padding around line-level masks.
pub const LINE_MASK_PADDING: f32 = 6.0;

/// Space kept free at the right page edge for translated blocks.
pub const RIGHT_MARGIN: f32 = 20.0;

/// In flow placement the gap between blocks is capped at this multiple of
/// the block's font size.
pub const FLOW_GAP_CAP_FACTOR: f32 = 1.5;

/// Minimum number of items on a line before it can be a table row.
pub const TABLE_MIN_ITEMS: usize = 3;

/// Every gap between items of a table row must exceed this multiple of the
/// average glyph width.
pub const TABLE_GAP_FACTOR: f32 = 3.0;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Mask padding in page pixels at zoom 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaskPadding {
    pub vertical: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for MaskPadding {
    fn default() -> Self {
        Self {
            vertical: MASK_PADDING_VERTICAL,
            left: MASK_PADDING_LEFT,
            right: MASK_PADDING_RIGHT,
        }
    }
}

impl MaskPadding {
    pub fn scaled(&self, zoom: f32) -> Self {
        Self {
            vertical: self.vertical * zoom,
            left: self.left * zoom,
            right: self.right * zoom,
        }
    }
}

/// Tuning knobs for the default table-row detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableRowConfig {
    pub min_items: usize,
    pub gap_factor: f32,
}

impl Default for TableRowConfig {
    fn default() -> Self {
        Self {
            min_items: TABLE_MIN_ITEMS,
            gap_factor: TABLE_GAP_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub line_tolerance_factor: f32,
    pub paragraph_gap_factor: f32,
    pub indent_factor: f32,
    pub header_max_chars: usize,
    pub list_line_ratio: f32,
    pub line_height: f32,
    pub padding: MaskPadding,
    pub line_mask_padding: f32,
    pub right_margin: f32,
    pub flow_gap_cap_factor: f32,
    pub placement: PlacementMode,
    pub table: TableRowConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance_factor: LINE_TOLERANCE_FACTOR,
            paragraph_gap_factor: PARAGRAPH_GAP_FACTOR,
            indent_factor: INDENT_FACTOR,
            header_max_chars: HEADER_MAX_CHARS,
            list_line_ratio: LIST_LINE_RATIO,
            line_height: LINE_HEIGHT,
            padding: MaskPadding::default(),
            line_mask_padding: LINE_MASK_PADDING,
            right_margin: RIGHT_MARGIN,
            flow_gap_cap_factor: FLOW_GAP_CAP_FACTOR,
            placement: PlacementMode::default(),
            table: TableRowConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Parse a document profile.  Fields missing from the JSON keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(json).map_err(|e| LayoutError::Profile(e.to_string()))
    }

    /// Copy of this config with padding scaled for the given zoom factor.
    pub fn at_zoom(&self, zoom: f32) -> Result<Self, LayoutError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(LayoutError::InvalidZoom(zoom));
        }
        Ok(Self {
            padding: self.padding.scaled(zoom),
            line_mask_padding: self.line_mask_padding * zoom,
            ..self.clone()
        })
    }
}
