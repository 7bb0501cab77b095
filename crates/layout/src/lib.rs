//! Reading-structure reconstruction for positioned PDF text.
//!
//! Input is the flat run list an extractor produces for one page (text,
//! box, font metadata).  Output is the ordered paragraph list plus the
//! occlusion masks and target boxes an overlay renderer needs to draw
//! translated text over the original.
//!
//! ```text
//! TextRun[] --classify_font--> PositionedTextItem[]
//!           --group_into_lines--> Line[]
//!           --group_into_paragraphs--> Paragraph[]   (style, lists, table rows)
//!           --paragraph_masks / place_blocks--> Mask[], BlockPlacement[]
//! ```
//!
//! Every stage is synchronous and pure.  Degenerate input (no items, blank
//! runs) produces empty output, never an error.

use serde::Serialize;
use thiserror::Error;

use parser::table::{GapRowDetector, RowDetector};

pub mod bold;
pub mod config;
pub mod geometry;
pub mod parser;
pub mod style;
pub mod types;

pub use config::LayoutConfig;
pub use geometry::PlacementMode;
pub use types::*;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid page dump: {0}")]
    Input(String),
    #[error("invalid layout profile: {0}")]
    Profile(String),
    #[error("zoom must be a positive finite number, got {0}")]
    InvalidZoom(f32),
    #[error("page {page} not found (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Everything derived from one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub page_number: usize,
    pub page_width: f32,
    pub page_height: f32,
    pub line_count: usize,
    pub paragraphs: Vec<Paragraph>,
    pub masks: Vec<Mask>,
    pub cell_masks: Vec<Mask>,
    pub placements: Vec<BlockPlacement>,
}

/// Run the full pipeline on one page with the default table-row detector.
pub fn analyze_page(page: &PageText, config: &LayoutConfig) -> PageLayout {
    let detector = GapRowDetector::new(config.table);
    analyze_page_with(page, config, &detector)
}

/// Run the full pipeline with a caller-supplied table-row detector.
pub fn analyze_page_with(page: &PageText, config: &LayoutConfig, detector: &dyn RowDetector) -> PageLayout {
    let items = page.positioned_items();
    let lines = parser::layout::group_into_lines(&items, config);
    let line_count = lines.len();
    let paragraphs = parser::layout::group_into_paragraphs(lines, config, detector);

    let masks = geometry::paragraph_masks(&paragraphs, page.page_width, &config.padding);
    let cell_masks = geometry::cell_masks(&paragraphs, page.page_width, &config.padding);
    let placements = geometry::place_blocks(&paragraphs, page.page_width, config);

    PageLayout {
        page_number: page.page_number,
        page_width: page.page_width,
        page_height: page.page_height,
        line_count,
        paragraphs,
        masks,
        cell_masks,
        placements,
    }
}

/// Line-level geometry for every line of a page.
pub fn analyze_lines(page: &PageText, config: &LayoutConfig) -> Vec<LineGeometry> {
    let items = page.positioned_items();
    parser::layout::group_into_lines(&items, config)
        .iter()
        .filter_map(|line| geometry::line_geometry(line, page.page_width, config))
        .collect()
}
