//! Occlusion masks and translated-block placement.
//!
//! Everything here works in page-pixel space at the current zoom.  Padding
//! is expected to be pre-scaled (see [`LayoutConfig::at_zoom`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, MaskPadding};
use crate::types::{Anchor, BlockPlacement, Line, LineBounds, LineGeometry, Mask, Paragraph, Rect};

/// How translated blocks are positioned vertically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Every block keeps its paragraph's original y.  The page keeps its
    /// vertical rhythm; a translation that grows can overlap the next block.
    #[default]
    Absolute,
    /// Blocks stack in reading order.  Each block's top margin is the
    /// original gap to the previous paragraph, clamped to
    /// `0..=flow_gap_cap_factor * font_size`.
    Flow,
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementMode::Absolute => write!(f, "absolute"),
            PlacementMode::Flow => write!(f, "flow"),
        }
    }
}

impl FromStr for PlacementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(PlacementMode::Absolute),
            "flow" => Ok(PlacementMode::Flow),
            other => Err(format!("unknown placement mode '{other}' (expected absolute|flow)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Masks
// ---------------------------------------------------------------------------

fn padded(bounds: &Rect, page_width: f32, padding: &MaskPadding) -> Mask {
    let x = bounds.x - padding.left;
    let y = bounds.y - padding.vertical;
    let mut width = bounds.width + padding.left + padding.right;
    if page_width > 0.0 && x + width > page_width {
        width = (page_width - x).max(0.0);
    }
    Rect::new(x, y, width, bounds.height + 2.0 * padding.vertical)
}

/// One padded mask per non-table paragraph, in paragraph order.
///
/// The right edge is clamped to `page_width` so masks never spill past the
/// page.
pub fn paragraph_masks(paragraphs: &[Paragraph], page_width: f32, padding: &MaskPadding) -> Vec<Mask> {
    paragraphs
        .iter()
        .filter(|p| !p.is_table_row)
        .map(|p| padded(&p.bounds, page_width, padding))
        .collect()
}

/// One padded mask per table cell, in paragraph then cell order.
pub fn cell_masks(paragraphs: &[Paragraph], page_width: f32, padding: &MaskPadding) -> Vec<Mask> {
    paragraphs
        .iter()
        .filter(|p| p.is_table_row)
        .flat_map(|p| p.cells.iter().flatten())
        .map(|c| padded(&c.bounds, page_width, padding))
        .collect()
}

/// Line-level mode: a mask from the line's left edge to the right page edge
/// and the box replacement text is laid into.
pub fn line_geometry(line: &Line, page_width: f32, config: &LayoutConfig) -> Option<LineGeometry> {
    if line.is_empty() {
        return None;
    }
    let pad = config.line_mask_padding;
    let min_x = line.left();
    let min_y = line.top();
    let max_height = line.bottom() - min_y;

    let mask = Rect::new(
        min_x - pad,
        min_y - pad,
        page_width - min_x + pad,
        max_height + 2.0 * pad,
    );
    let bounds = LineBounds {
        text: line.text(),
        x: min_x,
        y: min_y,
        width: (page_width - min_x - config.right_margin).max(0.0),
        font_size: line.average_font_size(),
    };
    Some(LineGeometry { mask, bounds })
}

// ---------------------------------------------------------------------------
// Block placement
// ---------------------------------------------------------------------------

fn available_width(page_width: f32, x: f32, right_margin: f32) -> f32 {
    (page_width - x - right_margin).max(0.0)
}

/// Target boxes for translated paragraphs and table cells, in reading order.
///
/// Non-table paragraphs get `width = page_width - x - right_margin`.  Table
/// cells keep their own width so the columns stay aligned.  The vertical
/// anchor follows `config.placement`.
pub fn place_blocks(paragraphs: &[Paragraph], page_width: f32, config: &LayoutConfig) -> Vec<BlockPlacement> {
    let mut placements = Vec::new();
    let mut prev_bottom: Option<f32> = None;

    for (index, para) in paragraphs.iter().enumerate() {
        let anchor = match config.placement {
            PlacementMode::Absolute => Anchor::Absolute { y: para.bounds.y },
            PlacementMode::Flow => {
                let margin_top = match prev_bottom {
                    None => para.bounds.y.max(0.0),
                    Some(bottom) => {
                        let cap = config.flow_gap_cap_factor * para.style.font_size;
                        (para.bounds.y - bottom).clamp(0.0, cap.max(0.0))
                    }
                };
                Anchor::Flow { margin_top }
            }
        };
        prev_bottom = Some(para.bounds.bottom());

        match (&para.cells, para.is_table_row) {
            (Some(cells), true) => {
                for (cell_index, cell) in cells.iter().enumerate() {
                    let anchor = match (config.placement, anchor) {
                        (PlacementMode::Absolute, _) => Anchor::Absolute { y: cell.bounds.y },
                        (PlacementMode::Flow, a) => a,
                    };
                    placements.push(BlockPlacement {
                        paragraph_index: index,
                        cell_index: Some(cell_index),
                        x: cell.bounds.x,
                        width: cell.bounds.width,
                        anchor,
                        style: cell.style.clone(),
                        line_height: para.line_height,
                    });
                }
            }
            _ => placements.push(BlockPlacement {
                paragraph_index: index,
                cell_index: None,
                x: para.bounds.x,
                width: available_width(page_width, para.bounds.x, config.right_margin),
                anchor,
                style: para.style.clone(),
                line_height: para.line_height,
            }),
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TableCell, TextStyle};

    fn make_paragraph(x: f32, y: f32, width: f32, height: f32) -> Paragraph {
        Paragraph {
            lines: Vec::new(),
            text: "Some text.".to_string(),
            bounds: Rect::new(x, y, width, height),
            style: TextStyle {
                font_size: 12.0,
                font_family: "Times".to_string(),
                ..TextStyle::default()
            },
            is_list: false,
            is_table_row: false,
            cells: None,
            line_height: 1.2,
        }
    }

    fn make_row(y: f32) -> Paragraph {
        let cell = |x: f32| TableCell {
            text: "cell".to_string(),
            bounds: Rect::new(x, y, 40.0, 12.0),
            style: TextStyle::default(),
        };
        Paragraph {
            is_table_row: true,
            cells: Some(vec![cell(50.0), cell(200.0)]),
            ..make_paragraph(50.0, y, 190.0, 12.0)
        }
    }

    fn flow_config() -> LayoutConfig {
        LayoutConfig {
            placement: PlacementMode::Flow,
            ..LayoutConfig::default()
        }
    }

    // =====================================================================
    // masks
    // =====================================================================

    #[test]
    fn test_paragraph_mask_padding() {
        let paras = vec![make_paragraph(50.0, 100.0, 200.0, 30.0)];
        let masks = paragraph_masks(&paras, 600.0, &MaskPadding::default());
        assert_eq!(masks, vec![Rect::new(48.0, 96.0, 206.0, 38.0)]);
        assert!(masks[0].contains(&paras[0].bounds));
    }

    #[test]
    fn test_masks_skip_table_rows() {
        let paras = vec![make_paragraph(50.0, 100.0, 200.0, 30.0), make_row(140.0)];
        assert_eq!(paragraph_masks(&paras, 600.0, &MaskPadding::default()).len(), 1);
        assert_eq!(cell_masks(&paras, 600.0, &MaskPadding::default()).len(), 2);
    }

    #[test]
    fn test_mask_clamped_to_page_width() {
        let paras = vec![make_paragraph(500.0, 100.0, 99.0, 10.0)];
        let masks = paragraph_masks(&paras, 600.0, &MaskPadding::default());
        assert_eq!(masks[0].right(), 600.0);
    }

    #[test]
    fn test_mask_padding_scales_with_zoom() {
        let paras = vec![make_paragraph(50.0, 100.0, 200.0, 30.0)];
        let config = LayoutConfig::default().at_zoom(2.0).unwrap();
        let masks = paragraph_masks(&paras, 1200.0, &config.padding);
        assert_eq!(masks[0], Rect::new(46.0, 92.0, 212.0, 46.0));
    }

    #[test]
    fn test_line_geometry() {
        let line = Line::new(vec![crate::types::PositionedTextItem {
            text: "Hello".to_string(),
            x: 40.0,
            y: 100.0,
            width: 30.0,
            height: 12.0,
            font_size: 12.0,
            font_family: "Times".to_string(),
            font_weight: Default::default(),
            font_style: Default::default(),
            emphasis_confidence: 1.0,
        }]);
        let geometry = line_geometry(&line, 600.0, &LayoutConfig::default()).unwrap();
        assert_eq!(geometry.mask, Rect::new(34.0, 94.0, 566.0, 24.0));
        assert_eq!(geometry.bounds.width, 540.0);
        assert_eq!(geometry.bounds.text, "Hello");
        assert!(line_geometry(&Line::default(), 600.0, &LayoutConfig::default()).is_none());
    }

    // =====================================================================
    // place_blocks
    // =====================================================================

    #[test]
    fn test_absolute_preserves_vertical_rhythm() {
        let paras = vec![
            make_paragraph(50.0, 100.0, 200.0, 20.0),
            make_paragraph(50.0, 400.0, 200.0, 20.0),
        ];
        let placements = place_blocks(&paras, 600.0, &LayoutConfig::default());
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].anchor, Anchor::Absolute { y: 100.0 });
        assert_eq!(placements[1].anchor, Anchor::Absolute { y: 400.0 });
        assert_eq!(placements[0].width, 530.0);
        assert_eq!(placements[0].line_height, 1.2);
    }

    #[test]
    fn test_flow_compresses_excessive_gaps() {
        let paras = vec![
            make_paragraph(50.0, 100.0, 200.0, 20.0),
            // 280px gap, capped at 1.5 * 12 = 18.
            make_paragraph(50.0, 400.0, 200.0, 20.0),
            // 6px gap is kept as-is.
            make_paragraph(50.0, 426.0, 200.0, 20.0),
        ];
        let placements = place_blocks(&paras, 600.0, &flow_config());
        assert_eq!(placements[0].anchor, Anchor::Flow { margin_top: 100.0 });
        assert_eq!(placements[1].anchor, Anchor::Flow { margin_top: 18.0 });
        assert_eq!(placements[2].anchor, Anchor::Flow { margin_top: 6.0 });
    }

    #[test]
    fn test_flow_overlap_has_zero_margin() {
        let paras = vec![
            make_paragraph(50.0, 100.0, 200.0, 40.0),
            make_paragraph(300.0, 120.0, 200.0, 20.0),
        ];
        let placements = place_blocks(&paras, 600.0, &flow_config());
        assert_eq!(placements[1].anchor, Anchor::Flow { margin_top: 0.0 });
    }

    #[test]
    fn test_table_cells_get_own_placements() {
        let paras = vec![make_paragraph(50.0, 100.0, 200.0, 20.0), make_row(140.0)];
        let placements = place_blocks(&paras, 600.0, &LayoutConfig::default());
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[1].cell_index, Some(0));
        assert_eq!(placements[2].cell_index, Some(1));
        assert_eq!(placements[2].x, 200.0);
        assert_eq!(placements[2].width, 40.0);
        assert_eq!(placements[2].paragraph_index, 1);
    }

    #[test]
    fn test_width_never_negative() {
        let paras = vec![make_paragraph(590.0, 100.0, 5.0, 10.0)];
        let placements = place_blocks(&paras, 600.0, &LayoutConfig::default());
        assert_eq!(placements[0].width, 0.0);
    }

    #[test]
    fn test_placement_mode_parse() {
        assert_eq!("flow".parse::<PlacementMode>().unwrap(), PlacementMode::Flow);
        assert_eq!(" Absolute ".parse::<PlacementMode>().unwrap(), PlacementMode::Absolute);
        assert!("sideways".parse::<PlacementMode>().is_err());
    }
}
