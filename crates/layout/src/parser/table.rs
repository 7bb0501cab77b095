use super::layout::build_paragraph;
use crate::config::{LayoutConfig, TableRowConfig};
use crate::style::aggregate_style;
use crate::types::{Line, Paragraph, PositionedTextItem, Rect, TableCell};

// ---------------------------------------------------------------------------
// Row detection seam
// ---------------------------------------------------------------------------

/// Decides whether a grouped line is one row of a table.
///
/// Segmentation calls this for every line; lines it accepts become
/// single-line, cell-split paragraphs and are never merged with their
/// neighbours.
pub trait RowDetector {
    fn is_table_row(&self, line: &Line) -> bool;
}

impl<F> RowDetector for F
where
    F: Fn(&Line) -> bool,
{
    fn is_table_row(&self, line: &Line) -> bool {
        self(line)
    }
}

/// Detector that never reports a table row.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTables;

impl RowDetector for NoTables {
    fn is_table_row(&self, _line: &Line) -> bool {
        false
    }
}

/// Default detector: a line is a row when it has enough items and every
/// horizontal gap between neighbours is wide compared to the glyph width.
///
/// Ordinary prose has word gaps of roughly one space; columns of a table
/// are separated by several.
#[derive(Debug, Clone, Copy, Default)]
pub struct GapRowDetector {
    pub config: TableRowConfig,
}

impl GapRowDetector {
    pub fn new(config: TableRowConfig) -> Self {
        Self { config }
    }
}

impl RowDetector for GapRowDetector {
    fn is_table_row(&self, line: &Line) -> bool {
        if line.items.len() < self.config.min_items.max(2) {
            return false;
        }
        let threshold = average_glyph_width(&line.items) * self.config.gap_factor;
        if threshold <= 0.0 {
            return false;
        }
        line.items
            .windows(2)
            .all(|pair| pair[1].x - pair[0].right() > threshold)
    }
}

/// Total item width divided by total character count.
pub fn average_glyph_width(items: &[PositionedTextItem]) -> f32 {
    let chars: usize = items.iter().map(|i| i.text.chars().count()).sum();
    if chars == 0 {
        return 0.0;
    }
    let width: f32 = items.iter().map(|i| i.width).sum();
    width / chars as f32
}

// ---------------------------------------------------------------------------
// Cell splitting
// ---------------------------------------------------------------------------

/// Cluster a row's items into cells, left to right.  A gap wider than
/// `threshold` closes the current cell.
pub fn split_cells(items: &[PositionedTextItem], threshold: f32) -> Vec<TableCell> {
    let mut sorted: Vec<&PositionedTextItem> = items.iter().collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut groups: Vec<Vec<&PositionedTextItem>> = Vec::new();
    for item in sorted {
        match groups.last_mut() {
            Some(group)
                if group
                    .last()
                    .map(|prev| item.x - prev.right() <= threshold)
                    .unwrap_or(false) =>
            {
                group.push(item);
            }
            _ => groups.push(vec![item]),
        }
    }

    groups.into_iter().map(build_cell).collect()
}

fn build_cell(items: Vec<&PositionedTextItem>) -> TableCell {
    let text = items
        .iter()
        .map(|i| i.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    let bounds = Rect::bounding(items.iter().map(|i| i.bounds())).unwrap_or_default();
    let style = aggregate_style(items.iter().copied());
    TableCell {
        text,
        bounds,
        style,
    }
}

/// Turn an accepted table-row line into a paragraph with per-cell text,
/// geometry and style.  The paragraph text joins the cells with ` | `.
pub fn build_table_row(line: Line, config: &LayoutConfig) -> Paragraph {
    let threshold = average_glyph_width(&line.items) * config.table.gap_factor;
    let cells = split_cells(&line.items, threshold);

    let mut paragraph = build_paragraph(vec![line], config);
    paragraph.text = cells
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    paragraph.is_list = false;
    paragraph.is_table_row = true;
    paragraph.cells = Some(cells);
    paragraph
}
