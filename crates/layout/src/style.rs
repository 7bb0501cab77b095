//! Majority-vote style aggregation over a group of items.

use crate::types::{FontStyle, FontWeight, PositionedTextItem, TextStyle};

/// Collapse the styles of `items` into one [`TextStyle`].
///
/// - `font_size` is the arithmetic mean.
/// - `font_family` is the most frequent family; ties go to the family seen
///   first.
/// - bold / italic require a strict majority of items (more than half).
/// - `emphasis_confidence` is the mean of the item confidences.
///
/// An empty input yields [`TextStyle::default`].
pub fn aggregate_style<'a>(items: impl IntoIterator<Item = &'a PositionedTextItem>) -> TextStyle {
    let mut count = 0usize;
    let mut size_sum = 0.0_f32;
    let mut confidence_sum = 0.0_f32;
    let mut bold = 0usize;
    let mut italic = 0usize;
    // Insertion-ordered so that ties resolve to the first family seen.
    let mut families: Vec<(&str, usize)> = Vec::new();

    for item in items {
        count += 1;
        size_sum += item.font_size;
        confidence_sum += item.emphasis_confidence;
        if item.font_weight == FontWeight::Bold {
            bold += 1;
        }
        if item.font_style == FontStyle::Italic {
            italic += 1;
        }
        match families.iter_mut().find(|(f, _)| *f == item.font_family) {
            Some((_, n)) => *n += 1,
            None => families.push((item.font_family.as_str(), 1)),
        }
    }

    if count == 0 {
        return TextStyle::default();
    }

    let mut font_family = "";
    let mut best = 0usize;
    for (family, n) in &families {
        if *n > best {
            best = *n;
            font_family = family;
        }
    }

    TextStyle {
        font_size: size_sum / count as f32,
        font_family: font_family.to_string(),
        font_weight: if bold * 2 > count {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        },
        font_style: if italic * 2 > count {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        },
        emphasis_confidence: confidence_sum / count as f32,
    }
}
