use layout::{
    analyze_lines, analyze_page, Anchor, DocumentText, FontWeight, LayoutConfig, PageText,
    TextRun,
};

const PAGE_WIDTH: f32 = 600.0;

fn run(text: &str, x: f32, y: f32, font_size: f32) -> TextRun {
    TextRun {
        text: text.to_string(),
        x,
        y,
        width: text.chars().count() as f32 * font_size * 0.5,
        height: font_size,
        font_size,
        font_family: "Times-Roman".to_string(),
        font_weight: Some(FontWeight::Normal),
        font_style: None,
    }
}

fn bold(mut r: TextRun) -> TextRun {
    r.font_weight = Some(FontWeight::Bold);
    r
}

/// Lay words out left to right with ordinary word spacing.
fn words(words: &[&str], x: f32, y: f32, font_size: f32) -> Vec<TextRun> {
    let mut cursor = x;
    words
        .iter()
        .map(|w| {
            let r = run(w, cursor, y, font_size);
            cursor += r.width + font_size * 0.3;
            r
        })
        .collect()
}

fn page(items: Vec<TextRun>) -> PageText {
    PageText {
        page_number: 1,
        items,
        page_width: PAGE_WIDTH,
        page_height: 800.0,
    }
}

fn texts(page: &PageText) -> Vec<String> {
    analyze_page(page, &LayoutConfig::default())
        .paragraphs
        .into_iter()
        .map(|p| p.text)
        .collect()
}

// =========================================================================
// Segmentation scenarios
// =========================================================================

#[test]
fn test_two_separated_blocks() {
    let p = page(vec![
        run("Block A opens with this sentence.", 50.0, 100.0, 12.0),
        run("Block A closes with this sentence.", 50.0, 108.0, 12.0),
        run("Block B opens with this sentence.", 50.0, 160.0, 12.0),
        run("Block B closes with this sentence.", 50.0, 168.0, 12.0),
    ]);
    let layout = analyze_page(&p, &LayoutConfig::default());
    assert_eq!(layout.line_count, 4);
    assert_eq!(layout.paragraphs.len(), 2);
    assert_eq!(layout.paragraphs[0].bounds.y, 100.0);
    assert_eq!(layout.paragraphs[0].bounds.bottom(), 120.0);
    assert_eq!(layout.paragraphs[1].bounds.y, 160.0);
    assert_eq!(layout.masks.len(), 2);
    assert_eq!(layout.placements.len(), 2);
}

#[test]
fn test_numbered_list_scenario() {
    let p = page(vec![
        run("1. First point", 50.0, 100.0, 12.0),
        run("continuation text of the first point.", 50.0, 118.0, 12.0),
        run("2. Second point", 50.0, 140.0, 12.0),
    ]);
    assert_eq!(
        texts(&p),
        vec![
            "1. First point continuation text of the first point.".to_string(),
            "2. Second point".to_string(),
        ]
    );
}

#[test]
fn test_number_change_splits_without_gap() {
    let p = page(vec![
        run("1. First point", 50.0, 100.0, 12.0),
        run("2. Second point", 50.0, 113.0, 12.0),
    ]);
    assert_eq!(texts(&p).len(), 2);
}

#[test]
fn test_bullet_list_paragraph() {
    let p = page(vec![
        run("• apples are red.", 50.0, 100.0, 12.0),
        run("• pears are green.", 50.0, 113.0, 12.0),
        run("• plums are purple.", 50.0, 126.0, 12.0),
    ]);
    let layout = analyze_page(&p, &LayoutConfig::default());
    assert_eq!(layout.paragraphs.len(), 1);
    assert!(layout.paragraphs[0].is_list);
    assert_eq!(
        layout.paragraphs[0].text,
        "• apples are red.\n• pears are green.\n• plums are purple."
    );
}

#[test]
fn test_period_free_bullets_read_as_headers() {
    let p = page(vec![
        run("• apples", 50.0, 100.0, 12.0),
        run("• pears", 50.0, 113.0, 12.0),
    ]);
    assert_eq!(texts(&p), vec!["• apples".to_string(), "• pears".to_string()]);
}

// =========================================================================
// Properties
// =========================================================================

#[test]
fn test_line_grouping_is_permutation_invariant() {
    let mut items = words(&["Results", "were", "collected", "daily."], 50.0, 100.0, 12.0);
    items.extend(words(&["Each", "sample", "was", "weighed."], 50.0, 114.0, 12.0));
    items.extend(words(&["Storage", "was", "kept", "cold."], 50.0, 170.0, 12.0));

    let expected = texts(&page(items.clone()));

    let mut reversed = items.clone();
    reversed.reverse();
    assert_eq!(texts(&page(reversed)), expected);

    let mut interleaved: Vec<TextRun> = items.iter().step_by(2).cloned().collect();
    interleaved.extend(items.iter().skip(1).step_by(2).cloned());
    assert_eq!(texts(&page(interleaved)), expected);
}

#[test]
fn test_paragraphs_non_empty_and_contain_their_items() {
    let mut items = words(&["Short", "header", "line"], 50.0, 80.0, 16.0);
    items.extend(words(&["Body", "text", "follows", "the", "header."], 50.0, 110.0, 12.0));
    items.extend(words(&["It", "continues", "here."], 52.0, 124.0, 12.0));
    items.push(run("1. item one", 70.0, 170.0, 12.0));
    items.push(run("2. item two", 70.0, 184.0, 12.0));

    let layout = analyze_page(&page(items), &LayoutConfig::default());
    assert!(!layout.paragraphs.is_empty());
    for para in &layout.paragraphs {
        assert!(!para.text.trim().is_empty());
        assert!(!para.lines.is_empty());
        for item in para.items() {
            assert!(
                para.bounds.contains(&item.bounds()),
                "item {:?} escapes paragraph {:?}",
                item.text,
                para.text
            );
        }
    }
}

#[test]
fn test_majority_bold_across_items() {
    let mut items = words(&["The", "results", "were", "quite", "clear."], 50.0, 100.0, 12.0);
    for item in items.iter_mut().take(3) {
        item.font_weight = Some(FontWeight::Bold);
    }
    let layout = analyze_page(&page(items), &LayoutConfig::default());
    assert_eq!(layout.paragraphs.len(), 1);
    assert_eq!(layout.paragraphs[0].style.font_weight, FontWeight::Bold);

    let items = vec![
        bold(run("Half", 50.0, 100.0, 12.0)),
        bold(run("bold,", 80.0, 100.0, 12.0)),
        run("half", 114.0, 100.0, 12.0),
        run("plain.", 142.0, 100.0, 12.0),
    ];
    let layout = analyze_page(&page(items), &LayoutConfig::default());
    assert_eq!(layout.paragraphs[0].style.font_weight, FontWeight::Normal);
}

// =========================================================================
// Tables, placement, degenerate input
// =========================================================================

#[test]
fn test_table_row_gets_cells_and_cell_masks() {
    let mut items = words(&["Prices", "are", "listed", "below."], 50.0, 100.0, 12.0);
    items.push(run("Apple", 50.0, 130.0, 12.0));
    items.push(run("12", 250.0, 130.0, 12.0));
    items.push(run("0.40", 400.0, 130.0, 12.0));

    let layout = analyze_page(&page(items), &LayoutConfig::default());
    assert_eq!(layout.paragraphs.len(), 2);
    let row = &layout.paragraphs[1];
    assert!(row.is_table_row);
    assert_eq!(row.cells.as_ref().map(Vec::len), Some(3));
    assert_eq!(layout.masks.len(), 1);
    assert_eq!(layout.cell_masks.len(), 3);
    // One block for the prose paragraph plus one per cell.
    assert_eq!(layout.placements.len(), 4);
}

#[test]
fn test_flow_profile_from_json() {
    let config = LayoutConfig::from_json(r#"{"placement": "flow"}"#).unwrap();
    let p = page(vec![
        run("First paragraph of the page.", 50.0, 100.0, 12.0),
        run("Second paragraph far below it.", 50.0, 500.0, 12.0),
    ]);
    let layout = analyze_page(&p, &config);
    assert_eq!(layout.placements[0].anchor, Anchor::Flow { margin_top: 100.0 });
    assert_eq!(layout.placements[1].anchor, Anchor::Flow { margin_top: 18.0 });
}

#[test]
fn test_empty_and_blank_pages_degrade_to_empty_output() {
    let layout = analyze_page(&page(vec![]), &LayoutConfig::default());
    assert!(layout.paragraphs.is_empty());
    assert!(layout.masks.is_empty());
    assert!(layout.placements.is_empty());

    let blank = page(vec![run("   ", 50.0, 100.0, 12.0)]);
    assert!(analyze_page(&blank, &LayoutConfig::default()).paragraphs.is_empty());
}

#[test]
fn test_document_dump_with_extractor_field_names() {
    let json = r#"{
        "pages": [{
            "pageNumber": 2,
            "pageWidth": 600,
            "pageHeight": 800,
            "items": [
                {"str": "INTRODUCTION", "x": 50, "y": 80, "width": 90, "height": 14,
                 "fontSize": 14, "fontName": "g_d0_f1"},
                {"str": "Body text sits under the heading.", "x": 50, "y": 110,
                 "width": 200, "height": 12, "fontSize": 12, "fontName": "g_d0_f2"}
            ]
        }]
    }"#;
    let doc = DocumentText::from_json(json).unwrap();
    let page = doc.page(2).unwrap();
    let layout = analyze_page(page, &LayoutConfig::default());
    assert_eq!(layout.page_number, 2);
    assert_eq!(layout.paragraphs.len(), 2);

    let heading = &layout.paragraphs[0];
    assert_eq!(heading.style.font_weight, FontWeight::Bold);
    assert!(heading.style.emphasis_confidence < 0.5);
    assert_eq!(layout.paragraphs[1].style.font_weight, FontWeight::Normal);

    assert!(doc.page(1).is_err());
}

#[test]
fn test_line_level_geometry() {
    let p = page(vec![
        run("A single line of text.", 50.0, 100.0, 12.0),
        run("Another line further down.", 50.0, 200.0, 12.0),
    ]);
    let lines = analyze_lines(&p, &LayoutConfig::default());
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].bounds.x, 50.0);
    assert_eq!(lines[0].bounds.width, PAGE_WIDTH - 50.0 - 20.0);
    assert_eq!(lines[1].mask.y, 194.0);
}
