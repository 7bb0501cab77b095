use colored::Colorize;

use layout::{LineGeometry, PageLayout, Paragraph};

use crate::document::{load_config, load_document, select_pages};
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct Options {
    /// Page dump produced by the text extractor (JSON)
    path: std::path::PathBuf,

    /// Page number to analyze (default: every page)
    #[arg(short, long)]
    page: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Report line-level geometry instead of paragraphs
    #[arg(long)]
    lines: bool,
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let document = load_document(&options.path)?;
    let config = load_config(&global)?;

    if global.verbose {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    for page in select_pages(&document, options.page)? {
        if options.lines {
            let lines = layout::analyze_lines(page, &config);
            if options.json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                print_lines(page.page_number, &lines);
            }
            continue;
        }

        let page_layout = layout::analyze_page(page, &config);
        log::info!(
            "page {}: {} lines, {} paragraphs, {} masks",
            page_layout.page_number,
            page_layout.line_count,
            page_layout.paragraphs.len(),
            page_layout.masks.len() + page_layout.cell_masks.len()
        );

        if options.json {
            println!("{}", serde_json::to_string_pretty(&page_layout)?);
        } else {
            print_paragraphs(&page_layout);
        }
    }

    Ok(())
}

fn kind(paragraph: &Paragraph) -> &'static str {
    if paragraph.is_table_row {
        "table"
    } else if paragraph.is_list {
        "list"
    } else {
        "text"
    }
}

fn print_paragraphs(page_layout: &PageLayout) {
    println!(
        "\n{} {} ({} lines, {} paragraphs)",
        "Page".bright_cyan().bold(),
        page_layout.page_number.to_string().bright_cyan().bold(),
        page_layout.line_count,
        page_layout.paragraphs.len()
    );

    let mut table = new_table();
    table.add_row(prettytable::row!["#", "Kind", "Box", "Font", "Text"]);
    for (index, para) in page_layout.paragraphs.iter().enumerate() {
        let b = &para.bounds;
        let style = &para.style;
        table.add_row(prettytable::row![
            index,
            kind(para),
            f!("{:.0},{:.0} {:.0}x{:.0}", b.x, b.y, b.width, b.height),
            f!(
                "{} {:.1} {}/{} ({:.2})",
                style.font_family,
                style.font_size,
                style.font_weight,
                style.font_style,
                style.emphasis_confidence
            ),
            truncate(&para.text, 60),
        ]);
    }
    table.printstd();
}

fn print_lines(page_number: usize, lines: &[LineGeometry]) {
    println!(
        "\n{} {} ({} lines)",
        "Page".bright_cyan().bold(),
        page_number.to_string().bright_cyan().bold(),
        lines.len()
    );

    let mut table = new_table();
    table.add_row(prettytable::row!["#", "Mask", "Width", "Size", "Text"]);
    for (index, line) in lines.iter().enumerate() {
        let m = &line.mask;
        table.add_row(prettytable::row![
            index,
            f!("{:.0},{:.0} {:.0}x{:.0}", m.x, m.y, m.width, m.height),
            f!("{:.0}", line.bounds.width),
            f!("{:.1}", line.bounds.font_size),
            truncate(&line.bounds.text, 60),
        ]);
    }
    table.printstd();
}
