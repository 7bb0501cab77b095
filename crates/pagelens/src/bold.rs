use colored::Colorize;

use layout::bold::{check_text_bold_status, BoldTestResult};

use crate::document::load_document;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct Options {
    /// Page dump produced by the text extractor (JSON)
    path: std::path::PathBuf,

    /// Text whose emphasis should be checked (case-insensitive substring)
    text: String,

    /// Page number to inspect
    #[arg(short, long, default_value = "1")]
    page: usize,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(options: Options, _global: crate::Global) -> Result<()> {
    let document = load_document(&options.path)?;
    let page = document.page(options.page)?;
    let items = page.positioned_items();
    let result = check_text_bold_status(&items, &options.text);

    log::debug!(
        "checked {} items on page {} for '{}'",
        items.len(),
        options.page,
        options.text
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&options.text, &result);
    }

    Ok(())
}

fn print_result(text: &str, result: &BoldTestResult) {
    let verdict = if result.is_bold {
        "bold".bright_green().bold()
    } else {
        "not bold".yellow()
    };
    println!("'{}' is {verdict}", text);

    let mut table = new_table();
    table.add_row(prettytable::row!["Font", result.font_name]);
    table.add_row(prettytable::row!["Detected weight", result.detected_weight]);
    table.add_row(prettytable::row!["Confidence", f!("{:.2}", result.confidence)]);
    table.add_row(prettytable::row!["Method", f!("{:?}", result.method)]);
    table.printstd();
}
