use colored::Colorize;

use pagelens_core::search::{page_text, search_results, snippet};

use crate::document::load_document;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct Options {
    /// Page dump produced by the text extractor (JSON)
    path: std::path::PathBuf,

    /// Text to look for (case-insensitive)
    query: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(options: Options, _global: crate::Global) -> Result<()> {
    let document = load_document(&options.path)?;
    let results = search_results(&document, &options.query);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} '{}'", "No matches for".yellow(), options.query);
        return Ok(());
    }

    let query_len = options.query.chars().count();
    let mut table = new_table();
    table.add_row(prettytable::row!["Page", "Hits", "First match"]);
    for hit in &results {
        let first = match (document.page(hit.page_number), hit.offsets.first()) {
            (Ok(page), Some(&offset)) => snippet(&page_text(page), offset, query_len, 30),
            _ => String::new(),
        };
        table.add_row(prettytable::row![hit.page_number, hit.offsets.len(), first]);
    }
    table.printstd();

    let total: usize = results.iter().map(|r| r.offsets.len()).sum();
    println!(
        "\n{}: {} on {} pages",
        "Total".green(),
        total.to_string().bright_cyan().bold(),
        results.len()
    );

    Ok(())
}
