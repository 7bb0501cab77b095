use colored::Colorize;

use layout::{Anchor, PlacementMode};
use pagelens_core::translation::{assemble_blocks, language_name, plan_jobs, TranslatedBlock};

use crate::document::{load_config, load_document, select_pages};
use crate::prelude::{eprintln, println, *};
use crate::session::TranslationSession;
use crate::translator;

#[derive(Debug, clap::Args, Clone)]
pub struct Options {
    /// Page dump produced by the text extractor (JSON)
    path: std::path::PathBuf,

    /// Page number to translate (default: every page, one batch each)
    #[arg(short, long)]
    page: Option<usize>,

    /// Target language code
    #[arg(short, long, env = "PAGELENS_TARGET_LANG", default_value = "tr")]
    target_lang: String,

    /// Maximum number of translations in flight
    #[arg(short, long, env = "PAGELENS_CONCURRENCY", default_value = "3")]
    concurrency: usize,

    /// Translator program; reads text on stdin, writes the translation to stdout
    #[arg(long, env = "PAGELENS_TRANSLATE_CMD")]
    command: Option<String>,

    /// Vertical placement of translated blocks (absolute|flow)
    #[arg(long)]
    placement: Option<PlacementMode>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let document = load_document(&options.path)?;
    let mut config = load_config(&global)?;
    if let Some(placement) = options.placement {
        config.placement = placement;
    }

    let translator = translator::from_command(options.command.as_deref())?;
    let session = TranslationSession::new();

    // Ctrl-C retires the running batch so none of its results are printed.
    let interrupt = tokio::spawn({
        let session = session.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("interrupted, dropping in-flight translations");
                session.invalidate();
            }
        }
    });

    if global.verbose {
        eprintln!(
            "{}: {} ({})",
            "Translator".green(),
            translator.name(),
            language_name(&options.target_lang)
        );
    }

    for page in select_pages(&document, options.page)? {
        let page_layout = layout::analyze_page(page, &config);
        let jobs = plan_jobs(&page_layout.paragraphs);

        // Each page is its own batch; starting it retires the previous one.
        let ticket = session.begin();
        log::info!(
            "page {}: {} jobs, batch {}",
            page.page_number,
            jobs.len(),
            ticket.generation()
        );

        let results = session
            .run_batch(
                ticket,
                &jobs,
                translator.clone(),
                &options.target_lang,
                options.concurrency,
            )
            .await?;
        let failed = results.iter().filter(|r| r.is_none()).count();
        if failed > 0 {
            log::warn!("page {}: {failed} of {} jobs failed", page.page_number, jobs.len());
        }

        let blocks = assemble_blocks(&jobs, &page_layout.placements, results)?;

        if options.json {
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        } else {
            print_blocks(page.page_number, &blocks);
        }
    }

    interrupt.abort();
    Ok(())
}

fn print_blocks(page_number: usize, blocks: &[TranslatedBlock]) {
    println!(
        "\n{} {} ({} blocks)",
        "Page".bright_cyan().bold(),
        page_number.to_string().bright_cyan().bold(),
        blocks.len()
    );

    let mut table = new_table();
    table.add_row(prettytable::row!["#", "Cell", "Anchor", "X", "Width", "Translation"]);
    for block in blocks {
        let p = &block.placement;
        let anchor = match p.anchor {
            Anchor::Absolute { y } => f!("y={y:.0}"),
            Anchor::Flow { margin_top } => f!("+{margin_top:.0}"),
        };
        table.add_row(prettytable::row![
            p.paragraph_index,
            p.cell_index.map(|c| c.to_string()).unwrap_or_default(),
            anchor,
            f!("{:.0}", p.x),
            f!("{:.0}", p.width),
            truncate(&block.translated_text, 60),
        ]);
    }
    table.printstd();
}
