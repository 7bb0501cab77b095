use std::process::Stdio;

use colored::Colorize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use pagelens_core::tts::{clamp_rate, ReadingQueue, Utterance};

use crate::document::{load_config, load_document};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct Options {
    /// Page dump produced by the text extractor (JSON)
    path: std::path::PathBuf,

    /// Page number to read
    #[arg(short, long, default_value = "1")]
    page: usize,

    /// Speech rate (clamped to 0.5..=2.0)
    #[arg(short, long, env = "PAGELENS_TTS_RATE", default_value = "1.0")]
    rate: f32,

    /// Start reading at this paragraph index
    #[arg(long)]
    from: Option<usize>,

    /// Speech program; receives each paragraph on stdin and the rate in
    /// PAGELENS_TTS_RATE
    #[arg(long, env = "PAGELENS_SPEAK_CMD")]
    speak: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let document = load_document(&options.path)?;
    let config = load_config(&global)?;
    let page = document.page(options.page)?;
    let page_layout = layout::analyze_page(page, &config);

    let rate = clamp_rate(options.rate);
    if rate != options.rate {
        log::warn!("speech rate {} clamped to {rate}", options.rate);
    }

    let mut queue = ReadingQueue::new(&page_layout.paragraphs);

    let Some(speak) = options.speak.as_deref() else {
        if options.json {
            println!("{}", serde_json::to_string_pretty(queue.utterances())?);
        } else {
            print_queue(options.page, rate, queue.utterances());
        }
        return Ok(());
    };

    let argv = shlex::split(speak)
        .filter(|argv| !argv.is_empty())
        .ok_or_else(|| Error::Input(f!("invalid speech command: {speak}")))?;

    let mut current = match options.from {
        Some(index) => queue
            .seek(index)
            .cloned()
            .ok_or_else(|| Error::Input(f!("paragraph {index} has nothing to read")))?,
        None => match queue.advance() {
            Some(first) => first.clone(),
            None => return Ok(()),
        },
    };

    loop {
        if global.verbose {
            let h = &current.highlight;
            eprintln!(
                "{} {} [{:.0},{:.0} {:.0}x{:.0}]",
                "Reading".green(),
                current.paragraph_index,
                h.x,
                h.y,
                h.width,
                h.height
            );
        }
        speak_utterance(&argv, &current, rate).await?;

        match queue.advance() {
            Some(next) => current = next.clone(),
            None => break,
        }
    }

    Ok(())
}

async fn speak_utterance(argv: &[String], utterance: &Utterance, rate: f32) -> Result<()> {
    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .env("PAGELENS_TTS_RATE", rate.to_string())
        .stdin(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .wrap_err_with(|| f!("failed to start speech program '{}'", argv[0]))?;

    let mut stdin = child.stdin.take().ok_or_eyre("speech program stdin unavailable")?;
    stdin.write_all(utterance.text.as_bytes()).await?;
    drop(stdin);

    let status = child.wait().await?;
    if !status.success() {
        return Err(eyre!("speech program '{}' exited with {status}", argv[0]));
    }
    Ok(())
}

fn print_queue(page_number: usize, rate: f32, utterances: &[Utterance]) {
    println!(
        "\n{} {} ({} paragraphs, rate {rate})",
        "Page".bright_cyan().bold(),
        page_number.to_string().bright_cyan().bold(),
        utterances.len()
    );

    let mut table = new_table();
    table.add_row(prettytable::row!["#", "Paragraph", "Highlight", "Speech"]);
    for (position, u) in utterances.iter().enumerate() {
        let h = &u.highlight;
        table.add_row(prettytable::row![
            position,
            u.paragraph_index,
            f!("{:.0},{:.0} {:.0}x{:.0}", h.x, h.y, h.width, h.height),
            truncate(&u.text, 60),
        ]);
    }
    table.printstd();
}
