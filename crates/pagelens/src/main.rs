use crate::prelude::*;
use clap::Parser;

mod analyze;
mod bold;
mod concurrency;
mod document;
mod error;
mod prelude;
mod search;
mod session;
mod translate;
mod translator;
mod tts;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Rebuild reading structure from extracted PDF text, then translate, read aloud or search it"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "PAGELENS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,

    /// Layout profile (JSON) overriding the default thresholds
    #[clap(long, env = "PAGELENS_PROFILE", global = true)]
    profile: Option<std::path::PathBuf>,

    /// Zoom factor the page dump was extracted at
    #[clap(long, env = "PAGELENS_ZOOM", global = true, default_value = "1.0")]
    zoom: f32,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Show lines, paragraphs, masks and placements of a page
    Layout(crate::analyze::Options),

    /// Translate a page paragraph by paragraph
    Translate(crate::translate::Options),

    /// Build the read-aloud queue of a page, optionally speaking it
    Tts(crate::tts::Options),

    /// Search every page for a piece of text
    Search(crate::search::Options),

    /// Check whether a piece of text is set in bold
    Bold(crate::bold::Options),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Layout(options) => crate::analyze::run(options, app.global).await,
        SubCommands::Translate(options) => crate::translate::run(options, app.global).await,
        SubCommands::Tts(options) => crate::tts::run(options, app.global).await,
        SubCommands::Search(options) => crate::search::run(options, app.global).await,
        SubCommands::Bold(options) => crate::bold::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
