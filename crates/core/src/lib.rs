//! Core library for pagelens
//!
//! This crate is the **Functional Core** of the pagelens reader, the pure half
//! of a Functional Core / Imperative Shell split:
//!
//! - **`layout`**: reading-structure reconstruction for one page
//! - **`pagelens_core`** (this crate): what the reader does with that
//!   structure (translate it, read it aloud, search it)
//! - **`pagelens`**: I/O, translation collaborators, concurrency and the CLI
//!
//! Nothing in here touches the network, the filesystem or a clock.  Every
//! function takes plain data and returns plain data, so tests build their
//! inputs in code and assert on the outputs directly.
//!
//! # Module Organization
//!
//! - [`translation`]: job planning for paragraphs and table cells, pairing
//!   results back with block placements, language names
//! - [`tts`]: the paragraph reading queue, highlight boxes and speech text
//! - [`search`]: case-insensitive full-text search over page dumps
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use layout::{analyze_page, LayoutConfig};
//! use pagelens_core::translation::plan_jobs;
//!
//! let page_layout = analyze_page(&page, &LayoutConfig::default());
//! let jobs = plan_jobs(&page_layout.paragraphs);
//! // hand `jobs` to the shell, which translates them with bounded concurrency
//! ```

use thiserror::Error;

pub mod search;
pub mod translation;
pub mod tts;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("expected {expected} translation results, got {actual}")]
    ResultCountMismatch { expected: usize, actual: usize },
    #[error("no placement for paragraph {paragraph_index} cell {cell_index:?}")]
    MissingPlacement {
        paragraph_index: usize,
        cell_index: Option<usize>,
    },
}
