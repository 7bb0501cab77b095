//! Translation planning and result pairing.
//!
//! A page is translated as a flat list of jobs: one per prose paragraph and
//! one per table cell, in reading order.  The shell runs the jobs through a
//! bounded-concurrency mapper; each job yields `Some(result)` or `None` when
//! the collaborator failed.  [`assemble_blocks`] pairs the surviving results
//! with their placements and drops the `None` slots, so a single failure
//! never blanks the page.

use serde::{Deserialize, Serialize};

use layout::{BlockPlacement, Paragraph};

use crate::CoreError;

/// One unit of text to send to the translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationJob {
    pub paragraph_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_index: Option<usize>,
    pub text: String,
}

/// What a translator hands back for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_source_lang: Option<String>,
}

/// A placement with the text to draw into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedBlock {
    #[serde(flatten)]
    pub placement: BlockPlacement,
    pub source_text: String,
    pub translated_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_source_lang: Option<String>,
}

/// Build the job list for a page: prose paragraphs whole, table rows cell by
/// cell.  Blank texts are skipped.
pub fn plan_jobs(paragraphs: &[Paragraph]) -> Vec<TranslationJob> {
    let mut jobs = Vec::new();

    for (paragraph_index, para) in paragraphs.iter().enumerate() {
        match (&para.cells, para.is_table_row) {
            (Some(cells), true) => {
                for (cell_index, cell) in cells.iter().enumerate() {
                    if cell.text.trim().is_empty() {
                        continue;
                    }
                    jobs.push(TranslationJob {
                        paragraph_index,
                        cell_index: Some(cell_index),
                        text: cell.text.clone(),
                    });
                }
            }
            _ => {
                if para.text.trim().is_empty() {
                    continue;
                }
                jobs.push(TranslationJob {
                    paragraph_index,
                    cell_index: None,
                    text: para.text.clone(),
                });
            }
        }
    }

    jobs
}

/// Pair positional results with their jobs and placements.
///
/// `results[i]` belongs to `jobs[i]`.  `None` slots are dropped.  A length
/// mismatch or a job without a placement is a caller bug and reported as
/// an error.
pub fn assemble_blocks(
    jobs: &[TranslationJob],
    placements: &[BlockPlacement],
    results: Vec<Option<TranslationResult>>,
) -> Result<Vec<TranslatedBlock>, CoreError> {
    if jobs.len() != results.len() {
        return Err(CoreError::ResultCountMismatch {
            expected: jobs.len(),
            actual: results.len(),
        });
    }

    let mut blocks = Vec::new();
    for (job, result) in jobs.iter().zip(results) {
        let Some(result) = result else {
            continue;
        };

        let placement = placements
            .iter()
            .find(|p| p.paragraph_index == job.paragraph_index && p.cell_index == job.cell_index)
            .ok_or(CoreError::MissingPlacement {
                paragraph_index: job.paragraph_index,
                cell_index: job.cell_index,
            })?;

        blocks.push(TranslatedBlock {
            placement: placement.clone(),
            source_text: job.text.clone(),
            translated_text: result.translated_text,
            detected_source_lang: result.detected_source_lang,
        });
    }

    Ok(blocks)
}

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("tr", "Turkish"),
    ("en", "English"),
    ("de", "German"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
];

/// English display name for a language code.  Unknown codes pass through.
pub fn language_name(code: &str) -> &str {
    LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Every language code with a known display name.
pub fn supported_languages() -> impl Iterator<Item = (&'static str, &'static str)> {
    LANGUAGE_NAMES.iter().copied()
}
