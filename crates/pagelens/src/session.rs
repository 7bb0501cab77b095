use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pagelens_core::translation::{TranslationJob, TranslationResult};

use crate::concurrency::concurrent_map;
use crate::prelude::*;
use crate::translator::Translator;

/// Proof that a batch was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket {
    generation: u64,
}

impl BatchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Tags translation batches with a generation number so that results of a
/// batch started before a page, zoom or language change are dropped instead
/// of rendered.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct TranslationSession {
    generation: Arc<AtomicU64>,
}

impl TranslationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new batch.  Every earlier ticket becomes stale.
    pub fn begin(&self) -> BatchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        BatchTicket { generation }
    }

    /// Make every outstanding ticket stale without starting a batch.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: BatchTicket) -> bool {
        ticket.generation == self.current_generation()
    }

    fn check(&self, ticket: BatchTicket) -> Result<(), Error> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            Err(Error::StaleBatch {
                ticket: ticket.generation,
                current: self.current_generation(),
            })
        }
    }

    /// Translate `jobs` with bounded concurrency.
    ///
    /// A failed job is logged and leaves a `None` in its slot; the rest of
    /// the page still renders.  The whole batch fails with
    /// [`Error::StaleBatch`] when `ticket` went stale before or while it
    /// ran.
    pub async fn run_batch(
        &self,
        ticket: BatchTicket,
        jobs: &[TranslationJob],
        translator: Arc<dyn Translator>,
        target_lang: &str,
        concurrency: usize,
    ) -> Result<Vec<Option<TranslationResult>>, Error> {
        self.check(ticket)?;
        log::debug!(
            "batch {}: {} jobs via {} (concurrency {concurrency})",
            ticket.generation,
            jobs.len(),
            translator.name()
        );

        let translator = &translator;
        let results = concurrent_map(jobs.iter().collect::<Vec<_>>(), concurrency, |job| async move {
            match translator.translate(&job.text, target_lang).await {
                Ok(result) => Ok::<_, Error>(Some(result)),
                Err(err) => {
                    log::warn!(
                        "translation failed for paragraph {} cell {:?}: {err:#}",
                        job.paragraph_index,
                        job.cell_index
                    );
                    Ok(None)
                }
            }
        })
        .await?;

        if let Err(err) = self.check(ticket) {
            log::info!("dropping results of stale batch {}", ticket.generation);
            return Err(err);
        }
        Ok(results)
    }
}
