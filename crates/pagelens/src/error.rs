#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Translator failed: {0}")]
    Translator(String),

    #[error("Stale translation batch (generation {ticket}, current {current})")]
    StaleBatch { ticket: u64, current: u64 },
}
