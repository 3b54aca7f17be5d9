use thiserror::Error;

/// Failures surfaced by the external capabilities.
///
/// Everything else the pipeline encounters (short source batches, unparseable
/// selections, out-of-range indices) is recovered in place and never becomes an error.
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("news source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("language model unavailable: {0}")]
    ModelUnavailable(String),
}
