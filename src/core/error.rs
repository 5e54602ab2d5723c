use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    /// The parallel runtime could not report the rank of this process.
    #[error("parallel runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// Writing or flushing the sink failed.
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PrintError>;
