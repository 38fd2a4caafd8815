use thiserror::Error;

/// Errors raised by the fallible surfaces around the folding engine.
///
/// The arithmetic itself never fails, only configuration, IO and
/// thread-pool setup can.
#[derive(Debug, Error)]
pub enum IsoError {
    #[error("truncation size must be at least 1")]
    ZeroTruncationSize,
    #[error("abundance sum error must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
    #[error("failed to parse folding configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("got {distributions} distributions but {powers} powers")]
    LengthMismatch { distributions: usize, powers: usize },
}
