/// Error taxonomy for the core, per `spec.md` §7. These are the only error kinds that cross a
/// component boundary; everything else (dropped stale/duplicate/out-of-order samples) is counted,
/// not surfaced as an error (`spec.md` §7, "Policy").
#[derive(Debug, thiserror::Error)]
pub enum BurrowError {
    #[error("not found")]
    NotFound,
    #[error("shard queue is full")]
    Busy,
    #[error("shutting down")]
    ShuttingDown,
    #[error("failed to encode response")]
    EncodingError,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BurrowError>;
