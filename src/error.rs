/// Errors produced by `loglog-counter`
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Estimator precision outside of supported range
    #[error("invalid precision {0}, expected value in [4..16] range")]
    InvalidPrecision(u8),
    /// Failure while reading keys from the line source
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
