use thiserror::Error;

/// Reasons a worker cannot be built.
///
/// Both variants are programmer errors: the caller passed an incomplete spec
/// or asked for a kind of worker that does not exist. Nothing is retried and
/// no task is started once one of these is returned.
///
/// # Example
/// ```
/// use shared_feed::worker::{Producer, WorkerError};
///
/// let result = Producer::<String>::builder().build();
/// assert_eq!(
///     result.err(),
///     Some(WorkerError::MissingBuffer { role: "producer" })
/// );
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerError {
    #[error("given shared buffer is absent for the {role}")]
    MissingBuffer {
        /// Which kind of worker was being built.
        role: &'static str,
    },

    #[error("unsupported worker type: {0}")]
    UnsupportedKind(String),
}
