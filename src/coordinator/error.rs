use thiserror::Error;
use tokio::task::JoinError;

use crate::worker::WorkerError;

#[derive(Debug, Error)]
pub enum RunError {
    /// A worker could not be built; nothing was started.
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// A worker task panicked or was cancelled by the runtime.
    #[error("{label} task did not complete")]
    Panicked {
        label: String,
        #[source]
        source: JoinError,
    },
}
