use std::fmt::{self, Display};
use std::str::FromStr;

use clap::ValueEnum;

use crate::buffer::SharedBuffer;
mod consumer;
mod error;
mod producer;

pub use consumer::{Consumer, ConsumerBuilder, ConsumerReport};
pub use error::WorkerError;
pub use producer::{Producer, ProducerBuilder, ProducerReport};

/// Rounds a producer runs over its source list unless told otherwise.
pub const DEFAULT_ROUNDS: usize = 10_000;

/// Values that can travel through the shared buffer and across task threads.
pub trait Item: Clone + Display + Send + Sync + 'static {}

impl<T> Item for T where T: Clone + Display + Send + Sync + 'static {}

/// How a consumer waits for the buffer to grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum WaitStrategy {
    /// Re-read the length in a tight loop, outside the lock.
    Spin,
    /// Park on the buffer's condition variable until woken.
    #[default]
    Block,
}

/// Something the coordinator can hand to a thread and run to completion.
pub trait Worker: Send {
    fn label(&self) -> String;

    fn run(self: Box<Self>) -> WorkerReport;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerReport {
    Producer(ProducerReport),
    Consumer(ConsumerReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerKind {
    Producer,
    Consumer,
}

impl Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerKind::Producer => f.write_str("producer"),
            WorkerKind::Consumer => f.write_str("consumer"),
        }
    }
}

impl FromStr for WorkerKind {
    type Err = WorkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "producer" => Ok(WorkerKind::Producer),
            "consumer" => Ok(WorkerKind::Consumer),
            _ => Err(WorkerError::UnsupportedKind(s.to_string())),
        }
    }
}

/// Everything a worker of either kind may need. Fields a kind does not use
/// are ignored.
#[derive(Debug, Clone)]
pub struct WorkerSpec<T> {
    pub id: u32,
    pub source: Vec<T>,
    pub rounds: usize,
    pub strategy: WaitStrategy,
    pub buffer: Option<SharedBuffer<T>>,
}

impl<T> Default for WorkerSpec<T> {
    fn default() -> Self {
        Self {
            id: 0,
            source: Vec::new(),
            rounds: DEFAULT_ROUNDS,
            strategy: WaitStrategy::default(),
            buffer: None,
        }
    }
}

pub fn create_worker<T: Item>(
    kind: WorkerKind,
    spec: WorkerSpec<T>,
) -> Result<Box<dyn Worker>, WorkerError> {
    match kind {
        WorkerKind::Producer => {
            let producer = Producer::builder()
                .source(spec.source)
                .rounds(spec.rounds)
                .maybe_buffer(spec.buffer)
                .build()?;
            Ok(Box::new(producer))
        }
        WorkerKind::Consumer => {
            let consumer = Consumer::builder()
                .id(spec.id)
                .strategy(spec.strategy)
                .maybe_buffer(spec.buffer)
                .build()?;
            Ok(Box::new(consumer))
        }
    }
}
