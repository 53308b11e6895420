use std::time::{Duration, Instant};

use log::{debug, error};
use tokio::task;

use crate::buffer::SharedBuffer;
use crate::worker::{
    self, ConsumerReport, DEFAULT_ROUNDS, Item, WaitStrategy, WorkerKind, WorkerReport, WorkerSpec,
};
mod error;

pub use error::RunError;

/// Source list used when none is given.
pub const DEFAULT_SOURCE: [&str; 3] = ["Hello", "world", "!!!"];

pub const DEFAULT_CONSUMERS: u32 = 2;

#[derive(Debug, Clone)]
pub struct RunConfig<T> {
    pub source: Vec<T>,
    pub rounds: usize,
    pub consumers: u32,
    pub strategy: WaitStrategy,
}

impl Default for RunConfig<String> {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.map(String::from).to_vec(),
            rounds: DEFAULT_ROUNDS,
            consumers: DEFAULT_CONSUMERS,
            strategy: WaitStrategy::default(),
        }
    }
}

#[derive(Debug)]
pub struct RunReport<T> {
    pub elapsed: Duration,
    pub produced: usize,
    /// One entry per consumer, in id order.
    pub consumers: Vec<ConsumerReport>,
    /// Buffer contents once every task has joined.
    pub items: Vec<T>,
    pub done: bool,
}

/// Builds a fresh buffer, one producer and `config.consumers` consumers,
/// runs them on the blocking pool and waits for every one of them.
///
/// All workers are built before the first task is spawned, so a construction
/// error leaves nothing running.
pub async fn run<T: Item>(config: RunConfig<T>) -> Result<RunReport<T>, RunError> {
    let start = Instant::now();
    let buffer = SharedBuffer::new();

    let mut workers = Vec::with_capacity(1 + config.consumers as usize);
    workers.push(worker::create_worker(
        WorkerKind::Producer,
        WorkerSpec {
            source: config.source,
            rounds: config.rounds,
            buffer: Some(buffer.clone()),
            ..WorkerSpec::default()
        },
    )?);
    for id in 0..config.consumers {
        workers.push(worker::create_worker(
            WorkerKind::Consumer,
            WorkerSpec {
                id,
                strategy: config.strategy,
                buffer: Some(buffer.clone()),
                ..WorkerSpec::default()
            },
        )?);
    }

    let handles: Vec<_> = workers
        .into_iter()
        .map(|worker| {
            let label = worker.label();
            debug!("starting {label}");
            (label, task::spawn_blocking(move || worker.run()))
        })
        .collect();

    let mut produced = 0;
    let mut consumers = Vec::new();
    let mut failure = None;
    for (label, handle) in handles {
        match handle.await {
            Ok(WorkerReport::Producer(report)) => produced = report.appended,
            Ok(WorkerReport::Consumer(report)) => consumers.push(report),
            Err(source) => {
                error!("{label} task failed: {source}");
                failure.get_or_insert(RunError::Panicked { label, source });
            }
        }
    }
    if let Some(err) = failure {
        return Err(err);
    }

    Ok(RunReport {
        elapsed: start.elapsed(),
        produced,
        consumers,
        items: buffer.snapshot(),
        done: buffer.is_done(),
    })
}
