use std::fmt::Display;

use log::{info, warn};

use crate::buffer::SharedBuffer;
use crate::worker::{DEFAULT_ROUNDS, Item, Worker, WorkerError, WorkerReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReport {
    pub appended: usize,
}

/// Appends a fixed list of items to the shared buffer, round after round,
/// then raises the done flag.
#[derive(Debug)]
pub struct Producer<T> {
    source: Vec<T>,
    rounds: usize,
    buffer: SharedBuffer<T>,
}

impl<T> Producer<T> {
    pub fn builder() -> ProducerBuilder<T> {
        ProducerBuilder::default()
    }
}

impl<T: Clone + Display> Producer<T> {
    pub fn run(self) -> ProducerReport {
        let mut appended = 0;
        for _ in 0..self.rounds {
            for element in &self.source {
                info!("Putting {element} to the shared container");
                self.buffer.append(element.clone());
                appended += 1;
            }
        }
        if !self.buffer.finish() {
            warn!("done flag was already set before the producer finished");
        }
        info!("Producer done");
        ProducerReport { appended }
    }
}

impl<T: Item> Worker for Producer<T> {
    fn label(&self) -> String {
        "producer".to_string()
    }

    fn run(self: Box<Self>) -> WorkerReport {
        WorkerReport::Producer(Producer::run(*self))
    }
}

#[derive(Debug)]
pub struct ProducerBuilder<T> {
    source: Vec<T>,
    rounds: usize,
    buffer: Option<SharedBuffer<T>>,
}

impl<T> Default for ProducerBuilder<T> {
    fn default() -> Self {
        Self {
            source: Vec::new(),
            rounds: DEFAULT_ROUNDS,
            buffer: None,
        }
    }
}

impl<T> ProducerBuilder<T> {
    pub fn source(mut self, source: impl IntoIterator<Item = T>) -> Self {
        self.source = source.into_iter().collect();
        self
    }

    pub fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn buffer(mut self, buffer: SharedBuffer<T>) -> Self {
        self.buffer = Some(buffer);
        self
    }

    pub(crate) fn maybe_buffer(mut self, buffer: Option<SharedBuffer<T>>) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn build(self) -> Result<Producer<T>, WorkerError> {
        let buffer = self
            .buffer
            .ok_or(WorkerError::MissingBuffer { role: "producer" })?;
        Ok(Producer {
            source: self.source,
            rounds: self.rounds,
            buffer,
        })
    }
}
