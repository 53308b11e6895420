use std::fmt::Display;

use log::{debug, info};

use crate::buffer::SharedBuffer;
use crate::worker::{Item, WaitStrategy, Worker, WorkerError, WorkerReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerReport {
    pub id: u32,
    /// Number of growth events the consumer reacted to.
    pub observed: usize,
    /// Cursor value after each observation, in order.
    pub cursor_trail: Vec<usize>,
    /// Text of the element read on the last observation.
    pub last_seen: Option<String>,
}

impl ConsumerReport {
    pub fn cursor(&self) -> usize {
        self.cursor_trail.last().copied().unwrap_or(0)
    }
}

/// Watches the shared buffer and reports the newest item every time it grows.
///
/// Only the last item is read on each growth event, so items appended between
/// two observations are skipped. The loop ends as soon as the done flag is
/// seen, whether or not the consumer has caught up.
#[derive(Debug)]
pub struct Consumer<T> {
    id: u32,
    cursor: usize,
    strategy: WaitStrategy,
    buffer: SharedBuffer<T>,
}

impl<T> Consumer<T> {
    pub fn builder() -> ConsumerBuilder<T> {
        ConsumerBuilder::default()
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl<T: Clone + Display> Consumer<T> {
    pub fn run(mut self) -> ConsumerReport {
        let mut cursor_trail = Vec::new();
        let mut last_seen = None;
        while let Some((len, element)) = self.next_growth() {
            info!("Consumer {} noticed new element: {element}", self.id);
            self.cursor = len;
            cursor_trail.push(len);
            last_seen = Some(element.to_string());
        }
        info!("Consumer {} done", self.id);
        ConsumerReport {
            id: self.id,
            observed: cursor_trail.len(),
            cursor_trail,
            last_seen,
        }
    }

    fn next_growth(&self) -> Option<(usize, T)> {
        match self.strategy {
            WaitStrategy::Block => self.buffer.wait_past(self.cursor),
            WaitStrategy::Spin => self.spin_past(),
        }
    }

    fn spin_past(&self) -> Option<(usize, T)> {
        loop {
            while !(self.buffer.len() > self.cursor || self.buffer.is_done()) {
                std::hint::spin_loop();
            }
            if self.buffer.is_done() {
                return None;
            }
            match self.buffer.read_last() {
                Some(found) => return Some(found),
                // The published length ran ahead of what we could lock.
                None => debug!("consumer {} saw growth on an empty buffer", self.id),
            }
        }
    }
}

impl<T: Item> Worker for Consumer<T> {
    fn label(&self) -> String {
        format!("consumer {}", self.id)
    }

    fn run(self: Box<Self>) -> WorkerReport {
        WorkerReport::Consumer(Consumer::run(*self))
    }
}

#[derive(Debug)]
pub struct ConsumerBuilder<T> {
    id: u32,
    strategy: WaitStrategy,
    buffer: Option<SharedBuffer<T>>,
}

impl<T> Default for ConsumerBuilder<T> {
    fn default() -> Self {
        Self {
            id: 0,
            strategy: WaitStrategy::default(),
            buffer: None,
        }
    }
}

impl<T> ConsumerBuilder<T> {
    pub fn id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn strategy(mut self, strategy: WaitStrategy) -> Self {
        self.strategy = strategy;
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

    /// The cursor starts at the buffer's current length, so items appended
    /// before construction are never reported.
    pub fn build(self) -> Result<Consumer<T>, WorkerError> {
        let buffer = self
            .buffer
            .ok_or(WorkerError::MissingBuffer { role: "consumer" })?;
        Ok(Consumer {
            id: self.id,
            cursor: buffer.len(),
            strategy: self.strategy,
            buffer,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn consumer(buffer: &SharedBuffer<u32>, id: u32, strategy: WaitStrategy) -> Consumer<u32> {
        Consumer::builder()
            .id(id)
            .strategy(strategy)
            .buffer(buffer.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn build_without_buffer_fails() {
        let err = Consumer::<String>::builder().id(3).build().unwrap_err();
        assert_eq!(err, WorkerError::MissingBuffer { role: "consumer" });
    }

    #[test]
    fn exits_without_reading_when_already_done() {
        for strategy in [WaitStrategy::Spin, WaitStrategy::Block] {
            let buffer = SharedBuffer::new();
            let consumer = consumer(&buffer, 0, strategy);
            buffer.append(1);
            buffer.finish();

            let report = consumer.run();
            assert_eq!(report.observed, 0);
            assert_eq!(report.cursor(), 0);
            assert_eq!(report.last_seen, None);
        }
    }

    #[test]
    fn cursor_starts_at_existing_length() {
        let buffer = SharedBuffer::new();
        buffer.append(1);
        buffer.append(2);
        let consumer = consumer(&buffer, 4, WaitStrategy::Block);
        assert_eq!(consumer.id(), 4);
        assert_eq!(consumer.cursor, 2);
    }

    #[test]
    fn cursor_is_monotonic_and_bounded() {
        for strategy in [WaitStrategy::Spin, WaitStrategy::Block] {
            let buffer = SharedBuffer::new();
            let first = consumer(&buffer, 0, strategy);
            let second = consumer(&buffer, 1, strategy);

            let reports = thread::scope(|s| {
                let a = s.spawn(|| first.run());
                let b = s.spawn(|| second.run());
                for i in 0..2_000 {
                    buffer.append(i);
                }
                buffer.finish();
                [a.join().unwrap(), b.join().unwrap()]
            });

            let items = buffer.snapshot();
            for report in reports {
                assert_eq!(report.observed, report.cursor_trail.len());
                assert!(report.cursor_trail.windows(2).all(|w| w[0] < w[1]));
                assert!(report.cursor() <= items.len());
                // The last read is the newest item at the time of reading.
                let expected = report.cursor().checked_sub(1).map(|i| items[i].to_string());
                assert_eq!(report.last_seen, expected);
            }
        }
    }

    #[test]
    fn reads_newest_item_on_each_growth() {
        for strategy in [WaitStrategy::Spin, WaitStrategy::Block] {
            let buffer = SharedBuffer::new();
            let watcher = consumer(&buffer, 2, strategy);
            // Both appends land before the consumer looks, so it skips to the newest.
            buffer.append(10);
            buffer.append(20);
            assert_eq!(watcher.next_growth(), Some((2, 20)));

            buffer.finish();
            assert_eq!(watcher.next_growth(), None);
        }
    }
}
