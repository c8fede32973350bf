//! Bounded probability history used for the moving average

use std::collections::VecDeque;

/// FIFO of the most recent probabilities seen for one label
///
/// Never holds more than `capacity` samples; pushing into a full buffer
/// evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct SmoothingBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SmoothingBuffer {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a sample and return the new average
    pub fn push(&mut self, probability: f32) -> f32 {
        self.samples.push_back(probability);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.average()
    }

    /// Arithmetic mean of the held samples, 0.0 when empty
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
