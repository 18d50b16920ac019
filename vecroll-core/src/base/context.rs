//! Bounded window of recent encoded observations.
use ndarray::Array2;
use std::collections::{vec_deque::Iter, VecDeque};

/// A bounded FIFO of encoded observation batches, owned by a [`Policy`](crate::Policy).
///
/// Pushing into a full context evicts the oldest entry.
#[derive(Clone, Debug)]
pub struct RollingContext {
    capacity: usize,
    items: VecDeque<Array2<f32>>,
}

impl RollingContext {
    /// Creates an empty context holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Empties the context and sets a new capacity.
    pub fn reset(&mut self, capacity: usize) {
        *self = Self::new(capacity);
    }

    /// Appends a batch, evicting the oldest one if the context is full.
    pub fn push(&mut self, enc_obs: Array2<f32>) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(enc_obs);
    }

    /// The most recently pushed batch.
    pub fn latest(&self) -> Option<&Array2<f32>> {
        self.items.back()
    }

    /// The oldest batch still in the window.
    pub fn oldest(&self) -> Option<&Array2<f32>> {
        self.items.front()
    }

    /// Iterates from oldest to latest.
    pub fn iter(&self) -> Iter<'_, Array2<f32>> {
        self.items.iter()
    }

    /// Number of batches in the window.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been pushed since the last reset.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of batches kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
