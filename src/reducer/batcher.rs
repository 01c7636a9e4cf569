// batcher.rs - bounds how many raw vectors a transform step decodes at once

use std::ops::Range;

/// Default number of vectors projected per batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

pub struct Batcher {
    pub batch_size: usize,
}

impl Batcher {
    /// A batch size of 0 is treated as 1
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Split `0..len` into consecutive ranges of at most `batch_size`
    pub fn ranges(&self, len: usize) -> impl Iterator<Item = Range<usize>> {
        let size = self.batch_size;
        (0..len)
            .step_by(size)
            .map(move |start| start..(start + size).min(len))
    }
}

impl Default for Batcher {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
