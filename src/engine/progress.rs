//! Coarse-grained progress accounting for a batch run.

/// Tracks completed work and yields each newly reached 10% boundary.
///
/// Percentage is `floor(completed * 100 / total)`. A boundary (10, 20, …,
/// 100) is yielded at most once, and the sequence of yielded boundaries is
/// strictly increasing, so callers can log every yield without deduplicating.
/// When several boundaries are jumped in one step only the highest is
/// yielded.
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    completed: usize,
    last_boundary: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            last_boundary: 0,
        }
    }

    /// Record one completion. Returns the boundary to report, if any.
    pub fn record(&mut self) -> Option<usize> {
        debug_assert!(self.completed < self.total);
        self.completed += 1;
        let boundary = self.percent() / 10 * 10;
        if boundary > self.last_boundary {
            self.last_boundary = boundary;
            Some(boundary)
        } else {
            None
        }
    }

    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.completed * 100 / self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
