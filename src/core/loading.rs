/// Outcome of finishing one tracked load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadProgress {
    Pending { finished: usize, total: usize },
    /// Every started load has finished. Reported exactly once.
    Complete { failed: usize },
}

/// Counts outstanding asset loads across all stems.
///
/// Failed loads count as finished: one broken stem must not hold back the
/// rest of the scene.
#[derive(Clone, Debug, Default)]
pub struct LoadTracker {
    total: usize,
    finished: usize,
    failed: usize,
    completed: bool,
}

impl LoadTracker {
    pub fn begin(&mut self) {
        self.total += 1;
    }

    pub fn finish(&mut self, ok: bool) -> LoadProgress {
        if self.finished < self.total {
            self.finished += 1;
            if !ok {
                self.failed += 1;
            }
        } else {
            log::warn!("[loading] finish without a matching begin");
        }
        if self.finished == self.total && !self.completed {
            self.completed = true;
            LoadProgress::Complete {
                failed: self.failed,
            }
        } else {
            LoadProgress::Pending {
                finished: self.finished,
                total: self.total,
            }
        }
    }

    /// Mark completion when nothing was ever started. Returns true the first time.
    pub fn complete_if_idle(&mut self) -> bool {
        if self.total == 0 && !self.completed {
            self.completed = true;
            return true;
        }
        false
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn finished(&self) -> usize {
        self.finished
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}
