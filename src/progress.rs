// src/progress.rs
/// Lightweight progress reporting used by the scrapers.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of entities (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One entity was recorded.
    fn item_done(&mut self, _name: &str) {}

    /// One entity was skipped.
    fn item_failed(&mut self, _name: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Reports through the log, with a running `[n/total]` counter.
#[derive(Default)]
pub struct LogProgress {
    total: usize,
    done: usize,
    failed: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn seen(&self) -> usize {
        self.done + self.failed
    }
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        *self = Self { total, ..Self::default() };
    }

    fn log(&mut self, msg: &str) {
        logf!("{msg}");
    }

    fn item_done(&mut self, name: &str) {
        self.done += 1;
        logd!("[{}/{}] {name}", self.seen(), self.total);
    }

    fn item_failed(&mut self, name: &str) {
        self.failed += 1;
        logw!("[{}/{}] skipped {name}", self.seen(), self.total);
    }

    fn finish(&mut self) {
        logf!("Done: {} recorded, {} skipped of {}", self.done, self.failed, self.total);
    }
}
