// src/progress.rs
/// Lightweight progress reporting used by long-running operations (pagination, runs).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the upper bound on units (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one raw unit has been fetched and extracted.
    fn item_done(&mut self, _page: u32, _records: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Forwards everything to the log.
#[derive(Default)]
pub struct LogProgress {
    total: usize,
    records: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.records = 0;
    }

    fn log(&mut self, msg: &str) {
        logf!("{msg}");
    }

    fn item_done(&mut self, page: u32, records: usize) {
        self.records += records;
        logf!("page {page}/{}: {records} fonds ({} so far)", self.total, self.records);
    }

    fn finish(&mut self) {
        logd!("progress: done, {} fonds", self.records);
    }
}
