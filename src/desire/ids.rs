use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_ID_PREFIX: &str = "iwc_des";

/// Prefix used by `submit_desire` for generated ids.
pub fn type_prefix(desire_type: &str) -> String {
    format!("iwc_{}", desire_type)
}

/// Process-scoped desire id source.
///
/// Produces `<prefix>_<n>` with `n` strictly increasing from 1 across all
/// prefixes. Share one instance per process behind an `Arc`.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}_{}", prefix, n)
    }

    pub fn next_default_id(&self) -> String {
        self.next_id(DEFAULT_ID_PREFIX)
    }

    /// Last issued sequence number (0 if none yet).
    pub fn last(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}
