//! Per-session cache of which operations the provider implements.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::operation::{Operation, OperationSet};

/// Resolves, once per operation, whether the provider implements it.
///
/// # Thread Safety
///
/// Each operation has its own `OnceLock`. Concurrent first use of the same
/// operation performs exactly one lookup; the others wait for its answer.
#[derive(Debug)]
pub struct DescriptorCache {
    slots: [OnceLock<bool>; Operation::COUNT],
    lookups: AtomicUsize,
}

impl DescriptorCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| OnceLock::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Whether `op` is implemented, calling `lookup` on first use only.
    pub fn resolve(&self, op: Operation, lookup: impl FnOnce() -> OperationSet) -> bool {
        *self.slots[op.index()].get_or_init(|| {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            let present = lookup().contains(op);
            tracing::debug!(
                op = op.name(),
                signature = op.signature(),
                present,
                "resolved operation"
            );
            present
        })
    }

    /// The cached answer for `op`, if it has been resolved.
    pub fn cached(&self, op: Operation) -> Option<bool> {
        self.slots[op.index()].get().copied()
    }

    /// Number of lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new()
    }
}
