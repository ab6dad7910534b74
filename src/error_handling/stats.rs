//! Failure statistics tracking.
//!
//! This module provides thread-safe failure counting for the end-of-run
//! breakdown logged after all domains have been checked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::FailureKind;

/// Thread-safe failure statistics tracker.
///
/// Tracks how many times each [`FailureKind`] occurred during a run using
/// atomic counters, allowing concurrent access from the fetch tasks. All
/// kinds are initialized to zero on creation.
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across multiple tasks using `Arc`.
pub struct CheckStats {
    failures: HashMap<FailureKind, AtomicUsize>,
}

impl CheckStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in FailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }

        CheckStats { failures }
    }

    /// Increment the counter for a failure kind.
    ///
    /// All kinds are initialized in the constructor, so a missing entry
    /// indicates an initialization bug; it is logged rather than panicking.
    pub fn increment(&self, kind: FailureKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in CheckStats initialization.",
                kind
            );
        }
    }

    /// Get the count for a failure kind.
    ///
    /// Returns 0 if the kind is not in the map (should never happen if properly initialized).
    pub fn get(&self, kind: FailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or_else(|| {
                log::warn!(
                    "Failure kind {:?} not found in stats map, returning 0. \
                     This indicates a bug in CheckStats initialization.",
                    kind
                );
                0
            })
    }

    /// Get total failure count across all kinds.
    pub fn total(&self) -> usize {
        FailureKind::iter().map(|k| self.get(k)).sum()
    }

    /// Log a breakdown of all non-zero failure counters.
    pub fn log_summary(&self) {
        if self.total() == 0 {
            log::info!("No failures recorded during this run.");
            return;
        }

        log::info!("Failure breakdown:");
        for kind in FailureKind::iter() {
            let count = self.get(kind);
            if count > 0 {
                log::info!("   {}: {}", kind.as_str(), count);
            }
        }
    }
}
