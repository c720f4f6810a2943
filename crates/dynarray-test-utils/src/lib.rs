//! Test fixtures for dynarray development.
//!
//! Element types that record their own lifecycle, so tests can check that
//! every value the container takes ownership of is dropped exactly once:
//!
//! - [`DropLedger`]: shared counters of constructions and drops.
//! - [`Tracked`]: an ordered value that reports to a ledger.
//! - [`CloneBomb`]: panics on the n-th clone, for unwind consistency tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

#[derive(Default)]
struct Counts {
    created: AtomicUsize,
    dropped: AtomicUsize,
}

/// Shared construction/drop counters.
///
/// Cloning the ledger shares the counters.
#[derive(Clone, Default)]
pub struct DropLedger {
    counts: Arc<Counts>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value that reports to this ledger.
    pub fn track(&self, value: i32) -> Tracked {
        self.counts.created.fetch_add(1, AtomicOrdering::SeqCst);
        Tracked {
            value,
            ledger: self.clone(),
        }
    }

    /// Values created through [`track`](Self::track) or cloned from one.
    pub fn created(&self) -> usize {
        self.counts.created.load(AtomicOrdering::SeqCst)
    }

    /// Values dropped so far.
    pub fn dropped(&self) -> usize {
        self.counts.dropped.load(AtomicOrdering::SeqCst)
    }

    /// Values created but not yet dropped.
    pub fn live(&self) -> usize {
        self.created() - self.dropped()
    }
}

impl fmt::Debug for DropLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropLedger")
            .field("created", &self.created())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// An `i32` that tells its [`DropLedger`] when it is cloned or dropped.
///
/// Equality and ordering look at the value only.
pub struct Tracked {
    pub value: i32,
    ledger: DropLedger,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.ledger.track(self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger
            .counts
            .dropped
            .fetch_add(1, AtomicOrdering::SeqCst);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tracked {}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tracked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

/// A value whose clones succeed a fixed number of times, then panic.
///
/// All clones share one fuse. Every instance, original or clone, reports
/// its drop to the ledger.
pub struct CloneBomb {
    pub value: i32,
    fuse: Arc<AtomicUsize>,
    ledger: DropLedger,
}

impl CloneBomb {
    /// A value whose `clones_left + 1`-th clone (counting across all
    /// copies) panics.
    pub fn new(value: i32, clones_left: usize, ledger: &DropLedger) -> Self {
        ledger.counts.created.fetch_add(1, AtomicOrdering::SeqCst);
        Self {
            value,
            fuse: Arc::new(AtomicUsize::new(clones_left)),
            ledger: ledger.clone(),
        }
    }
}

impl Clone for CloneBomb {
    fn clone(&self) -> Self {
        let left = self.fuse.load(AtomicOrdering::SeqCst);
        if left == 0 {
            panic!("CloneBomb fuse exhausted");
        }
        self.fuse.store(left - 1, AtomicOrdering::SeqCst);
        self.ledger
            .counts
            .created
            .fetch_add(1, AtomicOrdering::SeqCst);
        Self {
            value: self.value,
            fuse: Arc::clone(&self.fuse),
            ledger: self.ledger.clone(),
        }
    }
}

impl Drop for CloneBomb {
    fn drop(&mut self) {
        self.ledger
            .counts
            .dropped
            .fetch_add(1, AtomicOrdering::SeqCst);
    }
}

impl fmt::Debug for CloneBomb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CloneBomb({})", self.value)
    }
}
