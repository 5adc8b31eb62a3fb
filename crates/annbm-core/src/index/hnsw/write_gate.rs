//! Write synchronization strategy, selected once at construction.
//!
//! - [`WriteGate::Global`]: one mutex serializes every write
//!   (`multi_threaded = false`).
//! - [`WriteGate::Striped`]: identifiers hash onto 64 independent mutexes;
//!   writes to distinct identifiers run in parallel and rely on per-node link
//!   locks, writes to the same identifier serialize (`multi_threaded = true`).
//!
//! Readers never touch the gate.

use parking_lot::{Mutex, MutexGuard};

/// Number of stripes for concurrent writers.
pub(crate) const NUM_STRIPES: usize = 64;

/// Write serialization strategy.
#[derive(Debug)]
pub(crate) enum WriteGate {
    /// Single writer at a time.
    Global(Mutex<()>),
    /// One writer per identifier stripe.
    Striped(Box<[Mutex<()>; NUM_STRIPES]>),
}

impl WriteGate {
    /// Builds the gate for the `multi_threaded` flag.
    pub(crate) fn new(multi_threaded: bool) -> Self {
        if multi_threaded {
            Self::Striped(Box::new(std::array::from_fn(|_| Mutex::new(()))))
        } else {
            Self::Global(Mutex::new(()))
        }
    }

    /// Stripe index for an identifier.
    #[inline]
    pub(crate) const fn stripe(lid: u32) -> usize {
        lid as usize % NUM_STRIPES
    }

    /// Locks the gate for a write on `lid`.
    pub(crate) fn lock(&self, lid: u32) -> MutexGuard<'_, ()> {
        match self {
            Self::Global(lock) => lock.lock(),
            Self::Striped(stripes) => stripes[Self::stripe(lid)].lock(),
        }
    }

    /// Returns true if distinct identifiers may be written concurrently.
    pub(crate) fn is_concurrent(&self) -> bool {
        matches!(self, Self::Striped(_))
    }
}
