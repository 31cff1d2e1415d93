//! Qudit id pool.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{RuntimeError, RuntimeResult};

/// Number of ids in a default pool.
pub const DEFAULT_CAPACITY: usize = 30;

/// A handle to an allocated qudit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuditInfo {
    /// Number of levels (2 for a qubit).
    pub levels: usize,
    /// Pool id.
    pub id: usize,
}

impl QuditInfo {
    /// Create a qudit handle.
    pub const fn new(levels: usize, id: usize) -> Self {
        Self { levels, id }
    }

    /// A two-level handle.
    pub const fn qubit(id: usize) -> Self {
        Self::new(2, id)
    }
}

impl fmt::Display for QuditInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.levels == 2 {
            write!(f, "q{}", self.id)
        } else {
            write!(f, "q{}<{}>", self.id, self.levels)
        }
    }
}

/// Fixed-capacity pool of qudit ids.
///
/// Ids are handed out lowest first, so a released id is the next one reused.
/// Free and allocated ids always partition `0..capacity`.
#[derive(Debug, Clone)]
pub struct QuditAllocator {
    capacity: usize,
    free: BTreeSet<usize>,
}

impl QuditAllocator {
    /// Create a pool holding ids `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: (0..capacity).collect(),
        }
    }

    /// Take the lowest free id.
    pub fn allocate(&mut self, levels: usize) -> RuntimeResult<QuditInfo> {
        if levels < 2 {
            return Err(RuntimeError::InvalidLevels { levels });
        }
        let id = self.free.pop_first().ok_or(RuntimeError::ResourceExhausted {
            capacity: self.capacity,
        })?;
        Ok(QuditInfo::new(levels, id))
    }

    /// Return an id to the pool.
    pub fn release(&mut self, qudit: &QuditInfo) -> RuntimeResult<()> {
        if qudit.id >= self.capacity {
            return Err(RuntimeError::InvalidRelease {
                id: qudit.id,
                reason: "id outside the pool",
            });
        }
        if !self.free.insert(qudit.id) {
            return Err(RuntimeError::InvalidRelease {
                id: qudit.id,
                reason: "id is already free",
            });
        }
        Ok(())
    }

    /// True if any id is still allocated.
    pub fn leak_check(&self) -> bool {
        self.free.len() != self.capacity
    }

    /// True if `id` is currently handed out.
    pub fn is_allocated(&self, id: usize) -> bool {
        id < self.capacity && !self.free.contains(&id)
    }

    /// Pool size.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of free ids.
    pub fn num_available(&self) -> usize {
        self.free.len()
    }

    /// Number of allocated ids.
    pub fn num_allocated(&self) -> usize {
        self.capacity - self.free.len()
    }
}

impl Default for QuditAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
