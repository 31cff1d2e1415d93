//! Qubit and classical bit addressing inside a kernel function.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a function's register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The index as `usize`, for slicing and runtime qudit mapping.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Index of a classical bit within a function's result register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// The index as `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(QubitId(3).to_string(), "q3");
        assert_eq!(ClbitId(0).to_string(), "c0");
    }

    #[test]
    fn test_transparent_serde() {
        let json = serde_json::to_string(&QubitId(7)).unwrap();
        assert_eq!(json, "7");
        let back: QubitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QubitId(7));
    }
}
