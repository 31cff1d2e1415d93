//! Observables as weighted sums of Pauli words.
//!
//! Each term stores its Pauli word in binary symplectic form: a bit vector
//! of length 2n whose first half marks X support and whose second half
//! marks Z support. A qubit with both bits set carries a Y.
//!
//! ```rust
//! use skald_ir::observable::Observable;
//!
//! let h: Observable = "5.907 II + -2.1433 XX + -2.1433 YY + 0.21829 ZI + -6.125 IZ"
//!     .parse()
//!     .unwrap();
//! assert_eq!(h.n_terms(), 5);
//! assert_eq!(h.num_qubits(), 2);
//! assert_eq!(h.terms()[2].label(), "YY");
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// The `(x, z)` symplectic bit pair.
    pub fn bits(self) -> (bool, bool) {
        match self {
            PauliOp::I => (false, false),
            PauliOp::X => (true, false),
            PauliOp::Y => (true, true),
            PauliOp::Z => (false, true),
        }
    }

    /// Decode an `(x, z)` bit pair.
    pub fn from_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => PauliOp::I,
            (true, false) => PauliOp::X,
            (true, true) => PauliOp::Y,
            (false, true) => PauliOp::Z,
        }
    }

    fn as_char(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }
}

/// A weighted Pauli word `c · P₀ ⊗ P₁ ⊗ … ⊗ Pₙ₋₁`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    /// Complex coefficient; only the real part contributes to expectations.
    pub coefficient: Complex64,
    /// Binary symplectic form, `x` bits then `z` bits.
    pub symplectic: Vec<bool>,
}

impl PauliTerm {
    /// Build a term from one Pauli per qubit.
    pub fn from_paulis(coefficient: impl Into<Complex64>, ops: &[PauliOp]) -> Self {
        let n = ops.len();
        let mut symplectic = vec![false; 2 * n];
        for (i, op) in ops.iter().enumerate() {
            let (x, z) = op.bits();
            symplectic[i] = x;
            symplectic[i + n] = z;
        }
        Self {
            coefficient: coefficient.into(),
            symplectic,
        }
    }

    /// Build a term from a symplectic bit vector.
    pub fn from_symplectic(coefficient: impl Into<Complex64>, symplectic: Vec<bool>) -> IrResult<Self> {
        if symplectic.len() % 2 != 0 {
            return Err(IrError::InvalidObservable(format!(
                "symplectic vector must have even length, got {}",
                symplectic.len()
            )));
        }
        Ok(Self {
            coefficient: coefficient.into(),
            symplectic,
        })
    }

    /// The identity term on `n` qubits.
    pub fn identity(coefficient: impl Into<Complex64>, num_qubits: usize) -> Self {
        Self {
            coefficient: coefficient.into(),
            symplectic: vec![false; 2 * num_qubits],
        }
    }

    /// Number of qubits the word spans.
    pub fn num_qubits(&self) -> usize {
        self.symplectic.len() / 2
    }

    /// The Pauli acting on `qubit`.
    pub fn pauli(&self, qubit: usize) -> PauliOp {
        let n = self.num_qubits();
        if qubit >= n {
            return PauliOp::I;
        }
        PauliOp::from_bits(self.symplectic[qubit], self.symplectic[qubit + n])
    }

    /// Iterate over `(qubit, pauli)` for every non-identity position.
    pub fn support(&self) -> impl Iterator<Item = (usize, PauliOp)> + '_ {
        (0..self.num_qubits())
            .map(|q| (q, self.pauli(q)))
            .filter(|(_, p)| *p != PauliOp::I)
    }

    /// True if no qubit carries a non-identity Pauli.
    pub fn is_identity(&self) -> bool {
        self.symplectic.iter().all(|b| !b)
    }

    /// The Pauli word without coefficient, one letter per qubit (`"XZI"`).
    pub fn label(&self) -> String {
        (0..self.num_qubits()).map(|q| self.pauli(q).as_char()).collect()
    }

    fn padded(&self, num_qubits: usize) -> Self {
        if num_qubits <= self.num_qubits() {
            return self.clone();
        }
        let ops: Vec<PauliOp> = (0..num_qubits).map(|q| self.pauli(q)).collect();
        Self::from_paulis(self.coefficient, &ops)
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient.im == 0.0 {
            write!(f, "{} {}", self.coefficient.re, self.label())
        } else {
            write!(f, "({}) {}", self.coefficient, self.label())
        }
    }
}

/// An ordered sum of Pauli terms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observable {
    terms: Vec<PauliTerm>,
}

impl Observable {
    /// Create from terms; shorter words are padded with identities so every
    /// term spans the same register.
    pub fn from_terms(terms: Vec<PauliTerm>) -> Self {
        let n = terms.iter().map(PauliTerm::num_qubits).max().unwrap_or(0);
        Self {
            terms: terms.iter().map(|t| t.padded(n)).collect(),
        }
    }

    /// All terms, in order.
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of qubits spanned.
    pub fn num_qubits(&self) -> usize {
        self.terms.first().map_or(0, PauliTerm::num_qubits)
    }

    /// Terms that act non-trivially on at least one qubit, in order.
    pub fn non_identity_terms(&self) -> impl Iterator<Item = &PauliTerm> {
        self.terms.iter().filter(|t| !t.is_identity())
    }

    /// Sum of the real coefficients of identity terms.
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coefficient.re)
            .sum()
    }
}

impl FromStr for Observable {
    type Err = IrError;

    /// Parse `"<coef> <WORD> + <coef> <WORD> + …"`; the coefficient may be
    /// omitted (defaults to 1).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut terms = Vec::new();
        let mut width: Option<usize> = None;

        for raw in s.split('+') {
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            let (coef, word) = match tokens.as_slice() {
                [word] => (1.0, *word),
                [coef, word] => {
                    let c = coef.parse::<f64>().map_err(|e| {
                        IrError::InvalidObservable(format!("bad coefficient '{coef}': {e}"))
                    })?;
                    (c, *word)
                }
                _ => {
                    return Err(IrError::InvalidObservable(format!(
                        "cannot parse term '{}'",
                        raw.trim()
                    )));
                }
            };

            let ops = word
                .chars()
                .map(|c| {
                    PauliOp::from_char(c).ok_or_else(|| {
                        IrError::InvalidObservable(format!("unknown Pauli '{c}' in '{word}'"))
                    })
                })
                .collect::<IrResult<Vec<_>>>()?;

            match width {
                Some(w) if w != ops.len() => {
                    return Err(IrError::InvalidObservable(format!(
                        "term '{word}' spans {} qubits, expected {w}",
                        ops.len()
                    )));
                }
                _ => width = Some(ops.len()),
            }
            terms.push(PauliTerm::from_paulis(coef, &ops));
        }

        Ok(Self::from_terms(terms))
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symplectic_layout() {
        let t = PauliTerm::from_paulis(1.0, &[PauliOp::X, PauliOp::Y, PauliOp::Z, PauliOp::I]);
        assert_eq!(
            t.symplectic,
            vec![true, true, false, false, false, true, true, false]
        );
        assert_eq!(t.label(), "XYZI");
        assert_eq!(
            t.support().collect::<Vec<_>>(),
            vec![(0, PauliOp::X), (1, PauliOp::Y), (2, PauliOp::Z)]
        );
    }

    #[test]
    fn test_identity_detection() {
        let obs: Observable = "2.5 II + 1.0 ZI + -0.5 II".parse().unwrap();
        assert_eq!(obs.non_identity_terms().count(), 1);
        assert!((obs.identity_coefficient() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_rejects_mismatched_width() {
        assert!("XX + Z".parse::<Observable>().is_err());
        assert!("1.0 XQ".parse::<Observable>().is_err());
        assert!("abc XX".parse::<Observable>().is_err());
    }

    #[test]
    fn test_from_terms_pads() {
        let obs = Observable::from_terms(vec![
            PauliTerm::from_paulis(1.0, &[PauliOp::Z]),
            PauliTerm::from_paulis(1.0, &[PauliOp::X, PauliOp::X]),
        ]);
        assert_eq!(obs.num_qubits(), 2);
        assert_eq!(obs.terms()[0].label(), "ZI");
    }

    #[test]
    fn test_odd_symplectic_rejected() {
        assert!(PauliTerm::from_symplectic(1.0, vec![true, false, true]).is_err());
    }
}
