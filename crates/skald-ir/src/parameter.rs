//! Gate angles: concrete values or expressions over kernel arguments.
//!
//! A kernel compiled without concrete arguments keeps its rotation angles
//! symbolic (`Arg("theta")`). Argument synthesis later binds every argument
//! and folds the expression down to a [`Angle::Constant`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

/// A rotation angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Angle {
    /// A concrete value in radians.
    Constant(f64),
    /// Reference to a named kernel argument.
    Arg(String),
    /// Negation.
    Neg(Box<Angle>),
    /// Sum of two angles.
    Add(Box<Angle>, Box<Angle>),
    /// Angle scaled by a constant factor.
    Scale(f64, Box<Angle>),
}

impl Angle {
    /// A concrete angle.
    pub fn constant(value: f64) -> Self {
        Angle::Constant(value)
    }

    /// A reference to the kernel argument `name`.
    pub fn arg(name: impl Into<String>) -> Self {
        Angle::Arg(name.into())
    }

    /// π/2, the Y-basis rotation angle.
    pub fn half_pi() -> Self {
        Angle::Constant(PI / 2.0)
    }

    /// True if the angle references at least one kernel argument.
    pub fn is_symbolic(&self) -> bool {
        match self {
            Angle::Constant(_) => false,
            Angle::Arg(_) => true,
            Angle::Neg(a) | Angle::Scale(_, a) => a.is_symbolic(),
            Angle::Add(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Evaluate to radians, if no argument is left unbound.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Angle::Constant(v) => Some(*v),
            Angle::Arg(_) => None,
            Angle::Neg(a) => a.as_f64().map(|v| -v),
            Angle::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            Angle::Scale(k, a) => a.as_f64().map(|v| k * v),
        }
    }

    /// True if the angle is a constant within `1e-12` of zero.
    pub fn is_zero(&self) -> bool {
        self.as_f64().is_some_and(|v| v.abs() < 1e-12)
    }

    /// Names of all referenced arguments, sorted and de-duplicated.
    pub fn arguments(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_arguments(&mut out);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_arguments<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Angle::Constant(_) => {}
            Angle::Arg(name) => out.push(name),
            Angle::Neg(a) | Angle::Scale(_, a) => a.collect_arguments(out),
            Angle::Add(a, b) => {
                a.collect_arguments(out);
                b.collect_arguments(out);
            }
        }
    }

    /// Substitute every bound argument and fold constant subexpressions.
    ///
    /// Arguments missing from `values` stay symbolic.
    pub fn bind(&self, values: &BTreeMap<String, f64>) -> Self {
        let bound = match self {
            Angle::Arg(name) => match values.get(name) {
                Some(v) => Angle::Constant(*v),
                None => self.clone(),
            },
            Angle::Constant(_) => self.clone(),
            Angle::Neg(a) => Angle::Neg(Box::new(a.bind(values))),
            Angle::Add(a, b) => Angle::Add(Box::new(a.bind(values)), Box::new(b.bind(values))),
            Angle::Scale(k, a) => Angle::Scale(*k, Box::new(a.bind(values))),
        };
        match bound.as_f64() {
            Some(v) => Angle::Constant(v),
            None => bound,
        }
    }

    /// The negated angle, folded when concrete.
    #[must_use]
    pub fn negated(&self) -> Self {
        match self {
            Angle::Constant(v) => Angle::Constant(-v),
            Angle::Neg(a) => (**a).clone(),
            other => Angle::Neg(Box::new(other.clone())),
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Constant(v) => write!(f, "{v}"),
            Angle::Arg(name) => write!(f, "{name}"),
            Angle::Neg(a) => write!(f, "-({a})"),
            Angle::Add(a, b) => write!(f, "({a} + {b})"),
            Angle::Scale(k, a) => write!(f, "{k}*{a}"),
        }
    }
}

impl From<f64> for Angle {
    fn from(value: f64) -> Self {
        Angle::Constant(value)
    }
}

impl std::ops::Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let a = Angle::constant(1.5);
        assert!(!a.is_symbolic());
        assert_eq!(a.as_f64(), Some(1.5));
    }

    #[test]
    fn test_bind_folds_expression() {
        let theta = Angle::Add(
            Box::new(Angle::Scale(2.0, Box::new(Angle::arg("theta")))),
            Box::new(Angle::constant(0.5)),
        );
        assert!(theta.is_symbolic());
        assert_eq!(theta.arguments(), vec!["theta"]);

        let mut values = BTreeMap::new();
        values.insert("theta".to_string(), 1.0);
        assert_eq!(theta.bind(&values), Angle::Constant(2.5));
    }

    #[test]
    fn test_partial_bind_stays_symbolic() {
        let sum = Angle::Add(Box::new(Angle::arg("a")), Box::new(Angle::arg("b")));
        let mut values = BTreeMap::new();
        values.insert("a".to_string(), 1.0);
        let bound = sum.bind(&values);
        assert!(bound.is_symbolic());
        assert_eq!(bound.arguments(), vec!["b"]);
    }

    #[test]
    fn test_negated_twice_is_identity() {
        let a = Angle::arg("phi");
        assert_eq!(a.negated().negated(), a);
        assert_eq!(Angle::constant(0.25).negated(), Angle::Constant(-0.25));
    }

    #[test]
    fn test_is_zero() {
        assert!(Angle::constant(0.0).is_zero());
        assert!(!Angle::constant(0.1).is_zero());
        assert!(!Angle::arg("x").is_zero());
    }
}
