//! Instructions as queued by the composer.

use std::fmt;

/// Gates that are their own inverse.
const SELF_ADJOINT: &[&str] = &["h", "x", "y", "z", "swap", "id"];

/// Gates whose inverse negates their angles.
const ROTATIONS: &[&str] = &["rx", "ry", "rz", "r1", "phased_rx", "u3"];

/// One gate application on qudit ids.
#[derive(Debug, Clone, PartialEq)]
pub struct QuditInstruction {
    /// Gate name (`"h"`, `"rx"`, …).
    pub name: String,
    /// Real parameters.
    pub params: Vec<f64>,
    /// Control ids, outermost first.
    pub controls: Vec<usize>,
    /// Target ids.
    pub targets: Vec<usize>,
    /// True if the gate's adjoint is applied.
    pub adjoint: bool,
}

impl QuditInstruction {
    /// Create an instruction.
    pub fn new(
        name: impl Into<String>,
        params: Vec<f64>,
        controls: Vec<usize>,
        targets: Vec<usize>,
        adjoint: bool,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            controls,
            targets,
            adjoint,
        }
    }

    /// The inverse instruction.
    ///
    /// - `h x y z swap id` are returned unchanged
    /// - `rx ry rz r1` negate their angle; `phased_rx(θ, φ)` negates `θ`
    /// - `u3(θ, φ, λ)` becomes `u3(-θ, -λ, -φ)`
    /// - anything else toggles the adjoint flag
    pub fn inverse(&self) -> Self {
        let mut inv = self.clone();
        let name = self.name.as_str();
        if SELF_ADJOINT.contains(&name) {
            return inv;
        }
        if ROTATIONS.contains(&name) {
            match (name, self.params.as_slice()) {
                ("u3", [theta, phi, lambda]) => inv.params = vec![-theta, -lambda, -phi],
                ("phased_rx", [theta, rest @ ..]) => {
                    inv.params = std::iter::once(-theta).chain(rest.iter().copied()).collect();
                }
                _ => inv.params = self.params.iter().map(|p| -p).collect(),
            }
            return inv;
        }
        inv.adjoint = !self.adjoint;
        inv
    }
}

impl fmt::Display for QuditInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.adjoint {
            write!(f, "adj ")?;
        }
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(|p| format!("{p:.6}")).collect();
            write!(f, "({})", params.join(", "))?;
        }
        if !self.controls.is_empty() {
            let controls: Vec<String> = self.controls.iter().map(|c| format!("q{c}")).collect();
            write!(f, " [{}]", controls.join(", "))?;
        }
        let targets: Vec<String> = self.targets.iter().map(|t| format!("q{t}")).collect();
        write!(f, " {}", targets.join(", "))
    }
}
