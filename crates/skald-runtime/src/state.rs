//! The quantum-state collaborator.
//!
//! The composer never simulates anything itself; it flushes instructions and
//! measurement requests into a [`QuantumState`]. [`TraceState`] is the
//! built-in implementation: it records what it was asked to do and answers
//! every measurement with a fixed outcome.

use skald_hal::Counts;

use crate::allocator::QuditInfo;
use crate::error::{RuntimeError, RuntimeResult};
use crate::instruction::QuditInstruction;

/// Backing state that flushed instructions are applied to.
pub trait QuantumState {
    /// A qudit id became live.
    fn allocate(&mut self, qudit: &QuditInfo) -> RuntimeResult<()>;

    /// A qudit id was released.
    fn release(&mut self, qudit: &QuditInfo) -> RuntimeResult<()>;

    /// Apply one instruction.
    fn apply(&mut self, instruction: &QuditInstruction) -> RuntimeResult<()>;

    /// Measure one qudit, returning a level in `0..qudit.levels`.
    fn measure(&mut self, qudit: &QuditInfo) -> RuntimeResult<usize>;

    /// Sample `targets` in the Z basis without collapsing the state.
    ///
    /// Returns the Z-parity correlation `⟨Z⊗…⊗Z⟩` and the sampled counts.
    fn measure_z_basis(&mut self, targets: &[QuditInfo], shots: u32) -> RuntimeResult<(f64, Counts)>;
}

/// A state that records operations instead of evolving amplitudes.
#[derive(Debug, Clone, Default)]
pub struct TraceState {
    log: Vec<String>,
    outcome: usize,
}

impl TraceState {
    /// Create an empty trace; measurements report 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `outcome` for every single-qudit measurement.
    #[must_use]
    pub fn with_outcome(mut self, outcome: usize) -> Self {
        self.outcome = outcome;
        self
    }

    /// Recorded operations, in order.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Consume the trace and return its log.
    pub fn into_log(self) -> Vec<String> {
        self.log
    }
}

impl QuantumState for TraceState {
    fn allocate(&mut self, qudit: &QuditInfo) -> RuntimeResult<()> {
        self.log.push(format!("alloc {qudit}"));
        Ok(())
    }

    fn release(&mut self, qudit: &QuditInfo) -> RuntimeResult<()> {
        self.log.push(format!("release {qudit}"));
        Ok(())
    }

    fn apply(&mut self, instruction: &QuditInstruction) -> RuntimeResult<()> {
        self.log.push(instruction.to_string());
        Ok(())
    }

    fn measure(&mut self, qudit: &QuditInfo) -> RuntimeResult<usize> {
        if self.outcome >= qudit.levels {
            return Err(RuntimeError::State(format!(
                "outcome {} out of range for {qudit}",
                self.outcome
            )));
        }
        self.log.push(format!("measure {qudit} -> {}", self.outcome));
        Ok(self.outcome)
    }

    fn measure_z_basis(&mut self, targets: &[QuditInfo], shots: u32) -> RuntimeResult<(f64, Counts)> {
        let bits = if self.outcome % 2 == 0 { '0' } else { '1' };
        let word: String = targets.iter().map(|_| bits).collect();
        let parity = if bits == '1' && targets.len() % 2 == 1 { -1.0 } else { 1.0 };
        let names: Vec<String> = targets.iter().map(ToString::to_string).collect();
        self.log.push(format!("sample-z {} x{shots}", names.join(", ")));
        Ok((parity, Counts::from_pairs([(word, u64::from(shots))])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_records_in_order() {
        let mut state = TraceState::new();
        let q = QuditInfo::qubit(0);
        state.allocate(&q).unwrap();
        state
            .apply(&QuditInstruction::new("h", vec![], vec![], vec![0], false))
            .unwrap();
        assert_eq!(state.measure(&q).unwrap(), 0);
        assert_eq!(state.log(), ["alloc q0", "h q0", "measure q0 -> 0"]);
    }

    #[test]
    fn test_trace_outcome_must_fit_levels() {
        let mut state = TraceState::new().with_outcome(2);
        assert!(state.measure(&QuditInfo::qubit(0)).is_err());
        assert_eq!(state.measure(&QuditInfo::new(3, 0)).unwrap(), 2);
    }

    #[test]
    fn test_trace_z_basis_parity() {
        let mut state = TraceState::new().with_outcome(1);
        let targets = [QuditInfo::qubit(0), QuditInfo::qubit(1), QuditInfo::qubit(2)];
        let (parity, counts) = state.measure_z_basis(&targets, 8).unwrap();
        assert_eq!(parity, -1.0);
        assert_eq!(counts.get("111"), 8);
        assert_eq!(parity, counts.parity_expectation());
    }
}
