//! Instruction composition under adjoint and control regions.
//!
//! The [`InstructionComposer`] owns the qudit pool, a queue of instructions
//! waiting to be flushed into the [`QuantumState`], and two region stacks:
//!
//! - adjoint regions buffer instructions and replay them reversed and
//!   inverted when closed, into the enclosing region or the queue;
//! - control regions add their ids as controls to every instruction applied
//!   while they are open, outermost region first.
//!
//! One composer serves one kernel execution; it is not shared across threads.

use std::collections::VecDeque;
use std::f64::consts::FRAC_PI_2;

use skald_hal::{ExecutionContext, ExecutionResult, ResultSet};
use skald_ir::{Observable, PauliOp};
use tracing::{debug, warn};

use crate::allocator::{DEFAULT_CAPACITY, QuditAllocator, QuditInfo};
use crate::error::{RuntimeError, RuntimeResult};
use crate::instruction::QuditInstruction;
use crate::state::QuantumState;

/// Shots sampled per term when no context requests a count.
pub const DEFAULT_OBSERVE_SHOTS: u32 = 1000;

/// Outcome of measuring an observable on the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserveResult {
    /// `Σ re(coeff) · ⟨term⟩`, identity terms included.
    pub expectation: f64,
    /// Per-term sampled counts, labeled by Pauli word.
    pub distribution: ResultSet,
}

/// Queues, scopes and flushes qudit instructions.
pub struct InstructionComposer<S: QuantumState> {
    allocator: QuditAllocator,
    state: S,
    queue: VecDeque<QuditInstruction>,
    adjoint_stack: Vec<Vec<QuditInstruction>>,
    ctrl_stack: Vec<Vec<usize>>,
    context: Option<ExecutionContext>,
}

impl<S: QuantumState> InstructionComposer<S> {
    /// Create a composer over `state` with the default pool size.
    pub fn new(state: S) -> Self {
        Self::with_capacity(state, DEFAULT_CAPACITY)
    }

    /// Create a composer with `capacity` qudit ids.
    pub fn with_capacity(state: S, capacity: usize) -> Self {
        Self {
            allocator: QuditAllocator::new(capacity),
            state,
            queue: VecDeque::new(),
            adjoint_stack: Vec::new(),
            ctrl_stack: Vec::new(),
            context: None,
        }
    }

    /// Allocate a qudit with `levels` levels.
    pub fn allocate(&mut self, levels: usize) -> RuntimeResult<QuditInfo> {
        let qudit = self.allocator.allocate(levels)?;
        self.state.allocate(&qudit)?;
        Ok(qudit)
    }

    /// Release a qudit. Pending instructions are flushed first.
    pub fn release(&mut self, qudit: &QuditInfo) -> RuntimeResult<()> {
        self.synchronize()?;
        self.allocator.release(qudit)?;
        self.state.release(qudit)
    }

    /// True if any qudit is still allocated; logs a warning if so.
    pub fn leak_check(&self) -> bool {
        let leaked = self.allocator.leak_check();
        if leaked {
            warn!(
                allocated = self.allocator.num_allocated(),
                "qudits still allocated at teardown"
            );
        }
        leaked
    }

    /// Queue one gate application.
    ///
    /// Active control regions contribute their ids ahead of `controls`.
    pub fn apply(
        &mut self,
        name: impl Into<String>,
        params: &[f64],
        controls: &[usize],
        targets: &[usize],
        adjoint: bool,
    ) {
        let effective: Vec<usize> = self
            .ctrl_stack
            .iter()
            .flatten()
            .chain(controls)
            .copied()
            .collect();
        let instruction = QuditInstruction::new(
            name,
            params.to_vec(),
            effective,
            targets.to_vec(),
            adjoint,
        );
        match self.adjoint_stack.last_mut() {
            Some(buffer) => buffer.push(instruction),
            None => self.queue.push_back(instruction),
        }
    }

    /// Open an adjoint region.
    pub fn start_adjoint_region(&mut self) {
        self.adjoint_stack.push(Vec::new());
    }

    /// Close the innermost adjoint region.
    ///
    /// Its instructions are inverted and replayed in reverse order.
    pub fn end_adjoint_region(&mut self) -> RuntimeResult<()> {
        let buffer = self.adjoint_stack.pop().ok_or_else(|| {
            RuntimeError::RegionStack("end_adjoint_region without a matching start".into())
        })?;
        let inverted = buffer.iter().rev().map(QuditInstruction::inverse);
        match self.adjoint_stack.last_mut() {
            Some(parent) => parent.extend(inverted),
            None => self.queue.extend(inverted),
        }
        Ok(())
    }

    /// Open a control region over `ids`.
    pub fn start_ctrl_region(&mut self, ids: impl Into<Vec<usize>>) {
        self.ctrl_stack.push(ids.into());
    }

    /// Close the innermost control region, which must hold `n` ids.
    pub fn end_ctrl_region(&mut self, n: usize) -> RuntimeResult<()> {
        match self.ctrl_stack.last() {
            None => Err(RuntimeError::RegionStack(
                "end_ctrl_region without a matching start".into(),
            )),
            Some(top) if top.len() != n => Err(RuntimeError::RegionStack(format!(
                "end_ctrl_region({n}) does not match the {} ids of the open region",
                top.len()
            ))),
            Some(_) => {
                self.ctrl_stack.pop();
                Ok(())
            }
        }
    }

    /// Measure one qudit after flushing the queue.
    pub fn measure(&mut self, qudit: &QuditInfo) -> RuntimeResult<usize> {
        self.reject_inside_adjoint("measure")?;
        self.synchronize()?;
        let outcome = self.state.measure(qudit)?;
        debug!(%qudit, outcome, "measured");
        Ok(outcome)
    }

    /// Estimate `⟨observable⟩` on the current state.
    ///
    /// Term qubit `i` is qudit id `i`, which must be allocated. Each term is
    /// rotated into the Z basis, sampled, and rotated back.
    pub fn measure_observable(&mut self, observable: &Observable) -> RuntimeResult<ObserveResult> {
        self.reject_inside_adjoint("measure_observable")?;
        self.synchronize()?;

        if let Some(q) = (0..observable.num_qubits()).find(|&q| !self.allocator.is_allocated(q)) {
            return Err(RuntimeError::State(format!(
                "observable acts on qudit {q}, which is not allocated"
            )));
        }

        let shots = self
            .context
            .as_ref()
            .and_then(ExecutionContext::shots)
            .unwrap_or(DEFAULT_OBSERVE_SHOTS);

        let mut expectation = observable.identity_coefficient();
        let mut distribution = ResultSet::new();
        for term in observable.non_identity_terms() {
            let support: Vec<(usize, PauliOp)> = term.support().collect();

            self.rotate_basis(&support, false)?;
            let targets: Vec<QuditInfo> = support.iter().map(|&(q, _)| QuditInfo::qubit(q)).collect();
            let (correlation, counts) = self.state.measure_z_basis(&targets, shots)?;
            self.rotate_basis(&support, true)?;

            debug!(term = %term.label(), correlation, "term measured");
            expectation += term.coefficient.re * correlation;
            distribution.push(ExecutionResult::new(term.label(), counts).with_expectation(correlation));
        }

        Ok(ObserveResult {
            expectation,
            distribution,
        })
    }

    fn rotate_basis(&mut self, support: &[(usize, PauliOp)], undo: bool) -> RuntimeResult<()> {
        for &(q, op) in support {
            let instruction = match op {
                PauliOp::X => QuditInstruction::new("h", vec![], vec![], vec![q], false),
                PauliOp::Y => {
                    let angle = if undo { -FRAC_PI_2 } else { FRAC_PI_2 };
                    QuditInstruction::new("rx", vec![angle], vec![], vec![q], false)
                }
                PauliOp::Z | PauliOp::I => continue,
            };
            self.state.apply(&instruction)?;
        }
        Ok(())
    }

    fn reject_inside_adjoint(&self, op: &str) -> RuntimeResult<()> {
        if self.adjoint_stack.is_empty() {
            Ok(())
        } else {
            Err(RuntimeError::RegionStack(format!(
                "{op} is not allowed inside an adjoint region"
            )))
        }
    }

    /// Flush every queued instruction into the state, in order.
    pub fn synchronize(&mut self) -> RuntimeResult<()> {
        while let Some(instruction) = self.queue.pop_front() {
            self.state.apply(&instruction)?;
        }
        Ok(())
    }

    /// Attach an execution context.
    pub fn set_execution_context(&mut self, context: ExecutionContext) {
        self.context = Some(context);
    }

    /// Detach and return the execution context.
    pub fn reset_execution_context(&mut self) -> Option<ExecutionContext> {
        self.context.take()
    }

    /// The attached execution context.
    pub fn execution_context(&self) -> Option<&ExecutionContext> {
        self.context.as_ref()
    }

    /// Instructions waiting to be flushed.
    pub fn queued(&self) -> impl Iterator<Item = &QuditInstruction> {
        self.queue.iter()
    }

    /// Number of open adjoint regions.
    pub fn adjoint_depth(&self) -> usize {
        self.adjoint_stack.len()
    }

    /// Number of open control regions.
    pub fn control_depth(&self) -> usize {
        self.ctrl_stack.len()
    }

    /// The qudit pool.
    pub fn allocator(&self) -> &QuditAllocator {
        &self.allocator
    }

    /// The backing state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Consume the composer and return its state.
    pub fn into_state(self) -> S {
        self.state
    }
}
