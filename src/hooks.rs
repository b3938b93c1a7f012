//! Collaborator hooks.
//!
//! The engine core talks to its external collaborators (the object-code
//! recorder, the error-correction wrapper and the decoherence noise model)
//! through the [`Hooks`] capability set, injected at register construction.
//! [`NoHooks`] is the default: no recording, no error correction, no noise.

use std::{
    path::Path,
    sync::atomic::{AtomicIsize, Ordering},
};

use crate::{
    error::Result,
    math::{Mask, N, R, Z},
    operator::atomic::AtomicOpDispatch,
    register::Store,
};

/// One recorded gate application. Carried to [`Hooks::objcode_put`] exactly
/// once per executed gate, before any amplitude changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OpCode {
    Init { state: Mask },
    SigmaX { target: N },
    SigmaY { target: N },
    SigmaZ { target: N },
    Hadamard { target: N },
    CNot { control: N, target: N },
    Toffoli { controls: (N, N), target: N },
    SwapLeads { width: N },
    RotX { target: N, gamma: R },
    RotY { target: N, gamma: R },
    RotZ { target: N, gamma: R },
    PhaseKick { target: N, gamma: R },
    PhaseScale { target: N, gamma: R },
    CondPhase { control: N, target: N, gamma: R },
}

/// Capability set a register carries through its lifetime.
///
/// Every method has a no-op default, so a collaborator only implements the
/// hooks it cares about.
pub trait Hooks {
    /// Called once at register construction when the `QUOBFILE` environment
    /// variable names an object-code output file.
    fn objcode_file(&mut self, _path: &Path) {}

    /// Log a gate application. Returning `true` means the recorder handled
    /// the gate (replay mode) and the kernel must not execute it.
    fn objcode_put(&mut self, _op: &OpCode) -> bool {
        false
    }

    /// Whether error correction is active, and the active code id.
    fn qec_status(&self) -> (bool, N) {
        (false, 0)
    }

    /// Apply `op` in its fault-tolerant encoding. Only reached when
    /// [`qec_status`](Hooks::qec_status) reports active; the implementation
    /// drives [`Store::apply_raw`] with its encoded circuit.
    fn qec_apply(&mut self, _op: &AtomicOpDispatch, _psi: &mut Store) -> Result<()> {
        Ok(())
    }

    /// Called at the end of every executed gate. May perturb amplitudes to
    /// model environmental noise.
    fn decohere(&mut self, _psi: &mut Store) {}
}

/// The empty capability set.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct NoHooks;

impl Hooks for NoHooks {}

static MEM_TALLY: AtomicIsize = AtomicIsize::new(0);

/// Adjust the process-wide memory tally by `delta` bytes and return the new
/// total. Advisory; updates are lock-free but not transactional with the
/// allocations they describe.
pub fn memman(delta: Z) -> Z {
    MEM_TALLY.fetch_add(delta, Ordering::Relaxed) + delta
}

/// Current value of the memory tally.
pub fn memman_total() -> Z {
    MEM_TALLY.load(Ordering::Relaxed)
}
