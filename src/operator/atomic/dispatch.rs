#![allow(clippy::upper_case_acronyms)]

use std::fmt;

use super::*;

pub type X = x::Op;
pub type Y = y::Op;
pub type Z = z::Op;
pub type CNot = cnot::Op;
pub type Toffoli = toffoli::Op;
pub type MCNot = mcnot::Op;
pub type RZ = rz::Op;
pub type PhaseScale = phase_scale::Op;
pub type PhaseKick = phase_kick::Op;
pub type CondPhase = cond_phase::Op;
pub type CondPhaseShift = cond_phase_shift::Op;
pub type SwapLeads = swap_leads::Op;
pub type H1 = h1::Op;
pub type RX = rx::Op;
pub type RY = ry::Op;
pub type U1 = u1::Op;
pub type U2 = u2::Op;

#[enum_dispatch::enum_dispatch(AtomicOpDispatch)]
pub trait AtomicOp: Clone + PartialEq + crate::sealed::Seal {
    fn name(&self) -> String;

    /// Object-code record for this gate, when it has one.
    fn opcode(&self) -> Option<OpCode> {
        None
    }

    /// Whether the gate has a fault-tolerant re-expression and must consult
    /// the error-correction collaborator before executing.
    fn ft_form(&self) -> bool {
        false
    }

    /// Execute the kernel against the store, hooks aside.
    fn apply_to(&self, psi: &mut Store) -> Result<()>;

    fn this(self) -> AtomicOpDispatch;

    /// Hermitian adjoint.
    fn dgr(self) -> AtomicOpDispatch;
}

#[enum_dispatch::enum_dispatch]
#[derive(Clone, PartialEq)]
pub enum AtomicOpDispatch {
    X,
    Y,
    Z,
    CNot,
    Toffoli,
    MCNot,
    RZ,
    PhaseScale,
    PhaseKick,
    CondPhase,
    CondPhaseShift,
    SwapLeads,
    H1,
    RX,
    RY,
    U1,
    U2,
}

impl crate::sealed::Seal for AtomicOpDispatch {}

impl fmt::Debug for AtomicOpDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Op").field("name", &self.name()).finish()
    }
}
