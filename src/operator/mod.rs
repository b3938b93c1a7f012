//! Quantum gates.
//!
//! Each constructor returns a [`MultiOp`] queue ready for
//! [`Reg::apply`](crate::register::Reg::apply). Gates address qubits by bit
//! index; controlled gates take their control indices explicitly. Queues are
//! lazy and compose with `*`:
//!
//! ```rust
//! use sparq::prelude::*;
//!
//! let mut reg = QReg::new(0, 2).unwrap();
//! reg.apply(&(op::h(0) * op::cnot(0, 1))).unwrap();
//! ```

pub use self::{atomic::AtomicOp, multi::MultiOp};
use crate::math::{M1, M2, N, R};

pub mod atomic;
mod multi;

/// Pauli `X` (NOT) gate on the target qubit.
///
/// ```X |0> = |1>```&nbsp;&nbsp;&nbsp;```X |1> = |0>```
#[inline(always)]
pub fn x(target: N) -> MultiOp {
    atomic::X::new(target).this().into()
}

/// Pauli `Y` gate on the target qubit.
///
/// ```Y |0> = i|1>```&nbsp;&nbsp;&nbsp;```Y |1> = -i|0>```
#[inline(always)]
pub fn y(target: N) -> MultiOp {
    atomic::Y::new(target).this().into()
}

/// Pauli `Z` gate: negates the amplitude of states with the target bit set.
#[inline(always)]
pub fn z(target: N) -> MultiOp {
    atomic::Z::new(target).this().into()
}

/// Hadamard gate.
///
/// ```H |0> = (|0> + |1>) / sqrt(2)```&nbsp;&nbsp;&nbsp;
/// ```H |1> = (|0> - |1>) / sqrt(2)```
#[inline(always)]
pub fn h(target: N) -> MultiOp {
    atomic::H1::new(target).this().into()
}

/// Walsh-Hadamard transform: a Hadamard on every qubit below `width`.
pub fn walsh(width: N) -> MultiOp {
    (0..width).fold(MultiOp::default(), |ops, t| ops * h(t))
}

/// Controlled NOT: flips the target bit of states whose control bit is set.
#[inline(always)]
pub fn cnot(control: N, target: N) -> MultiOp {
    atomic::CNot::new(control, target).this().into()
}

/// Toffoli (controlled-controlled NOT).
#[inline(always)]
pub fn toffoli(control1: N, control2: N, target: N) -> MultiOp {
    atomic::Toffoli::new(control1, control2, target).this().into()
}

/// NOT under an arbitrary list of controls. Not an elementary gate on most
/// physical realizations.
#[inline(always)]
pub fn unbounded_toffoli(controls: &[N], target: N) -> MultiOp {
    atomic::MCNot::new(controls, target).this().into()
}

/// Rotation about the x-axis by `gamma` radians.
#[inline(always)]
pub fn rx(target: N, gamma: R) -> MultiOp {
    atomic::RX::new(target, gamma).this().into()
}

/// Rotation about the y-axis by `gamma` radians.
#[inline(always)]
pub fn ry(target: N, gamma: R) -> MultiOp {
    atomic::RY::new(target, gamma).this().into()
}

/// Rotation about the z-axis by `gamma` radians:
/// `e^{i gamma/2}` on set target, `e^{-i gamma/2}` on clear.
#[inline(always)]
pub fn rz(target: N, gamma: R) -> MultiOp {
    atomic::RZ::new(target, gamma).this().into()
}

/// Global phase `e^{i gamma}` on every amplitude.
#[inline(always)]
pub fn phase_scale(target: N, gamma: R) -> MultiOp {
    atomic::PhaseScale::new(target, gamma).this().into()
}

/// Phase kick `e^{i gamma}` on states with the target bit set.
#[inline(always)]
pub fn phase_kick(target: N, gamma: R) -> MultiOp {
    atomic::PhaseKick::new(target, gamma).this().into()
}

/// Conditional phase `e^{i pi / 2^(control - target)}` on states with both
/// bits set; the phase ladder of the quantum Fourier transform.
#[inline(always)]
pub fn cond_phase(control: N, target: N) -> MultiOp {
    atomic::CondPhase::new(control, target).this().into()
}

/// Inverse of [`cond_phase`].
#[inline(always)]
pub fn cond_phase_inv(control: N, target: N) -> MultiOp {
    atomic::CondPhase::new(control, target).dgr().into()
}

/// Conditional phase kick `e^{i gamma}` on states with both bits set.
#[inline(always)]
pub fn cond_phase_kick(control: N, target: N, gamma: R) -> MultiOp {
    atomic::CondPhase::with_gamma(control, target, gamma)
        .this()
        .into()
}

/// Conditional half-angle shift: with the control set, multiplies by
/// `e^{i gamma/2}` or `e^{-i gamma/2}` depending on the target bit.
#[inline(always)]
pub fn cond_phase_shift(control: N, target: N, gamma: R) -> MultiOp {
    atomic::CondPhaseShift::new(control, target, gamma)
        .this()
        .into()
}

/// Swap the low `width` qubits with qubits `width..2*width`.
#[inline(always)]
pub fn swap_leads(width: N) -> MultiOp {
    atomic::SwapLeads::new(width).this().into()
}

/// Arbitrary 2x2 operator on the target bit. `matrix` is row-major, row 0
/// acting on the target-clear component.
#[inline(always)]
pub fn u1(target: N, matrix: M1) -> MultiOp {
    atomic::U1::new(target, matrix).this().into()
}

/// Arbitrary 4x4 operator on two target bits. `matrix` is row-major in the
/// group index whose bit 0 is `target1`'s bit and bit 1 is `target2`'s.
#[inline(always)]
pub fn u2(target1: N, target2: N, matrix: M2) -> MultiOp {
    atomic::U2::new(target1, target2, matrix).this().into()
}
