use super::*;

/// Global phase on every entry. Physically unobservable on its own, but the
/// relative phase matters once the register is a Kronecker factor.
#[derive(Clone, Copy, PartialEq)]
pub struct Op {
    target: N,
    phase: C,
}

impl Op {
    #[inline(always)]
    pub fn new(target: N, gamma: R) -> Self {
        Self {
            target,
            phase: phase_from_rad(gamma),
        }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("PSCALE{}({})", self.target, self.phase.arg())
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::PhaseScale {
            target: self.target,
            gamma: self.phase.arg(),
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let phase = self.phase;
        psi.update_amps(|_, a| a * phase);
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::PhaseScale(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::PhaseScale(Self {
            phase: self.phase.conj(),
            ..self
        })
    }
}
