use super::*;

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
        format!("PKICK{}({})", self.target, self.phase.arg())
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::PhaseKick {
            target: self.target,
            gamma: self.phase.arg(),
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let mask = (1 as Mask) << self.target;
        let phase = self.phase;
        psi.update_amps(|s, a| if s & mask != 0 { a * phase } else { a });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::PhaseKick(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::PhaseKick(Self {
            phase: self.phase.conj(),
            ..self
        })
    }
}

#[cfg(test)]
#[test]
fn kicks_set_bit_only() {
    use crate::{math, register::Reg};

    let mut reg = Reg::new(0b0, 1).unwrap();
    reg.apply(&crate::operator::phase_kick(0, math::FRAC_PI_2))
        .unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b0, C_ONE)]);

    let mut reg = Reg::new(0b1, 1).unwrap();
    reg.apply(&crate::operator::phase_kick(0, math::FRAC_PI_2))
        .unwrap();
    let (_, a) = reg.entries().next().unwrap();
    assert!((a - C_IMAG).norm_sqr() < 1e-18);
}
