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
            phase: phase_from_rad(gamma / 2.),
        }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("RZ{}({})", self.target, 2.0 * self.phase.arg())
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::RotZ {
            target: self.target,
            gamma: 2.0 * self.phase.arg(),
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let mask = (1 as Mask) << self.target;
        let phase = self.phase;
        psi.update_amps(|s, a| {
            if s & mask != 0 {
                a * phase
            } else {
                a * phase.conj()
            }
        });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::RZ(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::RZ(Self {
            phase: self.phase.conj(),
            ..self
        })
    }
}

#[cfg(test)]
#[test]
fn half_angle_phases() {
    use crate::{math, register::Reg};

    let mut reg = Reg::new(0b1, 1).unwrap();
    reg.apply(&crate::operator::rz(0, math::PI)).unwrap();
    let (_, a) = reg.entries().next().unwrap();
    assert!((a - C_IMAG).norm_sqr() < 1e-18);
}
