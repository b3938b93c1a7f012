use super::*;

#[derive(Clone, Copy, PartialEq)]
pub struct Op {
    target: N,
    gamma: R,
}

impl Op {
    #[inline(always)]
    pub fn new(target: N, gamma: R) -> Self {
        Self { target, gamma }
    }

    fn matrix(&self) -> M1 {
        let (sin, cos) = (self.gamma / 2.).sin_cos();
        let m_i_sin = C::new(0.0, -sin);
        [C::new(cos, 0.0), m_i_sin, m_i_sin, C::new(cos, 0.0)]
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("RX{}({})", self.target, self.gamma)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::RotX {
            target: self.target,
            gamma: self.gamma,
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        psi.gate1(self.target, &self.matrix())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::RX(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::RX(Self {
            gamma: -self.gamma,
            ..self
        })
    }
}

#[cfg(test)]
#[test]
fn pi_rotation() {
    use crate::register::Reg;

    // RX(pi) |0> = -i |1>
    let mut reg = Reg::new(0b0, 1).unwrap();
    reg.apply(&crate::operator::rx(0, PI)).unwrap();
    let entries: Vec<_> = reg.entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, 0b1);
    assert!((entries[0].1 + C_IMAG).norm_sqr() < 1e-18);
}
