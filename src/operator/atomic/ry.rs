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
        [
            C::new(cos, 0.0),
            C::new(-sin, 0.0),
            C::new(sin, 0.0),
            C::new(cos, 0.0),
        ]
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("RY{}({})", self.target, self.gamma)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::RotY {
            target: self.target,
            gamma: self.gamma,
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        psi.gate1(self.target, &self.matrix())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::RY(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::RY(Self {
            gamma: -self.gamma,
            ..self
        })
    }
}
