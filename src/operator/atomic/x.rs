use super::*;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Op {
    target: N,
}

impl Op {
    #[inline(always)]
    pub fn new(target: N) -> Self {
        Self { target }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("X{}", self.target)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::SigmaX {
            target: self.target,
        })
    }

    fn ft_form(&self) -> bool {
        true
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let mask = (1 as Mask) << self.target;
        psi.update_each(|s, a| (s ^ mask, a));
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::X(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::X(self)
    }
}

#[cfg(test)]
#[test]
fn flips_target() {
    use crate::register::Reg;

    let mut reg = Reg::new(0b11, 2).unwrap();
    reg.apply(&crate::operator::x(0)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b10, C_ONE)]);

    let op = Op::new(5);
    assert_eq!(op.name(), "X5");
}
