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
        format!("Z{}", self.target)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::SigmaZ {
            target: self.target,
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let mask = (1 as Mask) << self.target;
        psi.update_amps(|s, a| if s & mask != 0 { -a } else { a });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::Z(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::Z(self)
    }
}

#[cfg(test)]
#[test]
fn negates_set_bit() {
    use crate::register::Reg;

    let mut reg = Reg::new(0b1, 1).unwrap();
    reg.apply(&crate::operator::z(0)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b1, -C_ONE)]);
}
