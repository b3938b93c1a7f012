use super::*;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Op {
    control: N,
    target: N,
}

impl Op {
    #[inline(always)]
    pub fn new(control: N, target: N) -> Self {
        assert_ne!(control, target, "CNOT control and target must differ");
        Self { control, target }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("C{}_X{}", self.control, self.target)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::CNot {
            control: self.control,
            target: self.target,
        })
    }

    fn ft_form(&self) -> bool {
        true
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let c_mask = (1 as Mask) << self.control;
        let t_mask = (1 as Mask) << self.target;
        psi.update_each(|s, a| {
            if s & c_mask != 0 {
                (s ^ t_mask, a)
            } else {
                (s, a)
            }
        });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::CNot(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::CNot(self)
    }
}

#[cfg(test)]
#[test]
fn controlled_flip() {
    use crate::register::Reg;

    let mut reg = Reg::new(0b01, 2).unwrap();
    reg.apply(&crate::operator::cnot(0, 1)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b11, C_ONE)]);

    let mut reg = Reg::new(0b10, 2).unwrap();
    reg.apply(&crate::operator::cnot(0, 1)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b10, C_ONE)]);
}
