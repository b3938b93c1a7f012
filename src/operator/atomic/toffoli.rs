use super::*;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Op {
    control1: N,
    control2: N,
    target: N,
}

impl Op {
    #[inline(always)]
    pub fn new(control1: N, control2: N, target: N) -> Self {
        assert!(
            control1 != target && control2 != target && control1 != control2,
            "Toffoli bits must be distinct"
        );
        Self {
            control1,
            control2,
            target,
        }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("C{}C{}_X{}", self.control1, self.control2, self.target)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::Toffoli {
            controls: (self.control1, self.control2),
            target: self.target,
        })
    }

    fn ft_form(&self) -> bool {
        true
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let c_mask = ((1 as Mask) << self.control1) | ((1 as Mask) << self.control2);
        let t_mask = (1 as Mask) << self.target;
        psi.update_each(|s, a| {
            if s & c_mask == c_mask {
                (s ^ t_mask, a)
            } else {
                (s, a)
            }
        });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::Toffoli(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::Toffoli(self)
    }
}

#[cfg(test)]
#[test]
fn double_controlled_flip() {
    use crate::register::Reg;

    let mut reg = Reg::new(0b011, 3).unwrap();
    reg.apply(&crate::operator::toffoli(0, 1, 2)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b111, C_ONE)]);

    let mut reg = Reg::new(0b001, 3).unwrap();
    reg.apply(&crate::operator::toffoli(0, 1, 2)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b001, C_ONE)]);
}
