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
        format!("Y{}", self.target)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::SigmaY {
            target: self.target,
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let mask = (1 as Mask) << self.target;
        psi.update_each(|s, a| {
            let s = s ^ mask;
            // +i when the flipped bit comes up set, -i otherwise
            if s & mask != 0 {
                (s, a * C_IMAG)
            } else {
                (s, -a * C_IMAG)
            }
        });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::Y(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::Y(self)
    }
}

#[cfg(test)]
#[test]
fn imaginary_flip() {
    use crate::register::Reg;

    let mut reg = Reg::new(0b0, 1).unwrap();
    reg.apply(&crate::operator::y(0)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b1, C_IMAG)]);

    let mut reg = Reg::new(0b1, 1).unwrap();
    reg.apply(&crate::operator::y(0)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b0, -C_IMAG)]);
}
