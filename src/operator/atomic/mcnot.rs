use super::*;

/// NOT under an unbounded list of controls. Not an elementary gate; it has
/// no object-code form and no fault-tolerant re-expression.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Op {
    c_mask: Mask,
    target: N,
}

impl Op {
    pub fn new(controls: &[N], target: N) -> Self {
        let c_mask = controls.iter().fold(0, |m, &c| {
            assert_ne!(c, target, "controls must not contain the target");
            m | ((1 as Mask) << c)
        });
        Self { c_mask, target }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("MC{}_X{}", self.c_mask, self.target)
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let c_mask = self.c_mask;
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
        AtomicOpDispatch::MCNot(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::MCNot(self)
    }
}

#[cfg(test)]
#[test]
fn all_controls_required() {
    use crate::register::Reg;

    let mut reg = Reg::new(0b0111, 4).unwrap();
    reg.apply(&crate::operator::unbounded_toffoli(&[0, 1, 2], 3))
        .unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b1111, C_ONE)]);

    let mut reg = Reg::new(0b0101, 4).unwrap();
    reg.apply(&crate::operator::unbounded_toffoli(&[0, 1, 2], 3))
        .unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b0101, C_ONE)]);

    // no controls degenerates to a plain NOT
    let mut reg = Reg::new(0b0, 1).unwrap();
    reg.apply(&crate::operator::unbounded_toffoli(&[], 0)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b1, C_ONE)]);
}
