use super::*;

const SQRT_1_2: C = C {
    re: FRAC_1_SQRT_2,
    im: 0.0,
};

const H_MATRIX: M1 = [
    SQRT_1_2,
    SQRT_1_2,
    SQRT_1_2,
    C {
        re: -FRAC_1_SQRT_2,
        im: 0.0,
    },
];

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
        format!("H{}", self.target)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::Hadamard {
            target: self.target,
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        psi.gate1(self.target, &H_MATRIX)
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::H1(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::H1(self)
    }
}

#[cfg(test)]
#[test]
fn equal_superposition() {
    use crate::register::Reg;

    let mut reg = Reg::new(0b0, 1).unwrap();
    reg.apply(&crate::operator::h(0)).unwrap();
    let entries: Vec<_> = reg.entries().collect();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|(_, a)| (a - SQRT_1_2).norm_sqr() < 1e-18));
}
