use super::*;
use crate::math::matrix::inverse_unitary_m1;

/// Arbitrary 2x2 operator on one target bit. Unitarity is the caller's
/// responsibility; non-unitary maps are accepted for the algebraic uses.
#[derive(Clone, Copy, PartialEq)]
pub struct Op {
    target: N,
    matrix: M1,
}

impl Op {
    pub fn new(target: N, matrix: M1) -> Self {
        Self { target, matrix }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!(
            "U{}{:?}",
            self.target,
            [&self.matrix[..2], &self.matrix[2..]]
        )
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        psi.gate1(self.target, &self.matrix)
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::U1(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::U1(Self {
            matrix: inverse_unitary_m1(&self.matrix),
            ..self
        })
    }
}

#[cfg(test)]
#[test]
fn pauli_x_as_matrix() {
    use crate::register::Reg;

    let not = [C_ZERO, C_ONE, C_ONE, C_ZERO];

    let mut reg = Reg::new(0b0, 2).unwrap();
    reg.apply(&crate::operator::u1(0, not)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b01, C_ONE)]);
}
