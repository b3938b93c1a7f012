use super::*;
use crate::math::matrix::inverse_unitary_m2;

/// Arbitrary 4x4 operator on two target bits. Row-major in the group index
/// `bitmask(label, [target1, target2])`.
#[derive(Clone, Copy, PartialEq)]
pub struct Op {
    target1: N,
    target2: N,
    matrix: M2,
}

impl Op {
    pub fn new(target1: N, target2: N, matrix: M2) -> Self {
        assert_ne!(target1, target2, "target bits must differ");
        Self {
            target1,
            target2,
            matrix,
        }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!(
            "U{},{}{:?}",
            self.target1,
            self.target2,
            [
                &self.matrix[..4],
                &self.matrix[4..8],
                &self.matrix[8..12],
                &self.matrix[12..]
            ]
        )
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        psi.gate2(self.target1, self.target2, &self.matrix)
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::U2(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::U2(Self {
            matrix: inverse_unitary_m2(&self.matrix),
            ..self
        })
    }
}
