use std::{
    collections::VecDeque,
    fmt,
    ops::{Mul, MulAssign},
};

use super::atomic::{AtomicOp, AtomicOpDispatch};

/// Gate queue.
///
/// A [`MultiOp`] is an ordered sequence of atomic gates, applied left to
/// right. Queues concatenate through [`Mul`], matching operator composition:
///
/// ```rust
/// use sparq::prelude::*;
///
/// let bell = op::h(0) * op::cnot(0, 1);
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct MultiOp(pub(crate) VecDeque<AtomicOpDispatch>);

impl MultiOp {
    /// Hermitian adjoint: every gate conjugated, order reversed.
    pub fn dgr(self) -> Self {
        Self(self.0.into_iter().map(AtomicOp::dgr).rev().collect())
    }
}

#[doc(hidden)]
impl std::ops::Deref for MultiOp {
    type Target = VecDeque<AtomicOpDispatch>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[doc(hidden)]
impl std::ops::DerefMut for MultiOp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Debug for MultiOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<AtomicOpDispatch> for MultiOp {
    fn from(op: AtomicOpDispatch) -> Self {
        Self(vec![op].into())
    }
}

impl Mul for MultiOp {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self.mul_assign(rhs);
        self
    }
}

impl MulAssign for MultiOp {
    fn mul_assign(&mut self, mut rhs: Self) {
        self.0.append(&mut rhs.0);
    }
}

#[cfg(test)]
mod tests {
    use crate::operator as op;

    #[test]
    fn queue_composition() {
        let ops = op::h(0) * op::cnot(0, 1) * op::z(1);
        assert_eq!(ops.len(), 3);
        assert_eq!(
            format!("{:?}", ops),
            "[Op { name: \"H0\" }, Op { name: \"C0_X1\" }, Op { name: \"Z1\" }]"
        );
    }

    #[test]
    fn adjoint_reverses() {
        let ops = (op::h(0) * op::rz(0, 1.0)).dgr();
        assert_eq!(
            format!("{:?}", ops),
            "[Op { name: \"RZ0(-1)\" }, Op { name: \"H0\" }]"
        );
    }
}
