use super::*;

/// Phase applied when both control and target are set. Covers the Fourier
/// ladder form `e^{i pi / 2^(c-t)}` and the free-angle kick.
#[derive(Clone, Copy, PartialEq)]
pub struct Op {
    control: N,
    target: N,
    phase: C,
}

impl Op {
    /// The quantum-Fourier-transform ladder phase, `gamma = pi / 2^(c-t)`.
    #[inline(always)]
    pub fn new(control: N, target: N) -> Self {
        assert!(
            control > target,
            "conditional phase expects control above target"
        );
        let gamma = PI / ((1 as Mask) << (control - target)) as R;
        Self::with_gamma(control, target, gamma)
    }

    #[inline(always)]
    pub fn with_gamma(control: N, target: N, gamma: R) -> Self {
        assert_ne!(control, target, "control and target must differ");
        Self {
            control,
            target,
            phase: phase_from_rad(gamma),
        }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!(
            "C{}_PKICK{}({})",
            self.control,
            self.target,
            self.phase.arg()
        )
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::CondPhase {
            control: self.control,
            target: self.target,
            gamma: self.phase.arg(),
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let mask = ((1 as Mask) << self.control) | ((1 as Mask) << self.target);
        let phase = self.phase;
        psi.update_amps(|s, a| if s & mask == mask { a * phase } else { a });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::CondPhase(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::CondPhase(Self {
            phase: self.phase.conj(),
            ..self
        })
    }
}

#[cfg(test)]
#[test]
fn ladder_phase() {
    use crate::register::Reg;

    // c - t = 2: phase pi/4 on |101>
    let mut reg = Reg::new(0b101, 3).unwrap();
    reg.apply(&crate::operator::cond_phase(2, 0)).unwrap();
    let (_, a) = reg.entries().next().unwrap();
    assert!((a - phase_from_rad(FRAC_PI_4)).norm_sqr() < 1e-18);

    // control clear: untouched
    let mut reg = Reg::new(0b001, 3).unwrap();
    reg.apply(&crate::operator::cond_phase(2, 0)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b001, C_ONE)]);
}
