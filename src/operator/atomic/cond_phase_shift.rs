use super::*;

/// Half-angle phase shift on the target, gated on the control: `e^{i g/2}`
/// when the target is set, `e^{-i g/2}` when clear.
#[derive(Clone, Copy, PartialEq)]
pub struct Op {
    control: N,
    target: N,
    phase: C,
}

impl Op {
    #[inline(always)]
    pub fn new(control: N, target: N, gamma: R) -> Self {
        assert_ne!(control, target, "control and target must differ");
        Self {
            control,
            target,
            phase: phase_from_rad(gamma / 2.),
        }
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!(
            "C{}_RZ{}({})",
            self.control,
            self.target,
            2.0 * self.phase.arg()
        )
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::CondPhase {
            control: self.control,
            target: self.target,
            gamma: 2.0 * self.phase.arg(),
        })
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        let c_mask = (1 as Mask) << self.control;
        let t_mask = (1 as Mask) << self.target;
        let phase = self.phase;
        psi.update_amps(|s, a| {
            if s & c_mask != 0 {
                if s & t_mask != 0 {
                    a * phase
                } else {
                    a * phase.conj()
                }
            } else {
                a
            }
        });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::CondPhaseShift(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::CondPhaseShift(Self {
            phase: self.phase.conj(),
            ..self
        })
    }
}
