use super::*;

/// Exchange the low `leads` qubits with qubits `leads..2*leads` by renaming
/// labels. Under error correction the same permutation is produced by three
/// CNOTs per bit pair instead; the apply prologue handles that expansion.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Op {
    leads: N,
}

impl Op {
    #[inline(always)]
    pub fn new(leads: N) -> Self {
        Self { leads }
    }

    pub fn leads(&self) -> N {
        self.leads
    }
}

impl crate::sealed::Seal for Op {}

impl AtomicOp for Op {
    fn name(&self) -> String {
        format!("SWAPLEADS{}", self.leads)
    }

    fn opcode(&self) -> Option<OpCode> {
        Some(OpCode::SwapLeads { width: self.leads })
    }

    fn ft_form(&self) -> bool {
        true
    }

    fn apply_to(&self, psi: &mut Store) -> Result<()> {
        if self.leads == 0 {
            return Ok(());
        }
        let low = ((1 as Mask) << self.leads) - 1;
        let high = low << self.leads;
        let w = self.leads;
        psi.update_each(|s, a| {
            let p1 = s & low;
            let p2 = s & high;
            ((s & !(low | high)) | (p1 << w) | (p2 >> w), a)
        });
        Ok(())
    }

    fn this(self) -> AtomicOpDispatch {
        AtomicOpDispatch::SwapLeads(self)
    }

    fn dgr(self) -> AtomicOpDispatch {
        AtomicOpDispatch::SwapLeads(self)
    }
}

#[cfg(test)]
#[test]
fn lead_permutation() {
    use crate::register::Reg;

    let mut reg = Reg::new(0b0111, 4).unwrap();
    reg.apply(&crate::operator::swap_leads(2)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b1101, C_ONE)]);

    // bits outside the two lead groups stay put
    let mut reg = Reg::new(0b10001, 5).unwrap();
    reg.apply(&crate::operator::swap_leads(2)).unwrap();
    assert_eq!(reg.entries().collect::<Vec<_>>(), vec![(0b10100, C_ONE)]);
}
