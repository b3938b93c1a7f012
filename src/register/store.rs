use crate::{
    error::{Error, Result},
    hooks,
    math::{bitmask, Mask, C, C_ONE, C_ZERO, EPSILON, M1, M2, N, R, Z},
    operator::atomic::{AtomicOp, AtomicOpDispatch},
};

use super::hash::HashTable;

const AMP_BYTES: Z = std::mem::size_of::<C>() as Z;
const LABEL_BYTES: Z = std::mem::size_of::<Mask>() as Z;

/// The sparse state vector: basis-state labels, amplitudes and the optional
/// hash index over them.
///
/// Two layouts exist. The *sparse* layout keeps a label per entry and only
/// stores basis states with non-vanishing amplitude. The *dense* layout
/// (`states == None`) drops the labels; an entry's position is its label.
/// Registers without a hash index are assumed dense-ordered by the lookup
/// path, matching what their constructors produce.
#[derive(Debug)]
pub struct Store {
    pub(crate) width: N,
    pub(crate) states: Option<Vec<Mask>>,
    pub(crate) psi: Vec<C>,
    pub(crate) hash: Option<HashTable>,
}

impl Store {
    pub(crate) fn with_state(state: Mask, width: N) -> Result<Self> {
        let hash = HashTable::new(width + 2)?;
        hooks::memman(AMP_BYTES + LABEL_BYTES);

        Ok(Self {
            width,
            states: Some(vec![state]),
            psi: vec![C_ONE],
            hash: Some(hash),
        })
    }

    pub(crate) fn dense(n: N, width: N) -> Self {
        hooks::memman(n as Z * AMP_BYTES);
        Self {
            width,
            states: None,
            psi: vec![C_ZERO; n],
            hash: None,
        }
    }

    pub(crate) fn sparse(n: N, width: N) -> Self {
        hooks::memman(n as Z * (AMP_BYTES + LABEL_BYTES));
        Self {
            width,
            states: Some(vec![0; n]),
            psi: vec![C_ZERO; n],
            hash: None,
        }
    }

    /// Consume the non-zero amplitudes of a column vector.
    pub(crate) fn from_amplitudes(column: &[C], width: N) -> Result<Self> {
        let size = column.iter().filter(|a| **a != C_ZERO).count();

        let mut states = Vec::new();
        let mut psi = Vec::new();
        states
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory)?;
        psi.try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory)?;
        hooks::memman(size as Z * (AMP_BYTES + LABEL_BYTES));

        for (i, &a) in column.iter().enumerate() {
            if a != C_ZERO {
                states.push(i as Mask);
                psi.push(a);
            }
        }

        let hash = HashTable::new(width + 2)?;

        Ok(Self {
            width,
            states: Some(states),
            psi,
            hash: Some(hash),
        })
    }

    pub fn width(&self) -> N {
        self.width
    }

    pub fn size(&self) -> N {
        self.psi.len()
    }

    pub fn hash_bits(&self) -> N {
        self.hash.as_ref().map_or(0, HashTable::bits)
    }

    pub fn states(&self) -> Option<&[Mask]> {
        self.states.as_deref()
    }

    pub fn psi(&self) -> &[C] {
        &self.psi
    }

    pub fn psi_mut(&mut self) -> &mut [C] {
        &mut self.psi
    }

    #[inline]
    pub(crate) fn label_at(&self, i: N) -> Mask {
        match &self.states {
            Some(states) => states[i],
            None => i as Mask,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (Mask, C)> + '_ {
        (0..self.size()).map(move |i| (self.label_at(i), self.psi[i]))
    }

    /// Rebuild the hash index when present and stale.
    pub(crate) fn ensure_hash(&mut self) -> Result<()> {
        if let (Some(states), Some(hash)) = (&self.states, &mut self.hash) {
            hash.ensure(states)?;
        }
        Ok(())
    }

    /// Entry position holding `state`, rebuilding the hash index if stale.
    /// Without an index the register is taken to be dense-ordered and the
    /// label itself is the position.
    pub fn position_of(&mut self, state: Mask) -> Result<Option<N>> {
        self.ensure_hash()?;
        Ok(self.position_of_ref(state))
    }

    /// Lookup against a fresh (or absent) index.
    fn position_of_ref(&self, state: Mask) -> Option<N> {
        match (&self.hash, &self.states) {
            (Some(hash), Some(states)) => {
                debug_assert!(!hash.is_stale());
                hash.get(states, state)
            }
            _ => {
                let pos = state as N;
                if pos < self.size() {
                    Some(pos)
                } else {
                    None
                }
            }
        }
    }

    /// Apply an atomic gate directly, bypassing the hook prologue. This is
    /// the entry point for fault-tolerant encoders driving the store.
    pub fn apply_raw(&mut self, op: &AtomicOpDispatch) -> Result<()> {
        op.apply_to(self)
    }

    /// Release the hash index. Lookups fall back to the dense-ordered rule
    /// until a register rebuild installs a new one.
    pub fn destroy_hash(&mut self) {
        self.hash = None;
    }

    /// Entrywise map over (label, amplitude) pairs. Used by the permutation
    /// gates; leaves the hash index stale.
    pub(crate) fn update_each<F>(&mut self, f: F)
    where
        F: Fn(Mask, C) -> (Mask, C) + Sync + Send,
    {
        let Store {
            states, psi, hash, ..
        } = self;
        let states = states
            .as_mut()
            .expect("relabeling gates require the sparse layout");

        #[cfg(feature = "cpu")]
        crate::threads::install(|| {
            use rayon::prelude::*;
            states
                .par_iter_mut()
                .zip(psi.par_iter_mut())
                .for_each(|(s, a)| {
                    let (ns, na) = f(*s, *a);
                    *s = ns;
                    *a = na;
                });
        });
        #[cfg(not(feature = "cpu"))]
        states.iter_mut().zip(psi.iter_mut()).for_each(|(s, a)| {
            let (ns, na) = f(*s, *a);
            *s = ns;
            *a = na;
        });

        if let Some(hash) = hash {
            hash.set_stale();
        }
    }

    /// Entrywise map over amplitudes only, for gates diagonal in the
    /// computational basis. Positions and labels are untouched, so the hash
    /// index stays valid.
    pub(crate) fn update_amps<F>(&mut self, f: F)
    where
        F: Fn(Mask, C) -> C + Sync + Send,
    {
        let Store { states, psi, .. } = self;
        match states {
            Some(states) => {
                #[cfg(feature = "cpu")]
                crate::threads::install(|| {
                    use rayon::prelude::*;
                    states
                        .par_iter()
                        .zip(psi.par_iter_mut())
                        .for_each(|(s, a)| *a = f(*s, *a));
                });
                #[cfg(not(feature = "cpu"))]
                states
                    .iter()
                    .zip(psi.iter_mut())
                    .for_each(|(s, a)| *a = f(*s, *a));
            }
            None => {
                #[cfg(feature = "cpu")]
                crate::threads::install(|| {
                    use rayon::prelude::*;
                    psi.par_iter_mut()
                        .enumerate()
                        .for_each(|(i, a)| *a = f(i as Mask, *a));
                });
                #[cfg(not(feature = "cpu"))]
                psi.iter_mut()
                    .enumerate()
                    .for_each(|(i, a)| *a = f(i as Mask, *a));
            }
        }
    }

    fn coalesce_limit(&self) -> R {
        EPSILON * (-(self.width as R)).exp2()
    }

    fn warn_load(&self) {
        if let Some(hash) = &self.hash {
            if self.size() > 1 << (hash.bits() - 1) {
                log::warn!(
                    "inefficient hash table: {} entries vs {} cells",
                    self.size(),
                    1usize << hash.bits()
                );
            }
        }
    }

    /// Apply a 2x2 unitary to the target bit.
    ///
    /// In sparse mode the partner of every entry (label XOR 2^target) is
    /// located through the hash index and created on demand; afterwards
    /// entries below the coalescing threshold are compacted out. Without an
    /// index the register is dense-ordered and no entries are created.
    pub(crate) fn gate1(&mut self, target: N, u: &M1) -> Result<()> {
        debug_assert!(target < self.width);
        let mask = (1 as Mask) << target;
        let limit = self.coalesce_limit();

        let Store {
            states, psi, hash, ..
        } = self;

        if let (Some(states), Some(hash)) = (states.as_mut(), hash.as_mut()) {
            hash.ensure(states)?;

            let size = psi.len();
            let mut addsize = 0;
            for i in 0..size {
                if hash.get(states, states[i] ^ mask).is_none() {
                    addsize += 1;
                }
            }
            states
                .try_reserve(addsize)
                .map_err(|_| Error::OutOfMemory)?;
            psi.try_reserve(addsize).map_err(|_| Error::OutOfMemory)?;

            let mut done = vec![false; size];

            for i in 0..size {
                if done[i] {
                    continue;
                }
                let iset = states[i] & mask != 0;
                let j = hash.get(states, states[i] ^ mask);
                let tnot = j.map_or(C_ZERO, |j| psi[j]);
                let t = psi[i];

                psi[i] = if iset {
                    u[0b10] * tnot + u[0b11] * t
                } else {
                    u[0b00] * t + u[0b01] * tnot
                };

                match j {
                    Some(j) => {
                        psi[j] = if iset {
                            u[0b00] * tnot + u[0b01] * t
                        } else {
                            u[0b10] * t + u[0b11] * tnot
                        };
                        done[j] = true;
                    }
                    None => {
                        // the partner's amplitude has a single source term;
                        // a vanishing coefficient means no new basis state
                        let coeff = if iset { u[0b01] } else { u[0b10] };
                        if coeff != C_ZERO {
                            states.push(states[i] ^ mask);
                            psi.push(coeff * t);
                        }
                    }
                }
            }

            hooks::memman((psi.len() - size) as Z * (AMP_BYTES + LABEL_BYTES));
            hash.set_stale();

            compact(states, psi, limit);
            self.warn_load();
            return Ok(());
        }

        // dense-ordered: the partner position is the partner label
        let size = psi.len();
        let states = states.as_deref();
        let mut done = vec![false; size];

        for i in 0..size {
            if done[i] {
                continue;
            }
            let lbl = states.map_or(i as Mask, |s| s[i]);
            let iset = lbl & mask != 0;
            let partner = (lbl ^ mask) as N;
            let j = if partner < size { Some(partner) } else { None };
            let tnot = j.map_or(C_ZERO, |j| psi[j]);
            let t = psi[i];

            psi[i] = if iset {
                u[0b10] * tnot + u[0b11] * t
            } else {
                u[0b00] * t + u[0b01] * tnot
            };
            if let Some(j) = j {
                psi[j] = if iset {
                    u[0b00] * tnot + u[0b01] * t
                } else {
                    u[0b10] * t + u[0b11] * tnot
                };
                done[j] = true;
            }
        }
        Ok(())
    }

    /// Apply a 4x4 unitary to the pair of target bits.
    ///
    /// Every 4-group of basis states (the orbit of a label under flips of
    /// the two targets) is gathered through the hash index; missing members
    /// are materialised with zero amplitude before the multiplication. The
    /// sub-index convention is `bitmask(label, [t1, t2])`: bit 0 of the
    /// group index is bit `t1` of the label.
    pub(crate) fn gate2(&mut self, t1: N, t2: N, u: &M2) -> Result<()> {
        debug_assert!(t1 < self.width && t2 < self.width && t1 != t2);
        let m1 = (1 as Mask) << t1;
        let m2 = (1 as Mask) << t2;
        let limit = self.coalesce_limit();

        let Store {
            states, psi, hash, ..
        } = self;
        let states = states
            .as_mut()
            .expect("two-qubit unitaries require a hashed sparse register");
        let hash = hash
            .as_mut()
            .expect("two-qubit unitaries require a hashed sparse register");

        hash.ensure(states)?;

        let size = psi.len();

        let mut addsize = 0;
        {
            let mut seen = vec![false; size];
            for i in 0..size {
                if seen[i] {
                    continue;
                }
                for &flips in &[m1, m2, m1 ^ m2] {
                    match hash.get(states, states[i] ^ flips) {
                        Some(p) => seen[p] = true,
                        None => addsize += 1,
                    }
                }
            }
        }
        states
            .try_reserve(addsize)
            .map_err(|_| Error::OutOfMemory)?;
        psi.try_reserve(addsize).map_err(|_| Error::OutOfMemory)?;

        let mut done = vec![false; size];

        for i in 0..size {
            if done[i] {
                continue;
            }
            let x = states[i];
            let j0 = bitmask(x, &[t1, t2]);

            let mut pos = [0; 4];
            for (q, pos) in pos.iter_mut().enumerate() {
                let flip = (if (q ^ j0) & 1 != 0 { m1 } else { 0 })
                    | (if (q ^ j0) & 2 != 0 { m2 } else { 0 });
                *pos = if q == j0 {
                    i
                } else {
                    match hash.get(states, x ^ flip) {
                        Some(p) => p,
                        None => {
                            states.push(x ^ flip);
                            psi.push(C_ZERO);
                            psi.len() - 1
                        }
                    }
                };
            }

            let sub = [psi[pos[0]], psi[pos[1]], psi[pos[2]], psi[pos[3]]];
            for (q, &p) in pos.iter().enumerate() {
                psi[p] = (0..4).fold(C_ZERO, |acc, k| acc + u[(q << 2) | k] * sub[k]);
                if p < size {
                    done[p] = true;
                }
            }
        }

        hooks::memman((psi.len() - size) as Z * (AMP_BYTES + LABEL_BYTES));
        hash.set_stale();

        compact(states, psi, limit);
        self.warn_load();
        Ok(())
    }

    /// Kronecker product; the result owns a fresh index at `width + 2` bits.
    pub(crate) fn kron(&self, other: &Store) -> Result<Store> {
        let s1 = self
            .states
            .as_ref()
            .expect("Kronecker product requires the sparse layout");
        let s2 = other
            .states
            .as_ref()
            .expect("Kronecker product requires the sparse layout");

        let width = self.width + other.width;
        let size = self
            .size()
            .checked_mul(other.size())
            .ok_or(Error::OutOfMemory)?;

        let mut states = Vec::new();
        let mut psi = Vec::new();
        states
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory)?;
        psi.try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory)?;
        hooks::memman(size as Z * (AMP_BYTES + LABEL_BYTES));

        for (&l1, &a1) in s1.iter().zip(&self.psi) {
            for (&l2, &a2) in s2.iter().zip(&other.psi) {
                states.push((l1 << other.width) | l2);
                psi.push(a1 * a2);
            }
        }

        let hash = HashTable::new(width + 2)?;

        Ok(Store {
            width,
            states: Some(states),
            psi,
            hash: Some(hash),
        })
    }

    /// Keep the entries with bit `pos` equal to `value`, dropping the
    /// measured qubit from the labels and renormalising by the kept
    /// probability mass. The successor adopts this register's hash buffer.
    pub(crate) fn collapse(mut self, pos: N, value: bool) -> Result<Store> {
        debug_assert!(pos < self.width);
        let mask = (1 as Mask) << pos;
        let states = self
            .states
            .as_ref()
            .expect("collapse requires the sparse layout");

        let mut d: R = 0.0;
        let mut size = 0;
        for (&s, a) in states.iter().zip(&self.psi) {
            if (s & mask != 0) == value {
                d += a.norm_sqr();
                size += 1;
            }
        }

        let mut out_states = Vec::new();
        let mut out_psi = Vec::new();
        out_states
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory)?;
        out_psi
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory)?;
        hooks::memman(size as Z * (AMP_BYTES + LABEL_BYTES));

        let norm = d.sqrt();
        let lo_mask = mask - 1;
        for (&s, &a) in states.iter().zip(&self.psi) {
            if (s & mask != 0) == value {
                let hi = if pos + 1 < Mask::BITS as N {
                    (s >> (pos + 1)) << pos
                } else {
                    0
                };
                out_states.push(hi | (s & lo_mask));
                out_psi.push(a / norm);
            }
        }

        let mut hash = self.hash.take();
        if let Some(hash) = &mut hash {
            hash.set_stale();
        }

        Ok(Store {
            width: self.width - 1,
            states: Some(out_states),
            psi: out_psi,
            hash,
        })
    }

    /// Dot product `<self|other>`; `conjugate = false` drops the conjugation
    /// on the left factor.
    pub(crate) fn dot(&self, other: &mut Store, conjugate: bool) -> Result<C> {
        other.ensure_hash()?;
        Ok(dot_ref(self, other, conjugate))
    }

    /// In-place vector addition. Labels of `other` missing from `self` are
    /// appended; matching labels have their amplitudes summed.
    pub(crate) fn vectoradd(&mut self, other: &Store) -> Result<()> {
        self.ensure_hash()?;

        match &other.states {
            None => {
                for (i, &a) in other.psi.iter().enumerate() {
                    self.psi[i] += a;
                }
            }
            Some(other_states) => {
                let mut addsize = 0;
                for &s in other_states.iter() {
                    if self.position_of_ref(s).is_none() {
                        addsize += 1;
                    }
                }
                if addsize > 0 {
                    let states = self
                        .states
                        .as_mut()
                        .expect("vector addition cannot grow a dense register");
                    states
                        .try_reserve(addsize)
                        .map_err(|_| Error::OutOfMemory)?;
                    self.psi
                        .try_reserve(addsize)
                        .map_err(|_| Error::OutOfMemory)?;
                    hooks::memman(addsize as Z * (AMP_BYTES + LABEL_BYTES));
                }

                for (&s, &a) in other_states.iter().zip(&other.psi) {
                    match self.position_of_ref(s) {
                        Some(j) => self.psi[j] += a,
                        None => {
                            self.states
                                .as_mut()
                                .expect("vector addition cannot grow a dense register")
                                .push(s);
                            self.psi.push(a);
                        }
                    }
                }
                if addsize > 0 {
                    if let Some(hash) = &mut self.hash {
                        hash.set_stale();
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn scale(&mut self, r: C) {
        for a in &mut self.psi {
            *a *= r;
        }
    }

    pub(crate) fn norm_sqr_sum(&self) -> R {
        self.psi.iter().map(C::norm_sqr).sum()
    }

    pub(crate) fn normalize(&mut self) {
        let r = self.norm_sqr_sum();
        self.scale(C::new(1. / r.sqrt(), 0.));
    }

    /// Widen the register by `bits` zeroed scratch qubits at the LSB end.
    pub(crate) fn addscratch(&mut self, bits: N) {
        debug_assert!(self.width + bits <= crate::math::MAX_WIDTH);
        self.width += bits;
        if let Some(states) = &mut self.states {
            for s in states.iter_mut() {
                *s <<= bits;
            }
        }
        if let Some(hash) = &mut self.hash {
            hash.set_stale();
        }
    }

    /// Expand into a full column vector of length `2^width`.
    pub(crate) fn to_column(&self) -> Result<Vec<C>> {
        let len = 1usize
            .checked_shl(self.width as u32)
            .ok_or(Error::OutOfMemory)?;
        let mut column = Vec::new();
        column
            .try_reserve_exact(len)
            .map_err(|_| Error::OutOfMemory)?;
        column.resize(len, C_ZERO);
        for (s, a) in self.entries() {
            column[s as N] = a;
        }
        Ok(column)
    }
}

/// Drop entries whose probability fell below `limit`, preserving order.
fn compact(states: &mut Vec<Mask>, psi: &mut Vec<C>, limit: R) {
    let mut kept = 0;
    for i in 0..psi.len() {
        if psi[i].norm_sqr() >= limit {
            if i != kept {
                states[kept] = states[i];
                psi[kept] = psi[i];
            }
            kept += 1;
        }
    }
    let removed = psi.len() - kept;
    if removed > 0 {
        states.truncate(kept);
        psi.truncate(kept);
        states.shrink_to_fit();
        psi.shrink_to_fit();
        hooks::memman(-(removed as Z) * (AMP_BYTES + LABEL_BYTES));
    }
}

/// Dot product against a register whose index is known fresh (or absent).
pub(crate) fn dot_ref(a: &Store, b: &Store, conjugate: bool) -> C {
    let mut f = C_ZERO;
    for i in 0..a.size() {
        if let Some(j) = b.position_of_ref(a.label_at(i)) {
            let x = if conjugate { a.psi[i].conj() } else { a.psi[i] };
            f += x * b.psi[j];
        }
    }
    f
}

impl Clone for Store {
    fn clone(&self) -> Self {
        let label_bytes = if self.states.is_some() { LABEL_BYTES } else { 0 };
        hooks::memman(self.size() as Z * (AMP_BYTES + label_bytes));
        Self {
            width: self.width,
            states: self.states.clone(),
            psi: self.psi.clone(),
            hash: self.hash.clone(),
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        let label_bytes = if self.states.is_some() { LABEL_BYTES } else { 0 };
        hooks::memman(-(self.size() as Z) * (AMP_BYTES + label_bytes));
    }
}
