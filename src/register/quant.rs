use std::{env, fmt, ops::Mul, path::Path};

use rand::prelude::*;

use crate::{
    counter,
    error::{Error, Result},
    hooks::{Hooks, NoHooks, OpCode},
    math::{matrix::Matrix, Mask, C, C_ZERO, MAX_WIDTH, N, R},
    operator::{
        atomic::{AtomicOp, AtomicOpDispatch},
        MultiOp,
    },
};

use super::store::{dot_ref, Store};

const MAX_LEN_TO_DISPLAY: N = 8;

/// Sparse quantum register.
///
/// __The heart of the engine.__ A register of width `w` holds a pure state
/// of `w` qubits as a list of (basis state, amplitude) entries; only basis
/// states with non-vanishing amplitude are stored, so memory follows the
/// support of the wavefunction rather than `2^w`.
///
/// ```rust
/// use sparq::prelude::*;
///
/// let mut reg = QReg::new(0, 2).unwrap();
/// reg.apply(&(op::h(0) * op::cnot(0, 1))).unwrap();
///
/// // the Bell state has two entries, not four
/// assert_eq!(reg.size(), 2);
/// ```
///
/// A register carries a [`Hooks`] capability set through which the external
/// collaborators (object-code recorder, error correction, decoherence) see
/// every gate; [`NoHooks`] is the default.
pub struct Reg<H: Hooks = NoHooks> {
    psi: Store,
    hooks: H,
}

impl Reg<NoHooks> {
    /// Single-entry register holding the computational basis state `state`.
    pub fn new(state: Mask, width: N) -> Result<Self> {
        Self::with_hooks(state, width, NoHooks)
    }

    /// Dense register of `n` zero amplitudes and no labels; an entry's
    /// position is its basis state. Meant for the register algebra, not for
    /// the relabeling gates.
    pub fn new_size(n: N, width: N) -> Self {
        Self {
            psi: Store::dense(n, width),
            hooks: NoHooks,
        }
    }

    /// Sparse register of `n` zeroed entries and no hash index.
    pub fn new_sparse(n: N, width: N) -> Self {
        Self {
            psi: Store::sparse(n, width),
            hooks: NoHooks,
        }
    }

    /// Consume the non-zero amplitudes of a column vector.
    pub fn from_dense(m: &Matrix, width: N) -> Result<Self> {
        let column = m.column()?;
        Ok(Self {
            psi: Store::from_amplitudes(column, width)?,
            hooks: NoHooks,
        })
    }
}

impl<H: Hooks> Reg<H> {
    /// As [`new`](Reg::new), with an explicit collaborator capability set.
    ///
    /// When the `QUOBFILE` environment variable is present its value is
    /// handed to [`Hooks::objcode_file`] before the initial state is
    /// recorded.
    pub fn with_hooks(state: Mask, width: N, mut hooks: H) -> Result<Self> {
        assert!(width >= 1 && width <= MAX_WIDTH);
        let state = state & (Mask::MAX >> (MAX_WIDTH - width));

        let psi = Store::with_state(state, width)?;

        if let Some(path) = env::var_os("QUOBFILE") {
            hooks.objcode_file(Path::new(&path));
        }
        hooks.objcode_put(&OpCode::Init { state });

        Ok(Self { psi, hooks })
    }

    pub fn width(&self) -> N {
        self.psi.width()
    }

    /// Number of stored basis states.
    pub fn size(&self) -> N {
        self.psi.size()
    }

    pub fn hash_bits(&self) -> N {
        self.psi.hash_bits()
    }

    pub fn entries(&self) -> impl Iterator<Item = (Mask, C)> + '_ {
        self.psi.entries()
    }

    pub fn store(&self) -> &Store {
        &self.psi
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.psi
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Entry position of a basis state, rebuilding the hash index if needed.
    pub fn position_of(&mut self, state: Mask) -> Result<Option<N>> {
        self.psi.position_of(state)
    }

    /// Total probability mass. Equals 1 for a physical register.
    pub fn norm_sqr(&self) -> R {
        self.psi.norm_sqr_sum()
    }

    /// Apply a gate queue, one atomic gate at a time.
    pub fn apply(&mut self, ops: &MultiOp) -> Result<()> {
        for op in ops.iter() {
            self.apply_atomic(op)?;
        }
        Ok(())
    }

    fn apply_atomic(&mut self, op: &AtomicOpDispatch) -> Result<()> {
        if let Some(code) = op.opcode() {
            if self.hooks.objcode_put(&code) {
                // the recorder is replaying into a file, nothing to execute
                return Ok(());
            }
        }

        let (qec, _code) = self.hooks.qec_status();
        if qec && op.ft_form() {
            if let AtomicOpDispatch::SwapLeads(op) = op {
                // renaming is not fault tolerant; swap through CNOT triples,
                // each taking its own encoded path
                let w = op.leads();
                for i in 0..w {
                    let swap = crate::operator::cnot(i, w + i)
                        * crate::operator::cnot(w + i, i)
                        * crate::operator::cnot(i, w + i);
                    self.apply(&swap)?;
                }
                return Ok(());
            }
            let Self { psi, hooks } = self;
            hooks.qec_apply(op, psi)?;
        } else {
            self.psi.apply_raw(op)?;
        }

        counter::add(1);
        let Self { psi, hooks } = self;
        hooks.decohere(psi);
        Ok(())
    }

    /// Kronecker product. Widths add, sizes multiply; the product owns a
    /// fresh hash index and keeps the left factor's hooks.
    pub fn kron<H2: Hooks>(self, other: Reg<H2>) -> Result<Reg<H>> {
        Ok(Reg {
            psi: self.psi.kron(&other.psi)?,
            hooks: self.hooks,
        })
    }

    /// Project bit `pos` onto `value` and drop it from the register.
    ///
    /// The surviving amplitudes are renormalised by the square root of the
    /// kept probability mass; labels above `pos` shift down one bit. The
    /// successor adopts this register's hash buffer, to be rebuilt on its
    /// next use.
    pub fn collapse(self, pos: N, value: bool) -> Result<Reg<H>> {
        Ok(Reg {
            psi: self.psi.collapse(pos, value)?,
            hooks: self.hooks,
        })
    }

    /// Projective measurement of bit `pos`: draws the outcome from the
    /// Born-rule distribution, then collapses onto it.
    pub fn measure_bit(self, pos: N) -> Result<(N, Reg<H>)> {
        let mask = (1 as Mask) << pos;
        let p1: R = self
            .psi
            .entries()
            .filter(|(s, _)| s & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();
        let p0 = (self.norm_sqr() - p1).max(0.0);

        let outcome =
            thread_rng().sample(rand_distr::WeightedIndex::new(vec![p0, p1]).unwrap());

        let reg = self.collapse(pos, outcome == 1)?;
        Ok((outcome, reg))
    }

    /// `<self|other>`. Rebuilds `other`'s hash index when stale.
    pub fn dot<H2: Hooks>(&self, other: &mut Reg<H2>) -> Result<C> {
        self.psi.dot(&mut other.psi, true)
    }

    /// Dot product without conjugation of the left factor.
    pub fn dot_noconj<H2: Hooks>(&self, other: &mut Reg<H2>) -> Result<C> {
        self.psi.dot(&mut other.psi, false)
    }

    /// Entrywise sum into a fresh register. Purely algebraic; the result is
    /// not normalised.
    pub fn vectoradd<H2: Hooks>(&self, other: &Reg<H2>) -> Result<Reg<H>>
    where
        H: Clone,
    {
        let mut out = self.clone();
        out.vectoradd_assign(other)?;
        Ok(out)
    }

    /// Entrywise sum in place.
    pub fn vectoradd_assign<H2: Hooks>(&mut self, other: &Reg<H2>) -> Result<()> {
        self.psi.vectoradd(&other.psi)
    }

    /// Multiply every amplitude by a scalar. Purely algebraic.
    pub fn scale(&mut self, r: C) {
        self.psi.scale(r);
    }

    pub fn normalize(&mut self) {
        self.psi.normalize();
    }

    /// Widen the register by `bits` zeroed scratch qubits at the LSB end.
    pub fn addscratch(&mut self, bits: N) {
        self.psi.addscratch(bits);
    }

    /// Expand into a `2^width` column vector.
    pub fn to_dense(&self) -> Result<Matrix> {
        Ok(Matrix::col_vector(self.psi.to_column()?))
    }
}

/// Matrix-vector multiplication with an operator given by rows: entry `i` of
/// the output is the conjugation-free dot product of `a(i, t)` with `reg`.
/// Row registers are evaluated in parallel under the `cpu` feature.
pub fn matrix_qureg<H, A>(a: A, t: R, reg: &mut Reg<H>) -> Result<Reg>
where
    H: Hooks,
    A: Fn(Mask, R) -> Reg + Sync,
{
    reg.psi.ensure_hash()?;
    let store = &reg.psi;
    let size = store.size();

    #[cfg(feature = "cpu")]
    let amps: Vec<C> = crate::threads::install(|| {
        use rayon::prelude::*;
        (0..size)
            .into_par_iter()
            .map(|i| dot_ref(&a(i as Mask, t).psi, store, false))
            .collect()
    });
    #[cfg(not(feature = "cpu"))]
    let amps: Vec<C> = (0..size)
        .map(|i| dot_ref(&a(i as Mask, t).psi, store, false))
        .collect();

    let mut out = if store.states().is_some() {
        let mut out = Reg::new_sparse(size, store.width());
        if let Some(states) = out.psi.states.as_mut() {
            for (i, s) in states.iter_mut().enumerate() {
                *s = i as Mask;
            }
        }
        out
    } else {
        Reg::new_size(size, store.width())
    };
    out.psi.psi.copy_from_slice(&amps);
    Ok(out)
}

/// Dense matrix-vector multiplication `y = A x` over dense registers.
pub fn mvmult<H1: Hooks, H2: Hooks>(y: &mut Reg<H1>, a: &Matrix, x: &Reg<H2>) -> Result<()> {
    if a.cols() != x.size() || a.rows() != y.size() {
        return Err(Error::DimMismatch);
    }
    for i in 0..a.rows() {
        let mut sum = C_ZERO;
        for j in 0..a.cols() {
            sum += a.at(i, j) * x.psi.psi()[j];
        }
        y.psi.psi_mut()[i] = sum;
    }
    Ok(())
}

impl<H: Hooks + Clone> Clone for Reg<H> {
    fn clone(&self) -> Self {
        Self {
            psi: self.psi.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

impl<H: Hooks> fmt::Debug for Reg<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Reg");
        for (state, a) in self.psi.entries().take(MAX_LEN_TO_DISPLAY) {
            dbg.field(&format!("{}", state), &a);
        }
        if self.size() > MAX_LEN_TO_DISPLAY {
            dbg.finish_non_exhaustive()
        } else {
            dbg.finish()
        }
    }
}

impl<H: Hooks> Mul for Reg<H> {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.kron(other).expect("Kronecker product allocation")
    }
}
