//! The dataflow domain: for each variable, the set of copies that may still
//! be sitting behind it.
//!
//! `CopyMask` is a set of `CopyIndex` bits backed by an arbitrary-width
//! compressed bitmap rather than a fixed machine word, so a routine with
//! more copies than fit in a `u64` still gets exact results instead of a
//! conservative fallback.

use roaring::RoaringBitmap;

use crate::ir::expr::VarIndex;
use crate::passes::copy_elim::copy_index::CopyIndex;

/// A set of copy indices. Cheap to clone (structural sharing is not
/// available from `roaring`, but the bitmaps stay small in practice since
/// they're bounded by the number of copies in one routine).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CopyMask(RoaringBitmap);

impl CopyMask {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn singleton(index: CopyIndex) -> Self {
        let mut mask = Self::empty();
        mask.insert(index);
        mask
    }

    pub fn insert(&mut self, index: CopyIndex) {
        self.0.insert(index.bit());
    }

    pub fn contains(&self, index: CopyIndex) -> bool {
        self.0.contains(index.bit())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn union(&self, other: &CopyMask) -> CopyMask {
        CopyMask(&self.0 | &other.0)
    }

    /// `self & !other`, used by the exit-block return-copy filter to ask
    /// "does this variable still hold a pending copy that isn't needed".
    pub fn difference(&self, other: &CopyMask) -> CopyMask {
        CopyMask(&self.0 - &other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = CopyIndex> + '_ {
        self.0.iter().map(CopyIndex)
    }
}

impl FromIterator<CopyIndex> for CopyMask {
    fn from_iter<I: IntoIterator<Item = CopyIndex>>(iter: I) -> Self {
        let mut bits = RoaringBitmap::new();
        for idx in iter {
            bits.insert(idx.bit());
        }
        CopyMask(bits)
    }
}

/// Per-variable copy-reachability state for one program point.
///
/// `Default` is the distinguished "no predecessor has reached this block
/// yet" sentinel the dataflow engine seeds every non-entry block with. It is
/// deliberately *not* equal to `Mapped(vec![CopyMask::empty(); n])`: the
/// former means "this block hasn't been analyzed", the latter means "every
/// variable provably holds no live copy here". Collapsing the two would make
/// a block with a genuinely-empty predecessor state look unvisited, or vice
/// versa, and the first real predecessor's join needs to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CopyAnalysisState {
    #[default]
    Default,
    Mapped(Vec<CopyMask>),
}

impl CopyAnalysisState {
    /// The all-empty state for a routine with `var_count` variables: every
    /// variable is known to hold no live copy.
    pub fn empty(var_count: usize) -> Self {
        CopyAnalysisState::Mapped(vec![CopyMask::empty(); var_count])
    }

    pub fn mask(&self, var: VarIndex) -> Option<&CopyMask> {
        match self {
            CopyAnalysisState::Default => None,
            CopyAnalysisState::Mapped(v) => v.get(var.index()),
        }
    }

    fn mask_or_empty(&self, var: VarIndex) -> CopyMask {
        self.mask(var).cloned().unwrap_or_else(CopyMask::empty)
    }

    /// Joins two states: `Default` is the identity (joining with it returns
    /// the other state unchanged), and joining two `Mapped` states unions
    /// pointwise.
    pub fn join(&self, other: &CopyAnalysisState) -> CopyAnalysisState {
        match (self, other) {
            (CopyAnalysisState::Default, s) | (s, CopyAnalysisState::Default) => s.clone(),
            (CopyAnalysisState::Mapped(a), CopyAnalysisState::Mapped(b)) => {
                debug_assert_eq!(a.len(), b.len());
                let merged = a.iter().zip(b.iter()).map(|(x, y)| x.union(y)).collect();
                CopyAnalysisState::Mapped(merged)
            }
        }
    }

    fn ensure_mapped(&mut self, var_count: usize) {
        if matches!(self, CopyAnalysisState::Default) {
            *self = CopyAnalysisState::empty(var_count);
        }
    }

    /// `state[v] := mask`, every other variable unchanged.
    pub fn with_value(&self, var: VarIndex, mask: CopyMask, var_count: usize) -> CopyAnalysisState {
        if self.mask(var) == Some(&mask) {
            return self.clone();
        }
        let mut next = self.clone();
        next.ensure_mapped(var_count);
        if let CopyAnalysisState::Mapped(v) = &mut next {
            v[var.index()] = mask;
        }
        next
    }

    /// Models `target = copy(source)`: records that copy id `new_copy`
    /// establishes aliasing between `target` and `source`.
    ///
    /// `state[target] := {new_copy}` (the target's previous aliases do not
    /// survive a reassignment), `state[source] |= {new_copy}` (the source
    /// still holds whatever it held and now also shares `new_copy`).
    ///
    /// When `target == source`, the add to the source is computed from the
    /// state *before* the target replacement, then the replacement is
    /// applied last, so the final mask is exactly `{new_copy}` — consistent
    /// with `target`'s reassignment always winning.
    pub fn with_copy_assignment(
        &self,
        target: VarIndex,
        source: VarIndex,
        new_copy: CopyIndex,
        var_count: usize,
    ) -> CopyAnalysisState {
        let mut source_mask = self.mask_or_empty(source);
        source_mask.insert(new_copy);
        let with_source = self.with_value(source, source_mask, var_count);
        with_source.with_value(target, CopyMask::singleton(new_copy), var_count)
    }
}
