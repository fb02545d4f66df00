//! A small worklist solver for forward dataflow problems.
//!
//! Shaped after a production compiler's dataflow engine: blocks are seeded
//! onto the worklist in reverse postorder, each dequeued block is
//! transferred once, and its successors are re-enqueued only when the join
//! actually changes their entry state. The engine knows nothing about what
//! the domain represents; `Analysis` is the only thing it talks to.

use std::collections::VecDeque;

use tracing::trace;

use crate::common::fx_hash::FxHashSet;
use crate::ir::cfg::{BlockId, Cfg};

/// The four operations a forward dataflow problem must supply: an initial
/// state for the entry block, an equality test, a join, and a per-block
/// transfer.
pub trait Analysis {
    /// The abstract state. `Default::default()` must produce the
    /// distinguished "no block has contributed a value yet" sentinel, not
    /// whatever a domain-specific "empty" value would be — those are
    /// allowed to be unequal (see `CopyAnalysisState`).
    type Domain: Clone + Default;

    /// The state flowing into the entry block before any block has run.
    fn initial_state(&self) -> Self::Domain;

    /// The analysis's own notion of equality, not necessarily `Domain: Eq`.
    fn states_equal(&self, a: &Self::Domain, b: &Self::Domain) -> bool;

    /// Join (least upper bound) of two states.
    fn merge_states(&self, a: &Self::Domain, b: &Self::Domain) -> Self::Domain;

    /// Transfers `state_in` across `block`, returning the block's out-state.
    fn process_block(&mut self, cfg: &Cfg, block: BlockId, state_in: Self::Domain) -> Self::Domain;
}

/// The converged per-block entry/exit states, plus the analysis instance
/// that produced them (so callers can read back whatever auxiliary state it
/// accumulated, e.g. a registry or a "needed" mask).
pub struct Results<A: Analysis> {
    pub analysis: A,
    pub entry_states: Vec<A::Domain>,
    pub exit_states: Vec<A::Domain>,
}

/// Runs `analysis` to a fixpoint over `cfg` and returns the converged state.
///
/// Only blocks reachable from `cfg.entry` are ever scheduled; unreachable
/// blocks keep their default (`Domain::default()`) entry/exit state.
pub fn iterate_to_fixpoint<A: Analysis>(cfg: &Cfg, mut analysis: A) -> Results<A> {
    let n = cfg.len();
    let mut entry_states: Vec<A::Domain> = (0..n).map(|_| A::Domain::default()).collect();
    let mut exit_states: Vec<A::Domain> = (0..n).map(|_| A::Domain::default()).collect();

    if cfg.is_empty() {
        return Results { analysis, entry_states, exit_states };
    }

    entry_states[cfg.entry.index()] = analysis.initial_state();

    let rpo = cfg.reverse_postorder();
    let mut worklist: VecDeque<BlockId> = rpo.into_iter().collect();
    let mut queued: FxHashSet<BlockId> = worklist.iter().copied().collect();

    let mut iterations: u64 = 0;
    while let Some(bb) = worklist.pop_front() {
        queued.remove(&bb);
        iterations += 1;

        let state_in = entry_states[bb.index()].clone();
        let state_out = analysis.process_block(cfg, bb, state_in);
        exit_states[bb.index()] = state_out.clone();

        for &succ in &cfg.block(bb).successors {
            let merged = analysis.merge_states(&entry_states[succ.index()], &state_out);
            if !analysis.states_equal(&entry_states[succ.index()], &merged) {
                entry_states[succ.index()] = merged;
                if queued.insert(succ) {
                    worklist.push_back(succ);
                }
            }
        }
    }

    trace!(iterations, blocks = n, "dataflow fixpoint converged");

    Results { analysis, entry_states, exit_states }
}
