//! Turns the converged dataflow state into the set of copy nodes the
//! rewriter may delete.

use crate::common::fx_hash::FxHashSet;
use crate::ir::expr::{NodeId, VarIndex};
use crate::passes::copy_elim::copy_index::{CopyIndex, CopyIndexRegistry};
use crate::passes::copy_elim::state::{CopyAnalysisState, CopyMask};

/// Filters the return-copy candidates against the exit block's converged
/// state, then unions in every other registered copy whose id never made it
/// into `needed`.
///
/// Return-form copies are resolved *exclusively* by the filter below, never
/// by the generic `needed` check: a return candidate the filter rejects
/// stays out of the result even when its own copy id was never
/// independently marked needed, since it was never placed in the registry
/// in the first place.
pub fn extract(
    registry: &CopyIndexRegistry,
    needed: &CopyMask,
    return_candidates: &[(CopyIndex, VarIndex)],
    exit_state: &CopyAnalysisState,
) -> FxHashSet<NodeId> {
    let return_ids: FxHashSet<CopyIndex> = return_candidates.iter().map(|&(id, _)| id).collect();

    let mut result: FxHashSet<NodeId> = return_candidates
        .iter()
        .filter(|&&(_, var)| {
            let pending = exit_state.mask(var).cloned().unwrap_or_else(CopyMask::empty);
            pending.difference(needed).is_empty()
        })
        .map(|&(id, _)| registry.node_of(id))
        .collect();

    for (idx, &node) in registry.nodes().iter().enumerate() {
        let id = CopyIndex(idx as u32);
        if return_ids.contains(&id) {
            continue;
        }
        if !needed.contains(id) {
            result.insert(node);
        }
    }

    result
}
