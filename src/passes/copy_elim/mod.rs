//! Copy-elimination: the analysis and its supporting machinery.

pub mod analysis;
pub mod copy_index;
pub mod extract;
pub mod state;
pub mod transfer;

#[cfg(test)]
mod proptests;

use tracing::{debug, instrument};

use crate::common::error::CopyAnalysisError;
use crate::common::fx_hash::FxHashSet;
use crate::dataflow::engine::iterate_to_fixpoint;
use crate::ir::expr::NodeId;
use crate::ir::routine::Routine;
use analysis::CopyElimAnalysis;

/// Runs the copy-elimination dataflow analysis over `routine` and returns
/// the set of copy-insertion nodes a rewriter may delete.
///
/// An empty set and "no copies found" are behaviorally equivalent to the
/// caller; there is no distinguished "none" return.
#[instrument(skip(routine), fields(blocks = routine.cfg.blocks.len()))]
pub fn try_get_unnecessary_copies(routine: &Routine) -> Result<FxHashSet<NodeId>, CopyAnalysisError> {
    if !routine.cfg.is_exit_reachable() {
        return Err(CopyAnalysisError::UnreachableExit(routine.cfg.exit));
    }

    let analysis = CopyElimAnalysis::new(&routine.flow);
    let results = iterate_to_fixpoint(&routine.cfg, analysis);

    let exit_state = &results.exit_states[routine.cfg.exit.index()];
    let removable = extract::extract(
        results.analysis.registry(),
        results.analysis.needed(),
        results.analysis.return_candidates(),
        exit_state,
    );
    debug!(
        registered = results.analysis.registry().len(),
        removable = removable.len(),
        "copy elimination finished"
    );
    Ok(removable)
}
