//! Wires the copy-elimination transfer function into the generic fixpoint
//! engine.

use crate::dataflow::engine::Analysis;
use crate::ir::cfg::{BlockId, Cfg};
use crate::ir::expr::VarIndex;
use crate::ir::flow_context::FlowContext;
use crate::passes::copy_elim::copy_index::{CopyIndex, CopyIndexRegistry};
use crate::passes::copy_elim::state::{CopyAnalysisState, CopyMask};
use crate::passes::copy_elim::transfer::Transfer;

/// One analysis run over one routine. Owns the copy registry and the
/// cross-block accumulators (`needed`, return-copy candidates) that the
/// engine must not reset between block visits.
pub struct CopyElimAnalysis<'a> {
    flow: &'a FlowContext,
    var_count: usize,
    registry: CopyIndexRegistry,
    needed: CopyMask,
    return_candidates: Vec<(CopyIndex, VarIndex)>,
}

impl<'a> CopyElimAnalysis<'a> {
    pub fn new(flow: &'a FlowContext) -> Self {
        Self {
            flow,
            var_count: flow.var_count(),
            registry: CopyIndexRegistry::new(),
            needed: CopyMask::empty(),
            return_candidates: Vec::new(),
        }
    }

    pub fn registry(&self) -> &CopyIndexRegistry {
        &self.registry
    }

    pub fn needed(&self) -> &CopyMask {
        &self.needed
    }

    pub fn return_candidates(&self) -> &[(CopyIndex, VarIndex)] {
        &self.return_candidates
    }
}

impl<'a> Analysis for CopyElimAnalysis<'a> {
    type Domain = CopyAnalysisState;

    fn initial_state(&self) -> CopyAnalysisState {
        CopyAnalysisState::empty(self.var_count)
    }

    fn states_equal(&self, a: &CopyAnalysisState, b: &CopyAnalysisState) -> bool {
        a == b
    }

    fn merge_states(&self, a: &CopyAnalysisState, b: &CopyAnalysisState) -> CopyAnalysisState {
        a.join(b)
    }

    fn process_block(&mut self, cfg: &Cfg, block: BlockId, state_in: CopyAnalysisState) -> CopyAnalysisState {
        let mut transfer = Transfer {
            flow: self.flow,
            registry: &mut self.registry,
            needed: &mut self.needed,
            return_candidates: &mut self.return_candidates,
            var_count: self.var_count,
        };
        transfer.visit_block(cfg.block(block), state_in)
    }
}
