use crate::ir::cfg::Cfg;
use crate::ir::flow_context::FlowContext;

/// A function/method body ready for analysis: a built CFG plus the flow
/// context the transfer function needs for variable resolution.
#[derive(Debug, Clone)]
pub struct Routine {
    pub cfg: Cfg,
    pub flow: FlowContext,
}

impl Routine {
    pub fn new(cfg: Cfg, flow: FlowContext) -> Self {
        Self { cfg, flow }
    }
}
