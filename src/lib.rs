pub mod common;
pub mod dataflow;
pub mod ir;
pub mod passes;

#[cfg(test)]
pub mod testing;

pub use common::error::CopyAnalysisError;
pub use ir::{Cfg, FlowContext, Routine};
pub use passes::try_get_unnecessary_copies;
