use thiserror::Error;

use crate::ir::cfg::BlockId;

/// The one documented failure mode of the analysis: a structurally malformed CFG.
///
/// Everything else the transfer function encounters is handled conservatively
/// (see `Expr::Other`) rather than surfaced as an error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CopyAnalysisError {
    #[error("exit block {0:?} is not reachable from the entry block")]
    UnreachableExit(BlockId),
}
