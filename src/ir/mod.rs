pub mod cfg;
pub mod expr;
pub mod flow_context;
pub mod routine;

pub use cfg::{Block, BlockId, Cfg};
pub use expr::{AccessMode, Expr, NodeId, Stmt, Symbol, VarIndex, VarName, VarRef};
pub use flow_context::FlowContext;
pub use routine::Routine;
