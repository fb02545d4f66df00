//! Hand-built `Routine`/`Cfg`/`Expr` trees for exercising the analysis
//! without a real frontend or parser. Test-only.

use crate::ir::cfg::{Block, BlockId, Cfg};
use crate::ir::expr::{AccessMode, Expr, NodeId, Stmt, Symbol, VarIndex, VarName, VarRef};
use crate::ir::flow_context::FlowContext;
use crate::ir::routine::Routine;

/// Hands out unique node ids when building expression trees by hand.
#[derive(Default)]
pub struct NodeIdGen(u32);

impl NodeIdGen {
    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.0);
        self.0 += 1;
        id
    }
}

pub fn var_access(ids: &mut NodeIdGen, name: &str, access: AccessMode) -> Expr {
    Expr::Var(VarRef { id: ids.next(), name: VarName::Direct(Symbol::from(name)), access })
}

pub fn var_read(ids: &mut NodeIdGen, name: &str) -> Expr {
    var_access(ids, name, AccessMode::Read)
}

pub fn dynamic_var(ids: &mut NodeIdGen, name_expr: Expr, access: AccessMode) -> Expr {
    Expr::Var(VarRef { id: ids.next(), name: VarName::Dynamic(Box::new(name_expr)), access })
}

pub fn copy_of(ids: &mut NodeIdGen, inner: Expr) -> Expr {
    Expr::Copy { id: ids.next(), inner: Box::new(inner) }
}

pub fn assign(ids: &mut NodeIdGen, target: Expr, value: Expr) -> Expr {
    Expr::Assign { id: ids.next(), target: Box::new(target), value: Box::new(value) }
}

pub fn opaque(ids: &mut NodeIdGen) -> Expr {
    Expr::Other { id: ids.next(), children: Vec::new() }
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(expr)
}

pub fn return_stmt(expr: Expr) -> Stmt {
    Stmt::Return(Some(expr))
}

/// Builds a `FlowContext` where the index of a name in `names` is its
/// `VarIndex`.
pub fn flow_context(names: &[&str]) -> FlowContext {
    let mut flow = FlowContext::new(names.len());
    for (i, name) in names.iter().enumerate() {
        flow.declare_var(*name, VarIndex(i as u32));
    }
    flow
}

/// A single straight-line block, no branches.
pub fn linear_routine(names: &[&str], stmts: Vec<Stmt>) -> Routine {
    let mut block = Block::new(BlockId(0));
    block.stmts = stmts;
    let cfg = Cfg { blocks: vec![block], entry: BlockId(0), exit: BlockId(0) };
    Routine::new(cfg, flow_context(names))
}

/// A branch-then-join diamond: block 0 branches to 1 and 2, both flow into 3.
pub fn diamond_routine(
    names: &[&str],
    entry_stmts: Vec<Stmt>,
    then_stmts: Vec<Stmt>,
    else_stmts: Vec<Stmt>,
    join_stmts: Vec<Stmt>,
) -> Routine {
    let mut b0 = Block::new(BlockId(0));
    b0.stmts = entry_stmts;
    b0.successors = vec![BlockId(1), BlockId(2)];

    let mut b1 = Block::new(BlockId(1));
    b1.stmts = then_stmts;
    b1.successors = vec![BlockId(3)];

    let mut b2 = Block::new(BlockId(2));
    b2.stmts = else_stmts;
    b2.successors = vec![BlockId(3)];

    let mut b3 = Block::new(BlockId(3));
    b3.stmts = join_stmts;

    let cfg = Cfg { blocks: vec![b0, b1, b2, b3], entry: BlockId(0), exit: BlockId(3) };
    Routine::new(cfg, flow_context(names))
}
