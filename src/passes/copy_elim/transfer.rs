//! The single-block expression-tree walker.
//!
//! This is the 50%-of-the-core piece: it mutates a per-block `current state`
//! while it walks, and also mutates two pieces of state that live for the
//! whole fixpoint run rather than per block — the `needed` mask and the
//! return-copy candidate list, neither of which is reset between blocks or
//! between fixpoint iterations.

use tracing::trace;

use crate::ir::cfg::Block;
use crate::ir::expr::{Expr, NodeId, Stmt, VarIndex, VarName, VarRef};
use crate::ir::flow_context::FlowContext;
use crate::passes::copy_elim::copy_index::{CopyIndex, CopyIndexRegistry};
use crate::passes::copy_elim::state::{CopyAnalysisState, CopyMask};

/// Borrows everything the walk needs for one `process_block` call. The
/// `registry`, `needed`, and `return_candidates` borrows are threaded
/// through from the owning `CopyElimAnalysis`, which is what makes them
/// persist across block visits within one fixpoint run.
pub struct Transfer<'a> {
    pub flow: &'a FlowContext,
    pub registry: &'a mut CopyIndexRegistry,
    pub needed: &'a mut CopyMask,
    pub return_candidates: &'a mut Vec<(CopyIndex, VarIndex)>,
    pub var_count: usize,
}

impl<'a> Transfer<'a> {
    pub fn visit_block(&mut self, block: &Block, state_in: CopyAnalysisState) -> CopyAnalysisState {
        let mut state = state_in;
        for stmt in &block.stmts {
            state = self.visit_stmt(stmt, state);
        }
        state
    }

    fn visit_stmt(&mut self, stmt: &Stmt, state: CopyAnalysisState) -> CopyAnalysisState {
        match stmt {
            Stmt::Expr(e) => self.visit_expr(e, state),
            Stmt::Return(Some(e)) => self.visit_return(e, state),
            Stmt::Return(None) => state,
        }
    }

    fn visit_expr(&mut self, expr: &Expr, state: CopyAnalysisState) -> CopyAnalysisState {
        match expr {
            Expr::Assign { id, target, value } => self.visit_assign(*id, target, value, state).0,
            Expr::Copy { inner, .. } => self.visit_expr(inner, state),
            Expr::Var(vref) => self.visit_var_ref(vref, state),
            Expr::Other { children, .. } => {
                children.iter().fold(state, |s, child| self.visit_expr(child, s))
            }
        }
    }

    /// Resolves a direct variable reference eligible for the assignment
    /// fast paths: statically named, not an auto-global, not reference-bound.
    /// Used for both the target and (after peeling) the source of an
    /// assignment — the same predicates qualify either side.
    fn qualifying_var_ref(&self, vref: &VarRef) -> Option<VarIndex> {
        match &vref.name {
            VarName::Direct(sym) => {
                if self.flow.is_auto_global(sym) {
                    return None;
                }
                let v = self.flow.resolve(sym)?;
                if self.flow.is_reference(v) {
                    return None;
                }
                Some(v)
            }
            VarName::Dynamic(_) => None,
        }
    }

    fn qualifying_direct_var(&self, expr: &Expr) -> Option<VarIndex> {
        match expr {
            Expr::Var(vref) => self.qualifying_var_ref(vref),
            _ => None,
        }
    }

    /// Returns the resulting state and, if `target` qualified as a direct
    /// variable, its handle — callers use the handle to chain case 2
    /// (nested qualifying assignment as the source).
    fn visit_assign(
        &mut self,
        _id: NodeId,
        target: &Expr,
        value: &Expr,
        state: CopyAnalysisState,
    ) -> (CopyAnalysisState, Option<VarIndex>) {
        let Some(t) = self.qualifying_direct_var(target) else {
            // Target isn't a qualifying direct variable: default recursion
            // into both sides, no handle to chain.
            let state = self.visit_expr(target, state);
            let state = self.visit_expr(value, state);
            return (state, None);
        };

        // Reassigning `t` discards whatever copies used to be pending on it
        // (all three cases below replace `state[t]` outright); that old
        // mask must join `needed` first; otherwise a later copy that
        // aliased the *old* value of `t` could wrongly look unnecessary.
        // We don't literally recurse into the target reference to get this
        // (it's not a generic var-ref walk — see `qualifying_direct_var`),
        // but the effect is the same as treating this reassignment as a
        // might-change access to `t`.
        if let Some(old_mask) = state.mask(t) {
            if !old_mask.is_empty() {
                *self.needed = self.needed.union(old_mask);
            }
        }

        let (inner, was_copied) = value.peel_copy();

        match inner {
            Expr::Var(vref) => match self.qualifying_var_ref(vref) {
                Some(v) => (self.apply_source_var(t, v, was_copied, value.id(), state), Some(t)),
                None => {
                    // Source var ref doesn't qualify (dynamic/auto-global/
                    // reference-bound): case 3, recurse into value.
                    let state = self.visit_expr(value, state);
                    (state.with_value(t, CopyMask::empty(), self.var_count), Some(t))
                }
            },
            Expr::Assign { id: inner_id, target: inner_target, value: inner_value, .. } => {
                // Case 2: the source is itself a qualifying assignment.
                let (state, v) = self.visit_assign(*inner_id, inner_target, inner_value, state);
                match v {
                    Some(v) => (self.apply_source_var(t, v, was_copied, value.id(), state), Some(t)),
                    None => (state.with_value(t, CopyMask::empty(), self.var_count), Some(t)),
                }
            }
            _ => {
                // Case 3: anything else. Recurse into value, then clear t.
                let state = self.visit_expr(value, state);
                (state.with_value(t, CopyMask::empty(), self.var_count), Some(t))
            }
        }
    }

    /// Applies case 1's state update once the source variable handle `v` is
    /// known, whether it came directly from a `Var` or by chaining through
    /// a nested assignment (case 2). `copy_node` is the id of the (possibly
    /// already-peeled) copy wrapper, registered only when `was_copied`.
    fn apply_source_var(
        &mut self,
        target: VarIndex,
        source: VarIndex,
        was_copied: bool,
        copy_node: NodeId,
        state: CopyAnalysisState,
    ) -> CopyAnalysisState {
        if was_copied {
            let copy_id = self.registry.register(copy_node);
            state.with_copy_assignment(target, source, copy_id, self.var_count)
        } else {
            let source_mask = state.mask(source).cloned().unwrap_or_else(CopyMask::empty);
            state.with_value(target, source_mask, self.var_count)
        }
    }

    fn visit_var_ref(&mut self, vref: &VarRef, state: CopyAnalysisState) -> CopyAnalysisState {
        let state = match &vref.name {
            VarName::Dynamic(name_expr) => self.visit_expr(name_expr, state),
            VarName::Direct(_) => state,
        };

        if !vref.access.might_change() {
            return state;
        }

        match &vref.name {
            VarName::Dynamic(_) => {
                trace!("dynamic variable name mutated, marking all pending copies needed");
                self.mark_all_needed(&state);
            }
            VarName::Direct(sym) => {
                if self.flow.is_auto_global(sym) {
                    return state;
                }
                if let Some(v) = self.flow.resolve(sym) {
                    if self.flow.is_reference(v) {
                        self.mark_all_needed(&state);
                    } else if let Some(mask) = state.mask(v) {
                        *self.needed = self.needed.union(mask);
                    }
                }
            }
        }

        state
    }

    fn mark_all_needed(&mut self, state: &CopyAnalysisState) {
        if let CopyAnalysisState::Mapped(masks) = state {
            for mask in masks {
                *self.needed = self.needed.union(mask);
            }
        }
    }

    fn visit_return(&mut self, expr: &Expr, state: CopyAnalysisState) -> CopyAnalysisState {
        if let Expr::Copy { inner, .. } = expr {
            if let Expr::Var(vref) = inner.as_ref() {
                if let VarName::Direct(sym) = &vref.name {
                    if !self.flow.is_auto_global(sym) {
                        if let Some(v) = self.flow.resolve(sym) {
                            let copy_id = self.registry.register(expr.id());
                            self.return_candidates.push((copy_id, v));
                        }
                    }
                }
            }
        }
        self.visit_expr(expr, state)
    }
}
