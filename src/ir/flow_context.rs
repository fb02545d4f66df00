//! Variable indexing and the two predicates the transfer function needs from
//! a host compiler's symbol table: reference-binding and auto-global status.
//!
//! Name resolution proper (parsing scopes, shadowing, etc.) is out of scope;
//! this is the minimal read-only view the analysis consumes.

use crate::common::fx_hash::{FxHashMap, FxHashSet};
use crate::ir::expr::{Symbol, VarIndex};

/// Read-only view over a routine's variable indexing and two analysis-
/// relevant predicates. Never mutated during analysis.
#[derive(Debug, Clone, Default)]
pub struct FlowContext {
    names: FxHashMap<Symbol, VarIndex>,
    reference_vars: FxHashSet<VarIndex>,
    auto_globals: FxHashSet<Symbol>,
    var_count: usize,
}

impl FlowContext {
    pub fn new(var_count: usize) -> Self {
        Self { var_count, ..Default::default() }
    }

    /// Registers a local variable, making it resolvable by name.
    pub fn declare_var(&mut self, name: impl Into<Symbol>, index: VarIndex) {
        self.names.insert(name.into(), index);
    }

    /// Flags `index` as reference-bound (aliased by the language's explicit
    /// reference feature); the analysis treats this conservatively.
    pub fn mark_reference(&mut self, index: VarIndex) {
        self.reference_vars.insert(index);
    }

    /// Registers `name` as an auto-global, excluded from analysis.
    pub fn mark_auto_global(&mut self, name: impl Into<Symbol>) {
        self.auto_globals.insert(name.into());
    }

    pub fn var_count(&self) -> usize {
        self.var_count
    }

    pub fn resolve(&self, name: &Symbol) -> Option<VarIndex> {
        self.names.get(name).copied()
    }

    pub fn is_reference(&self, index: VarIndex) -> bool {
        self.reference_vars.contains(&index)
    }

    pub fn is_auto_global(&self, name: &Symbol) -> bool {
        self.auto_globals.contains(name)
    }
}
