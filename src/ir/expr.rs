//! The expression-tree shapes the transfer function pattern-matches on.
//!
//! This is a deliberately thin stand-in for a host compiler's real expression
//! representation: CFG construction, name resolution, and the rest of the
//! frontend live elsewhere, so only the handful of shapes the analysis
//! itself needs to recognize are modeled. Anything else a real tree would
//! contain (calls, binary ops, literals, ...) is collapsed into
//! `Expr::Other`, which default-recurses into its children.

use std::rc::Rc;

/// Stable identity token for an expression-tree node, assigned when the tree
/// was built. Used in place of reference-equality so the `CopyIndex` registry
/// can key on plain `Eq + Hash` rather than pointer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Dense, zero-based index of a local variable within one routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarIndex(pub u32);

impl VarIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An interned-by-content variable or auto-global name.
///
/// Cheap to clone (refcounted) and compares by content, which is what the
/// `FlowContext` name table and the auto-global set both need.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(pub Rc<str>);

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol(Rc::from(s))
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol(Rc::from(s.as_str()))
    }
}

/// How a variable reference is used at its occurrence site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// A plain read; cannot mutate the variable.
    Read,
    /// An unconditional write (the assignment-target case is handled
    /// separately by `qualifying_direct_var`, but a write to a variable that
    /// doesn't qualify as direct still reaches here via default recursion).
    Write,
    /// Compound assignment, increment, `unset`, and similar read+write forms.
    ReadModifyWrite,
    /// Bound via the language's reference-binding feature (`$x =& $y`).
    RefBind,
    /// Passed as a by-reference call argument.
    PassByRef,
}

impl AccessMode {
    /// Whether this access could mutate the variable's contents.
    pub fn might_change(self) -> bool {
        matches!(
            self,
            AccessMode::Write
                | AccessMode::ReadModifyWrite
                | AccessMode::RefBind
                | AccessMode::PassByRef
        )
    }
}

/// The name half of a variable reference: either statically known, or
/// computed at runtime (`$$x`).
#[derive(Debug, Clone)]
pub enum VarName {
    Direct(Symbol),
    /// The boxed expression computes the name at runtime. Still visited by
    /// default recursion even though the analysis can say nothing precise
    /// about which variable it denotes.
    Dynamic(Box<Expr>),
}

/// A single variable reference occurrence.
#[derive(Debug, Clone)]
pub struct VarRef {
    pub id: NodeId,
    pub name: VarName,
    pub access: AccessMode,
}

/// The expression-tree shapes the transfer function recognizes.
///
/// Modeled as a tagged union with explicit children rather than a class
/// hierarchy: dispatch is a single `match`, and any shape the analysis has
/// no special handling for still exposes its children for default
/// recursion via `Expr::Other`.
#[derive(Debug, Clone)]
pub enum Expr {
    Var(VarRef),
    /// An explicit value-copy wrapper inserted to preserve value semantics.
    /// Its physical absence around a value (as opposed to this variant being
    /// present) is how the walker tells "already removed by an earlier pass"
    /// apart from "still needs a copy".
    Copy { id: NodeId, inner: Box<Expr> },
    Assign {
        id: NodeId,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// Any other expression shape (calls, operators, literals, ...),
    /// collapsed to its children for default recursion.
    Other { id: NodeId, children: Vec<Expr> },
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Var(v) => v.id,
            Expr::Copy { id, .. } => *id,
            Expr::Assign { id, .. } => *id,
            Expr::Other { id, .. } => *id,
        }
    }

    /// Peels a `Copy` wrapper off, if present.
    ///
    /// Returns `(inner, true)` if `self` is a `Copy` node, `(self, false)`
    /// otherwise — the latter case is how the walker recognizes that an
    /// earlier pass already removed the copy that used to be here.
    pub fn peel_copy(&self) -> (&Expr, bool) {
        match self {
            Expr::Copy { inner, .. } => (inner, true),
            other => (other, false),
        }
    }
}

/// A statement within a basic block.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Return(Option<Expr>),
}
