use crate::ops::NotificationSink;
use smol_str::SmolStr;
use std::{
    cell::{Cell, RefCell},
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    rc::{Rc, Weak},
    sync::atomic::{AtomicU64, Ordering},
};

/// How a [`Variable`] is classified within the solver's tableau.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VariableKind {
    /// A user-visible variable. The solver reports value changes for these.
    Regular,
    /// A slack variable introduced to turn an inequality into an equality.
    /// Slack variables are eligible to become a row's basic variable.
    Slack,
    /// A marker variable used to detect whether a required constraint is
    /// satisfiable.
    Dummy,
    /// The variable standing in for the objective row.
    Objective,
}

impl VariableKind {
    fn is_external(self) -> bool { self == VariableKind::Regular }

    fn is_pivotable(self) -> bool { self == VariableKind::Slack }

    fn is_restricted(self) -> bool {
        match self {
            VariableKind::Slack | VariableKind::Dummy => true,
            VariableKind::Regular | VariableKind::Objective => false,
        }
    }
}

/// An opaque identifier with the same lifetime as the [`Variable`] it names.
///
/// Expressions key their term sets on this rather than on anything the
/// solver can mutate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(u64);

#[derive(Debug)]
struct Inner {
    id: VariableId,
    kind: VariableKind,
    name: Option<SmolStr>,
    value: Cell<f64>,
    solver: RefCell<Option<Weak<dyn NotificationSink>>>,
}

/// A handle to one of the solver's unknowns.
///
/// Variables compare by identity, not value: two handles are equal exactly
/// when they were cloned from the same original. Cloning a handle is cheap
/// and shares the underlying variable; every [`Term`][crate::Term] holds one
/// such handle.
#[derive(Debug, Clone)]
pub struct Variable {
    inner: Rc<Inner>,
}

impl Variable {
    pub fn new(kind: VariableKind) -> Self { Variable::with_name(kind, None) }

    pub fn named(kind: VariableKind, name: impl Into<SmolStr>) -> Self {
        Variable::with_name(kind, Some(name.into()))
    }

    fn with_name(kind: VariableKind, name: Option<SmolStr>) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);

        Variable {
            inner: Rc::new(Inner {
                id: VariableId(NEXT_ID.fetch_add(1, Ordering::Relaxed)),
                kind,
                name,
                value: Cell::new(0.0),
                solver: RefCell::new(None),
            }),
        }
    }

    pub fn id(&self) -> VariableId { self.inner.id }

    pub fn kind(&self) -> VariableKind { self.inner.kind }

    pub fn name(&self) -> Option<&str> { self.inner.name.as_deref() }

    pub fn value(&self) -> f64 { self.inner.value.get() }

    pub fn set_value(&self, value: f64) { self.inner.value.set(value); }

    /// Whether the variable is visible outside the solver, meaning the
    /// solver must report whenever its effective value changes.
    pub fn is_external(&self) -> bool { self.inner.kind.is_external() }

    /// Whether the variable may become a row's basic variable.
    pub fn is_pivotable(&self) -> bool { self.inner.kind.is_pivotable() }

    /// Whether the variable is constrained to be non-negative.
    pub fn is_restricted(&self) -> bool { self.inner.kind.is_restricted() }

    /// Bind the variable to the solver that owns it.
    /// [`Expression::from_variable`][crate::Expression::from_variable]
    /// consults this binding.
    pub fn bind_solver(&self, solver: Weak<dyn NotificationSink>) {
        *self.inner.solver.borrow_mut() = Some(solver);
    }

    pub(crate) fn solver(&self) -> Option<Weak<dyn NotificationSink>> {
        self.inner.solver.borrow().clone()
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool { self.inner.id == other.inner.id }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) { self.inner.id.hash(state) }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "v{}", self.inner.id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_flags() {
        let inputs = vec![
            // (kind, external, pivotable, restricted)
            (VariableKind::Regular, true, false, false),
            (VariableKind::Slack, false, true, true),
            (VariableKind::Dummy, false, false, true),
            (VariableKind::Objective, false, false, false),
        ];

        for (kind, external, pivotable, restricted) in inputs {
            let variable = Variable::new(kind);

            assert_eq!(variable.is_external(), external, "{:?}", kind);
            assert_eq!(variable.is_pivotable(), pivotable, "{:?}", kind);
            assert_eq!(variable.is_restricted(), restricted, "{:?}", kind);
        }
    }

    #[test]
    fn identity_equality_not_value_equality() {
        let x = Variable::named(VariableKind::Regular, "x");
        let also_x = Variable::named(VariableKind::Regular, "x");
        let handle = x.clone();

        assert_ne!(x, also_x, "same name, different variables");
        assert_eq!(x, handle);

        x.set_value(42.0);
        also_x.set_value(42.0);
        assert_ne!(x, also_x, "equal values don't make equal variables");
        assert_eq!(handle.value(), 42.0, "handles share the value");
    }

    #[test]
    fn display_uses_name_or_id() {
        let width = Variable::named(VariableKind::Regular, "width");
        assert_eq!(width.to_string(), "width");

        let anonymous = Variable::new(VariableKind::Slack);
        assert_eq!(anonymous.to_string(), format!("v{}", anonymous.id().0));
    }
}
