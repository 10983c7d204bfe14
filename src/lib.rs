//! The linear expression algebra behind an incremental (Cassowary-style)
//! constraint solver.
//!
//! An [`Expression`] is a constant plus a set of [`Term`]s, each pairing a
//! [`Variable`] with a coefficient. The solver that owns the tableau builds
//! expressions from constraints, combines and pivots them through the
//! operations here, and is kept in the loop via the [`NotificationSink`]
//! contract whenever a variable starts or stops participating in an
//! expression.
//!
//! Everything is single-threaded and synchronous; sharing is plain
//! (non-atomic) reference counting.

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod expr;
pub mod ops;
mod pivot;
mod variable;

pub use expr::{Expression, Term};
pub use ops::NotificationSink;
pub use pivot::PIVOT_EPSILON;
pub use variable::{Variable, VariableId, VariableKind};
