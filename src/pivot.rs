//! Pivot support: the Gauss–Jordan rewrite the solver performs when it
//! changes which variable is basic for a row.

use crate::{Expression, Term, Variable};

/// Pivot coefficients whose magnitude is at or below this threshold are
/// treated as non-invertible: [`Expression::new_subject`] yields a `0.0`
/// reciprocal instead of dividing by them.
pub const PIVOT_EPSILON: f64 = f64::EPSILON;

impl Expression {
    /// Eliminate `subject` from the expression, turning a row in which
    /// `subject` appears with coefficient `c` into the same row solved for
    /// `subject`.
    ///
    /// `subject`'s term is removed and the remaining constant and
    /// coefficients are scaled by `-1/c`. Returns the reciprocal `1/c` —
    /// or `0.0` when `|c|` is within [`PIVOT_EPSILON`] of zero, the signal
    /// for the solver to treat the pivot as non-invertible and pick a
    /// different row or column. `subject` must currently appear in the
    /// expression.
    pub fn new_subject(&mut self, subject: &Variable) -> f64 {
        let term = self.take_term(subject);
        debug_assert!(
            term.is_some(),
            "the subject must appear in the expression"
        );

        let coefficient =
            term.map(|term| term.coefficient()).unwrap_or(0.0);

        let mut reciprocal = 0.0;
        if coefficient.abs() > PIVOT_EPSILON {
            reciprocal = 1.0 / coefficient;
        }

        self.scale(-reciprocal);

        reciprocal
    }

    /// Swap the row's basic variable: eliminate `new_subject` from the
    /// expression and re-insert `old_subject` with the resulting reciprocal
    /// as its coefficient. The expression that read `old_subject = …`
    /// afterwards reads `new_subject = …` solved the other way around.
    pub fn change_subject(
        &mut self,
        old_subject: &Variable,
        new_subject: &Variable,
    ) {
        let reciprocal = self.new_subject(new_subject);
        self.set_variable(old_subject, reciprocal);
    }

    /// The first pivotable variable found in the term set (iteration order
    /// is unspecified), or `None` when no term qualifies.
    ///
    /// A term-less expression also yields `None`, with a diagnostic: a
    /// pivot row should never degenerate to a bare constant while solving.
    pub fn pivotable_variable(&self) -> Option<Variable> {
        if self.is_constant() {
            log::warn!("expression `{}` is a constant", self);
            return None;
        }

        self.terms()
            .map(Term::variable)
            .find(|variable| variable.is_pivotable())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariableKind;

    fn regular(name: &str) -> Variable {
        Variable::named(VariableKind::Regular, name)
    }

    #[test]
    fn new_subject_inverts_and_eliminates() {
        let x = regular("x");
        let y = regular("y");

        let mut e = Expression::new(10.0);
        e.add_variable(&x, 2.0);
        e.add_variable(&y, 4.0);

        let reciprocal = e.new_subject(&x);

        assert_eq!(reciprocal, 0.5);
        assert_eq!(e.coefficient_of(&x), 0.0);
        assert!(e.terms().all(|term| term.variable() != &x));
        // the rest of the row is scaled by -1/c
        assert_eq!(e.constant(), -5.0);
        assert_eq!(e.coefficient_of(&y), -2.0);
    }

    #[test]
    fn near_zero_pivots_are_not_invertible() {
        let x = regular("x");
        let y = regular("y");

        let mut e = Expression::new(3.0);
        e.set_variable(&x, 0.0);
        e.add_variable(&y, 2.0);

        let reciprocal = e.new_subject(&x);

        assert_eq!(reciprocal, 0.0, "|c| within epsilon of zero");
        assert!(e.terms().all(|term| term.variable() != &x));
    }

    #[test]
    fn pivot_round_trip_reconstructs_the_row() {
        let subject = regular("s");
        let x = regular("x");
        let y = regular("y");

        let constant = 7.0;
        let c = 2.0;
        let mut e = Expression::new(constant);
        e.add_variable(&subject, c);
        e.add_variable(&x, 3.0);
        e.add_variable(&y, -4.0);

        let reciprocal = e.new_subject(&subject);
        assert!(approx::relative_eq!(reciprocal, 1.0 / c));

        // undo: re-insert the subject with the reciprocal, then apply the
        // inverse scale
        e.set_variable(&subject, reciprocal);
        e.scale(-1.0 / reciprocal);

        assert!(approx::relative_eq!(e.constant(), constant));
        assert!(approx::relative_eq!(e.coefficient_of(&x), 3.0));
        assert!(approx::relative_eq!(e.coefficient_of(&y), -4.0));
        // the subject comes back normalized rather than with its original
        // coefficient; the row now stands for `0 = e - s`
        assert!(approx::relative_eq!(e.coefficient_of(&subject), -1.0));
    }

    #[test]
    fn change_subject_reinserts_the_old_subject() {
        let x = regular("x");
        let y = regular("y");

        // the row `x = 20 + 2y`
        let mut e = Expression::new(20.0);
        e.add_variable(&y, 2.0);

        e.change_subject(&x, &y);

        // now `y = -10 + 0.5x`
        assert_eq!(e.constant(), -10.0);
        assert_eq!(e.coefficient_of(&x), 0.5);
        assert_eq!(e.coefficient_of(&y), 0.0);
        assert!(e.terms().all(|term| term.variable() != &y));
    }

    #[test]
    fn pivotable_scan_prefers_pivotable_terms() {
        let external = regular("width");
        let slack = Variable::new(VariableKind::Slack);

        let mut e = Expression::new(0.0);
        e.add_variable(&external, 1.0);
        e.add_variable(&slack, 1.0);

        assert_eq!(e.pivotable_variable(), Some(slack));
    }

    #[test]
    fn no_pivotable_variable_is_not_an_error() {
        let external = regular("width");
        let dummy = Variable::new(VariableKind::Dummy);

        let mut e = Expression::new(0.0);
        e.add_variable(&external, 1.0);
        e.add_variable(&dummy, 1.0);
        assert_eq!(e.pivotable_variable(), None);

        let constant = Expression::new(42.0);
        assert_eq!(constant.pivotable_variable(), None);
    }
}
