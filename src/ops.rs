//! Solver-aware [`Expression`] operations.

use crate::{Expression, Term, Variable};

/// The boundary between the expression algebra and the solver owning the
/// tableau.
///
/// Every mutation that changes which variables participate in an expression
/// reports the change here, synchronously, before the mutating call returns.
/// That lets the solver keep its reverse index (variable → rows mentioning
/// it) and its external-variable edit log consistent with the expression at
/// all times. The calls are fire-and-forget: nothing is returned and the
/// algebra never inspects the outcome.
///
/// Methods take `&self`; a solver is expected to use interior mutability for
/// its own bookkeeping, matching the single-threaded model of this crate.
pub trait NotificationSink {
    /// `variable` now participates, with a fresh term, in the row whose
    /// basic variable is `subject`.
    fn variable_added(&self, variable: &Variable, subject: &Variable);

    /// `variable` no longer participates in `subject`'s row.
    fn variable_removed(&self, variable: &Variable, subject: &Variable);

    /// An externally-visible variable's effective value may have changed
    /// and must be recomputed.
    fn variable_changed(&self, variable: &Variable);
}

impl Expression {
    /// The central write path: merge `coefficient·variable` into the term
    /// set, reporting participation changes against `subject`.
    ///
    /// - existing term, coefficient `0.0`: the term is deleted (zero is not
    ///   a valid resting state here) and, when a subject is given, the
    ///   solver unregisters `variable`;
    /// - existing term, nonzero coefficient: the coefficient is overwritten
    ///   in place with no notification — only additions and removals are
    ///   reported;
    /// - no existing term: one is inserted and, when a subject is given,
    ///   the solver registers `variable`.
    ///
    /// Passing `subject = None` skips the solver bookkeeping entirely; that
    /// is what the internal rewriting paths use.
    pub fn add_variable_with_subject(
        &mut self,
        variable: &Variable,
        coefficient: f64,
        subject: Option<&Variable>,
    ) {
        if let Some(term) = self.term_mut(variable) {
            if coefficient != 0.0 {
                term.set_coefficient(coefficient);
            } else {
                if let Some(subject) = subject {
                    self.notify(|solver| {
                        solver.variable_removed(variable, subject)
                    });
                }

                self.take_term(variable);
            }

            return;
        }

        self.insert_term(Term::new(variable.clone(), coefficient));

        if let Some(subject) = subject {
            self.notify(|solver| solver.variable_added(variable, subject));
        }
    }

    /// [`Expression::add_variable_with_subject`] without the solver
    /// bookkeeping.
    pub fn add_variable(&mut self, variable: &Variable, coefficient: f64) {
        self.add_variable_with_subject(variable, coefficient, None);
    }

    /// Delete `variable`'s term outright, whatever its coefficient, telling
    /// the solver to unregister it when a subject is given.
    pub fn remove_variable_with_subject(
        &mut self,
        variable: &Variable,
        subject: Option<&Variable>,
    ) {
        if self.is_constant() {
            return;
        }

        if let Some(subject) = subject {
            self.notify(|solver| solver.variable_removed(variable, subject));
        }

        self.take_term(variable);
    }

    pub fn remove_variable(&mut self, variable: &Variable) {
        self.remove_variable_with_subject(variable, None);
    }

    /// Unconditionally insert or overwrite `variable`'s term, bypassing the
    /// merge logic of [`Expression::add_variable_with_subject`]. If the
    /// variable is external its effective value may just have changed, so
    /// the solver is told to resync it.
    pub fn set_variable(&mut self, variable: &Variable, coefficient: f64) {
        self.insert_term(Term::new(variable.clone(), coefficient));

        if variable.is_external() {
            self.notify(|solver| solver.variable_changed(variable));
        }
    }

    /// Set `variable`'s coefficient, where `0.0` means "remove the variable
    /// entirely". External variables get a resync notification on update.
    pub fn set_coefficient(&mut self, variable: &Variable, coefficient: f64) {
        if coefficient == 0.0 {
            self.remove_variable(variable);
        } else if let Some(term) = self.term_mut(variable) {
            term.set_coefficient(coefficient);

            if variable.is_external() {
                self.notify(|solver| solver.variable_changed(variable));
            }
        } else {
            self.add_variable(variable, coefficient);
        }
    }

    /// In-place `self += n·other`, threading `subject` through every term
    /// merge so the resulting notifications are attributed to the right
    /// row. `other` is left untouched.
    pub fn add_expression(
        &mut self,
        other: &Expression,
        n: f64,
        subject: Option<&Variable>,
    ) {
        self.constant += n * other.constant;

        for term in other.terms() {
            self.add_variable_with_subject(
                term.variable(),
                n * term.coefficient(),
                subject,
            );
        }
    }

    /// In-place multiply of the constant and every coefficient. Pure
    /// arithmetic: no participation changes, so no notifications. Scaling
    /// by `0.0` leaves the zeroed terms in place — only the dedicated
    /// removal paths prune terms.
    pub fn scale(&mut self, multiplier: f64) {
        self.constant *= multiplier;

        for term in self.terms.values_mut() {
            term.scale(multiplier);
        }
    }

    /// `self += constant`, folded in as a throwaway constant expression.
    pub fn plus(&mut self, constant: f64) {
        let e = Expression::new(constant);
        self.add_expression(&e, 1.0, None);
    }

    /// `self += variable`, folded in as a throwaway `1.0·variable` term.
    pub fn plus_variable(&mut self, variable: &Variable) {
        let e = Expression::from_variable(variable);
        self.add_expression(&e, 1.0, None);
    }
}
