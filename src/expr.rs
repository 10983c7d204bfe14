use crate::{ops::NotificationSink, Variable, VariableId};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    ops::{Add, Mul, Neg, Sub},
    rc::{Rc, Weak},
};

/// One `(variable, coefficient)` pair inside an [`Expression`].
///
/// A term is exclusively owned by the expression holding it; the variable
/// handle inside it is shared. Any coefficient is stored verbatim, including
/// `0.0` and `NaN` — no validation happens at this layer.
#[derive(Debug, Clone)]
pub struct Term {
    variable: Variable,
    coefficient: f64,
}

impl Term {
    pub(crate) fn new(variable: Variable, coefficient: f64) -> Self {
        Term {
            variable,
            coefficient,
        }
    }

    pub fn variable(&self) -> &Variable { &self.variable }

    pub fn coefficient(&self) -> f64 { self.coefficient }

    pub(crate) fn set_coefficient(&mut self, coefficient: f64) {
        self.coefficient = coefficient;
    }

    pub(crate) fn scale(&mut self, multiplier: f64) {
        self.coefficient *= multiplier;
    }

    /// `coefficient * variable.value()`.
    pub fn value(&self) -> f64 { self.coefficient * self.variable.value() }
}

/// A linear combination of variables plus a constant:
/// `constant + Σ coefficientᵢ·variableᵢ`.
///
/// There is at most one [`Term`] per distinct variable; re-adding a variable
/// merges into the existing term instead of duplicating it. An expression
/// may hold a weak reference to the solver that owns it, in which case the
/// mutations in [`crate::ops`] report participation changes through the
/// [`NotificationSink`] contract — synchronously, before they return.
#[derive(Debug)]
pub struct Expression {
    pub(crate) constant: f64,
    pub(crate) terms: HashMap<VariableId, Term>,
    pub(crate) solver: Option<Weak<dyn NotificationSink>>,
}

impl Expression {
    /// A constant expression with no terms and no solver attached.
    pub fn new(constant: f64) -> Self {
        Expression {
            constant,
            terms: HashMap::new(),
            solver: None,
        }
    }

    /// A constant expression whose mutations notify `solver`.
    ///
    /// Only a weak reference is kept; once the solver is gone the
    /// notifications quietly stop.
    pub fn with_solver<S>(solver: &Rc<S>, constant: f64) -> Self
    where
        S: NotificationSink + 'static,
    {
        let solver = Rc::downgrade(solver) as Weak<dyn NotificationSink>;

        Expression {
            constant,
            terms: HashMap::new(),
            solver: Some(solver),
        }
    }

    /// The single-term expression `1.0·variable + 0.0`, bound to the
    /// variable's owning solver (if the variable has one).
    pub fn from_variable(variable: &Variable) -> Self {
        let mut expression = Expression {
            constant: 0.0,
            terms: HashMap::new(),
            solver: variable.solver(),
        };
        expression.add_variable(variable, 1.0);
        expression
    }

    pub fn constant(&self) -> f64 { self.constant }

    pub fn set_constant(&mut self, constant: f64) { self.constant = constant; }

    /// Whether the expression has no terms at all.
    pub fn is_constant(&self) -> bool { self.terms.is_empty() }

    /// The coefficient of `variable`, or `0.0` when the variable is absent.
    /// An absent variable and an explicit zero are observationally the same.
    pub fn coefficient_of(&self, variable: &Variable) -> f64 {
        self.terms
            .get(&variable.id())
            .map(Term::coefficient)
            .unwrap_or(0.0)
    }

    /// `constant + Σ coefficientᵢ·valueᵢ`, recomputed on every call.
    pub fn value(&self) -> f64 {
        self.constant + self.terms.values().map(Term::value).sum::<f64>()
    }

    /// Visit every term, in unspecified order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> + '_ {
        self.terms.values()
    }

    pub(crate) fn insert_term(&mut self, term: Term) {
        self.terms.insert(term.variable().id(), term);
    }

    pub(crate) fn term_mut(&mut self, variable: &Variable) -> Option<&mut Term> {
        self.terms.get_mut(&variable.id())
    }

    pub(crate) fn take_term(&mut self, variable: &Variable) -> Option<Term> {
        self.terms.remove(&variable.id())
    }

    pub(crate) fn notify<F>(&self, notification: F)
    where
        F: FnOnce(&dyn NotificationSink),
    {
        if let Some(solver) = self.solver.as_ref().and_then(Weak::upgrade) {
            notification(&*solver);
        }
    }
}

impl Clone for Expression {
    /// A deep copy: the same constant, a fresh [`Term`] (with its own
    /// variable handle) per existing term, and the same solver binding.
    /// Cloning never notifies the solver — it is a pure data copy.
    fn clone(&self) -> Self {
        Expression {
            constant: self.constant,
            terms: self.terms.clone(),
            solver: self.solver.clone(),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constant)?;

        // iteration order is unspecified, so sort for a stable rendering
        let mut terms: Vec<_> = self.terms.values().collect();
        terms.sort_by_key(|term| term.variable().id());

        for term in terms {
            if term.coefficient() < 0.0 {
                write!(f, " - {}*{}", -term.coefficient(), term.variable())?;
            } else {
                write!(f, " + {}*{}", term.coefficient(), term.variable())?;
            }
        }

        Ok(())
    }
}

// define some operator overloads to make building up an expression easier.

impl Add<f64> for Expression {
    type Output = Expression;

    fn add(mut self, rhs: f64) -> Expression {
        self.plus(rhs);
        self
    }
}

impl Add<&Variable> for Expression {
    type Output = Expression;

    fn add(mut self, rhs: &Variable) -> Expression {
        self.plus_variable(rhs);
        self
    }
}

impl Sub<f64> for Expression {
    type Output = Expression;

    fn sub(mut self, rhs: f64) -> Expression {
        self.plus(-rhs);
        self
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;

    fn mul(mut self, rhs: f64) -> Expression {
        self.scale(rhs);
        self
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(mut self) -> Expression {
        self.scale(-1.0);
        self
    }
}
