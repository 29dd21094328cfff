//! A Cassowary-style incremental simplex solver for linear arithmetic
//! constraints with prioritized soft constraints.
//!
//! This solver supports only constraint *addition*, never removal — each
//! `LayoutEngine::split` call builds a fresh `Solver`, adds every
//! constraint the request implies, reads back the values it needs, and
//! drops the solver. That usage pattern is what's specified (§4.5): there
//! is no incremental-edit API here, unlike a general-purpose UI constraint
//! solver.
//!
//! Rows are kept in a `BTreeMap` rather than a `HashMap` so that row
//! processing order never depends on hash iteration order (§9: "results
//! must not depend on it").

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A scalar is "zero" iff its magnitude is below this tolerance.
pub const EPSILON: f64 = 1e-8;

pub const REQUIRED: f64 = 1e9;
pub const STRONG: f64 = 1e6;
pub const MEDIUM: f64 = 1e3;
pub const WEAK: f64 = 1.0;

fn near_zero(x: f64) -> bool {
    x.abs() < EPSILON
}

/// The category of a Cassowary variable, tagged into the low 2 bits of its
/// `Symbol` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind {
    External,
    Slack,
    Error,
    Dummy,
}

impl SymbolKind {
    fn tag(self) -> u64 {
        match self {
            SymbolKind::External => 0,
            SymbolKind::Slack => 1,
            SymbolKind::Error => 2,
            SymbolKind::Dummy => 3,
        }
    }
}

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque variable identifier, tagged with its `SymbolKind`. Allocated
/// from a process-wide monotonic counter — the one hidden global the
/// design intentionally allows (§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u64);

impl Symbol {
    fn new(kind: SymbolKind) -> Self {
        let id = NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed);
        Symbol((id << 2) | kind.tag())
    }

    /// Allocates a fresh external symbol — one per layout edge
    /// (`start_i`/`end_i`) or caller-tracked quantity.
    #[must_use]
    pub fn external() -> Self {
        Self::new(SymbolKind::External)
    }

    #[must_use]
    pub fn kind(self) -> SymbolKind {
        match self.0 & 0b11 {
            0 => SymbolKind::External,
            1 => SymbolKind::Slack,
            2 => SymbolKind::Error,
            _ => SymbolKind::Dummy,
        }
    }

    fn restricted(self) -> bool {
        !matches!(self.kind(), SymbolKind::External)
    }
}

/// `{ constant, terms }` — a linear combination of symbols. No term has a
/// zero coefficient and no symbol appears twice.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    pub constant: f64,
    terms: BTreeMap<Symbol, f64>,
}

impl Expression {
    #[must_use]
    pub fn constant(c: f64) -> Self {
        Self {
            constant: c,
            terms: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn from_symbol(symbol: Symbol, coefficient: f64) -> Self {
        let mut e = Expression::constant(0.0);
        e.add_term(symbol, coefficient);
        e
    }

    /// Adds `coefficient * symbol` into this expression, merging with an
    /// existing term for the same symbol and dropping the term entirely if
    /// the merged coefficient rounds to zero.
    pub fn add_term(&mut self, symbol: Symbol, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        let entry = self.terms.entry(symbol).or_insert(0.0);
        *entry += coefficient;
        if near_zero(*entry) {
            self.terms.remove(&symbol);
        }
    }

    pub fn add_constant(&mut self, c: f64) {
        self.constant += c;
    }

    #[must_use]
    pub fn coefficient(&self, symbol: Symbol) -> f64 {
        self.terms.get(&symbol).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    fn terms_iter(&self) -> impl Iterator<Item = (Symbol, f64)> + '_ {
        self.terms.iter().map(|(&s, &c)| (s, c))
    }

    /// Adds `scale * other` into `self`, symbol by symbol.
    fn merge(&mut self, other: &Expression, scale: f64) {
        self.constant += scale * other.constant;
        for (symbol, coeff) in other.terms_iter() {
            self.add_term(symbol, scale * coeff);
        }
    }

    /// Replaces every occurrence of `symbol` with `replacement`, scaled by
    /// `symbol`'s own coefficient in `self` (i.e. inlines `replacement` in
    /// place of a basic variable's row).
    fn substitute(&mut self, symbol: Symbol, replacement: &Expression) {
        if let Some(coeff) = self.terms.remove(&symbol) {
            self.merge(replacement, coeff);
        }
    }

    /// Negates every term and the constant.
    fn negated(&self) -> Expression {
        let mut out = Expression::constant(-self.constant);
        for (s, c) in self.terms_iter() {
            out.add_term(s, -c);
        }
        out
    }

    /// Solves `self == 0` for `symbol`'s coefficient, producing the row
    /// expression `symbol = -(self without symbol) / coeff`.
    fn solve_for(&self, symbol: Symbol) -> Expression {
        let coeff = self.coefficient(symbol);
        debug_assert!(!near_zero(coeff));
        let factor = -1.0 / coeff;
        let mut out = Expression::constant(self.constant * factor);
        for (s, c) in self.terms_iter() {
            if s != symbol {
                out.add_term(s, c * factor);
            }
        }
        out
    }
}

/// `op` relates `expr` to zero: `Eq` means `expr == 0`, `Ge` means
/// `expr >= 0`, `Le` means `expr <= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ge,
    Le,
}

/// A single linear constraint at a given priority tier.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub expr: Expression,
    pub op: RelOp,
    pub priority: f64,
}

impl Constraint {
    #[must_use]
    pub fn new(expr: Expression, op: RelOp, priority: f64) -> Self {
        Self { expr, op, priority }
    }
}

/// Errors surfaced by `Solver::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    /// The constraint set has no solution; the solver's state is
    /// unchanged so it can be reused for a different attempt.
    #[error("constraint set is unsatisfiable")]
    Unsatisfiable,
    /// A term referenced a symbol with a zero or otherwise invalid
    /// coefficient at construction time; fatal only to this `add` call.
    #[error("invalid term in constraint expression")]
    BadTerm,
}

/// The incremental simplex tableau: `rows` maps each currently-basic
/// symbol to an expression in terms of non-basic symbols; `objective` is
/// the objective row, likewise expressed in non-basic symbols.
#[derive(Default)]
pub struct Solver {
    rows: BTreeMap<Symbol, Expression>,
    objective: Expression,
}

impl Solver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current value of `symbol`: the constant of its row if it's
    /// basic, else `0` (its implicit non-basic value).
    #[must_use]
    pub fn value(&self, symbol: Symbol) -> f64 {
        self.rows.get(&symbol).map_or(0.0, |row| row.constant)
    }

    /// Adds `constraint` at the given priority, pivoting the tableau as
    /// needed. On `Err(Unsatisfiable)`, the solver is left exactly as it
    /// was before the call.
    pub fn add(&mut self, constraint: Constraint) -> Result<(), SolverError> {
        if constraint
            .expr
            .terms_iter()
            .any(|(_, c)| !c.is_finite() || near_zero(c))
        {
            return Err(SolverError::BadTerm);
        }

        let snapshot_rows = self.rows.clone();
        let snapshot_objective = self.objective.clone();

        match self.try_add(constraint) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.rows = snapshot_rows;
                self.objective = snapshot_objective;
                Err(e)
            }
        }
    }

    fn try_add(&mut self, constraint: Constraint) -> Result<(), SolverError> {
        let mut expr = self.inline_basic_terms(constraint.expr);
        let mut objective_delta = Expression::constant(0.0);

        match constraint.op {
            RelOp::Ge | RelOp::Le => {
                let slack = Symbol::new(SymbolKind::Slack);
                let coeff = if constraint.op == RelOp::Ge { -1.0 } else { 1.0 };
                expr.add_term(slack, coeff);
                if constraint.priority < REQUIRED {
                    let eplus = Symbol::new(SymbolKind::Error);
                    let eminus = Symbol::new(SymbolKind::Error);
                    expr.add_term(eplus, -1.0);
                    expr.add_term(eminus, 1.0);
                    objective_delta.add_term(eplus, constraint.priority);
                    objective_delta.add_term(eminus, constraint.priority);
                }
            }
            RelOp::Eq => {
                if constraint.priority < REQUIRED {
                    let eplus = Symbol::new(SymbolKind::Error);
                    let eminus = Symbol::new(SymbolKind::Error);
                    expr.add_term(eplus, -1.0);
                    expr.add_term(eminus, 1.0);
                    objective_delta.add_term(eplus, constraint.priority);
                    objective_delta.add_term(eminus, constraint.priority);
                } else {
                    let dummy = Symbol::new(SymbolKind::Dummy);
                    expr.add_term(dummy, 1.0);
                }
            }
        }

        if expr.constant < 0.0 {
            expr = expr.negated();
        }

        match self.choose_subject(&expr) {
            Some(symbol) => self.pivot_in(symbol, &expr),
            None => {
                if expr.terms_iter().all(|(s, _)| s.kind() == SymbolKind::Dummy) {
                    if !near_zero(expr.constant) {
                        return Err(SolverError::Unsatisfiable);
                    }
                    // Trivially satisfied; no row needed.
                } else {
                    self.artificial_phase(&expr)?;
                }
            }
        }

        self.merge_objective(objective_delta);
        self.optimize();
        Ok(())
    }

    fn inline_basic_terms(&self, expr: Expression) -> Expression {
        let mut expr = expr;
        loop {
            let basic = expr
                .terms_iter()
                .find(|(s, _)| self.rows.contains_key(s))
                .map(|(s, _)| s);
            match basic {
                Some(symbol) => {
                    let row = self.rows.get(&symbol).unwrap().clone();
                    expr.substitute(symbol, &row);
                }
                None => break,
            }
        }
        expr
    }

    /// Picks the symbol to pivot into the basis for a freshly built
    /// constraint row, per the ordering in spec §4.4 step 4.
    fn choose_subject(&self, expr: &Expression) -> Option<Symbol> {
        if let Some((s, _)) = expr
            .terms_iter()
            .filter(|(s, _)| s.kind() == SymbolKind::External)
            .min_by_key(|(s, _)| *s)
        {
            return Some(s);
        }
        expr.terms_iter()
            .filter(|(s, c)| s.restricted() && s.kind() != SymbolKind::Dummy && *c < 0.0)
            .min_by_key(|(s, _)| *s)
            .map(|(s, _)| s)
    }

    fn pivot_in(&mut self, subject: Symbol, expr: &Expression) {
        let row = expr.solve_for(subject);
        for existing in self.rows.values_mut() {
            existing.substitute(subject, &row);
        }
        self.objective.substitute(subject, &row);
        self.rows.insert(subject, row);
    }

    /// Drives a fresh artificial variable to zero to find a feasible basis
    /// when no term could serve directly as a pivot subject. Returns
    /// `Unsatisfiable` if the artificial cannot be reduced to zero.
    fn artificial_phase(&mut self, expr: &Expression) -> Result<(), SolverError> {
        let artificial = Symbol::new(SymbolKind::Slack);
        self.rows.insert(artificial, expr.clone());

        let mut artificial_objective = expr.clone();
        self.minimize(&mut artificial_objective);

        if !near_zero(self.value(artificial)) {
            return Err(SolverError::Unsatisfiable);
        }
        Ok(())
    }

    fn merge_objective(&mut self, delta: Expression) {
        let delta = self.inline_basic_terms(delta);
        self.objective.merge(&delta, 1.0);
    }

    /// Optimizes `self.objective` in place, choosing entering variables
    /// from it directly.
    fn optimize(&mut self) {
        loop {
            let Some(entering) = self.entering_variable(&self.objective) else {
                break;
            };
            let Some(leaving) = self.find_leaving(entering) else {
                break;
            };
            self.pivot(entering, leaving, None);
        }
    }

    /// Optimizes an external `shadow` objective (used only during the
    /// artificial-variable phase) while keeping `self.objective` and
    /// `self.rows` in lockstep with every pivot.
    fn minimize(&mut self, shadow: &mut Expression) {
        loop {
            let Some(entering) = self.entering_variable(shadow) else {
                break;
            };
            let Some(leaving) = self.find_leaving(entering) else {
                break;
            };
            self.pivot(entering, leaving, Some(shadow));
        }
    }

    fn entering_variable(&self, objective: &Expression) -> Option<Symbol> {
        objective
            .terms_iter()
            .filter(|(s, c)| s.kind() != SymbolKind::Dummy && *c < 0.0)
            .min_by_key(|(s, _)| *s)
            .map(|(s, _)| s)
    }

    fn find_leaving(&self, entering: Symbol) -> Option<Symbol> {
        self.rows
            .iter()
            .filter_map(|(&basic, row)| {
                let coeff = row.coefficient(entering);
                if basic.restricted() && coeff < 0.0 {
                    Some((basic, -row.constant / coeff))
                } else {
                    None
                }
            })
            .min_by(|(sa, ra), (sb, rb)| ra.partial_cmp(rb).unwrap().then(sa.cmp(sb)))
            .map(|(s, _)| s)
    }

    fn pivot(&mut self, entering: Symbol, leaving: Symbol, shadow: Option<&mut Expression>) {
        let leaving_row = self.rows.remove(&leaving).unwrap();
        let new_row = leaving_row.solve_for(entering);
        for existing in self.rows.values_mut() {
            existing.substitute(entering, &new_row);
        }
        self.objective.substitute(entering, &new_row);
        if let Some(shadow) = shadow {
            shadow.substitute(entering, &new_row);
        }
        self.rows.insert(entering, new_row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr_from(terms: &[(Symbol, f64)], constant: f64) -> Expression {
        let mut e = Expression::constant(constant);
        for &(s, c) in terms {
            e.add_term(s, c);
        }
        e
    }

    // --- Expression bookkeeping ---

    #[test]
    fn add_term_merges_and_drops_zero_coefficient() {
        let s = Symbol::external();
        let mut e = Expression::constant(0.0);
        e.add_term(s, 3.0);
        e.add_term(s, -3.0);
        assert!(e.is_constant());
    }

    #[test]
    fn solve_for_isolates_symbol() {
        let s = Symbol::external();
        let t = Symbol::external();
        // 2s + t + 4 == 0  =>  s == -(t + 4)/2
        let e = expr_from(&[(s, 2.0), (t, 1.0)], 4.0);
        let solved = e.solve_for(s);
        assert!((solved.constant - (-2.0)).abs() < EPSILON);
        assert!((solved.coefficient(t) - (-0.5)).abs() < EPSILON);
    }

    // --- Required-only solving (spec §8 scenario 7) ---

    #[test]
    fn cassowary_split_scenario() {
        // l, m, r with r - l - 2m == 0, r - l >= 100, l >= 0 (all required)
        // expected l = 0, m = 50, r = 100.
        let l = Symbol::external();
        let m = Symbol::external();
        let r = Symbol::external();

        let mut solver = Solver::new();
        solver
            .add(Constraint::new(
                expr_from(&[(r, 1.0), (l, -1.0), (m, -2.0)], 0.0),
                RelOp::Eq,
                REQUIRED,
            ))
            .unwrap();
        solver
            .add(Constraint::new(
                expr_from(&[(r, 1.0), (l, -1.0)], -100.0),
                RelOp::Ge,
                REQUIRED,
            ))
            .unwrap();
        solver
            .add(Constraint::new(expr_from(&[(l, 1.0)], 0.0), RelOp::Ge, REQUIRED))
            .unwrap();

        assert!((solver.value(l) - 0.0).abs() < 1e-6);
        assert!((solver.value(m) - 50.0).abs() < 1e-6);
        assert!((solver.value(r) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn conflicting_required_equalities_are_unsatisfiable() {
        let x = Symbol::external();
        let mut solver = Solver::new();
        solver
            .add(Constraint::new(expr_from(&[(x, 1.0)], -5.0), RelOp::Eq, REQUIRED))
            .unwrap();
        let err = solver.add(Constraint::new(
            expr_from(&[(x, 1.0)], -10.0),
            RelOp::Eq,
            REQUIRED,
        ));
        assert_eq!(err, Err(SolverError::Unsatisfiable));
        // Solver still usable / unchanged after a failed add.
        assert!((solver.value(x) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn bad_term_is_rejected_without_mutating_solver() {
        let x = Symbol::external();
        let mut solver = Solver::new();
        let mut expr = Expression::constant(0.0);
        expr.terms.insert(x, 0.0); // zero coefficient, never legitimately constructed
        let err = solver.add(Constraint::new(expr, RelOp::Eq, REQUIRED));
        assert_eq!(err, Err(SolverError::BadTerm));
    }

    #[test]
    fn weak_constraint_pulls_value_toward_target_when_unconstrained() {
        let x = Symbol::external();
        let mut solver = Solver::new();
        solver
            .add(Constraint::new(expr_from(&[(x, 1.0)], -42.0), RelOp::Eq, WEAK))
            .unwrap();
        assert!((solver.value(x) - 42.0).abs() < 1e-6);
    }
}
