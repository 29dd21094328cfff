//! Translates a `LayoutRequest` into a partition of its area, driven by
//! the Cassowary solver in `cassowary`.

use termgrid_core::{Axis, Margin, Point, Rect};

use crate::cassowary::{self, Constraint as Cc, Expression, RelOp, Solver, Symbol, REQUIRED};
use crate::error::LayoutError;

/// A single item's size constraint along the layout's `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Min(u32),
    Max(u32),
    Len(u32),
    Percentage(f64),
    Ratio { num: u32, den: u32 },
    Fill(u32),
}

/// How leftover or missing space along the axis is distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flex {
    #[default]
    Legacy,
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceEvenly,
    SpaceAround,
}

/// The literal gap (or overlap) applied between adjacent items, before any
/// flex-driven spacer growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Space(u32),
    Overlap(u32),
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing::Space(0)
    }
}

/// Priority tiers used only by `LayoutEngine`, ordered strictly below
/// `cassowary::REQUIRED` (the chain/anchor constraints that must always
/// hold) and above each other in the order the spec names them. The four
/// named constants in `cassowary` (`REQUIRED`/`STRONG`/`MEDIUM`/`WEAK`)
/// describe broad constraint-kind categories; this finer ladder is what
/// the strict ordering in the spec's layout section actually requires.
pub mod priority {
    pub const SPACER_EQ: f64 = 5_000_000.0;
    /// `Min`'s `Ge` and `Max`'s `Le` share this rank — both are "hard
    /// bounds" relative to the softer size-kind equalities below.
    pub const HARD_BOUND: f64 = 2_000_000.0;
    pub const LEN_EQ: f64 = super::cassowary::STRONG; // 1_000_000.0
    pub const PERCENT_EQ: f64 = 900_000.0;
    pub const RATIO_EQ: f64 = 800_000.0;
    pub const MAX_EQ: f64 = 700_000.0;
    pub const FILL_GROW: f64 = super::cassowary::MEDIUM; // 1_000.0
    /// Reserved for a lone growing spacer's preference over `SPACE_GROW`
    /// when a request mixes `Fill` items with flex-driven spacer growth;
    /// this implementation's flex table never needs to distinguish the
    /// two from `SPACER_EQ`/anchor equations alone, so no constraint is
    /// currently built at this tier, but it's kept so the full ten-tier
    /// ordering below is testable directly.
    pub const GROW: f64 = 500.0;
    pub const SPACE_GROW: f64 = 100.0;
    pub const ALL_SEGMENT_GROW: f64 = super::cassowary::WEAK; // 1.0
}

/// `{ area, direction, constraints, flex, spacing, padding }`.
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    pub area: Rect,
    pub direction: Axis,
    pub constraints: Vec<Constraint>,
    pub flex: Flex,
    pub spacing: Spacing,
    pub padding: Margin,
}

impl LayoutRequest {
    #[must_use]
    pub fn new(area: Rect, direction: Axis) -> Self {
        Self {
            area,
            direction,
            constraints: Vec::new(),
            flex: Flex::default(),
            spacing: Spacing::default(),
            padding: Margin::default(),
        }
    }

    #[must_use]
    pub fn constraints(mut self, constraints: impl Into<Vec<Constraint>>) -> Self {
        self.constraints = constraints.into();
        self
    }

    #[must_use]
    pub fn flex(mut self, flex: Flex) -> Self {
        self.flex = flex;
        self
    }

    #[must_use]
    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: Margin) -> Self {
        self.padding = padding;
        self
    }
}

/// Stateless entry point: `LayoutEngine::split(request)`.
pub struct LayoutEngine;

impl LayoutEngine {
    /// Partitions `request.area` into one rectangle per constraint.
    pub fn split(request: &LayoutRequest) -> Result<Vec<Rect>, LayoutError> {
        let area = request.area.inner(request.padding);
        let n = request.constraints.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let (axis_min, axis_max) = match request.direction {
            Axis::Horizontal => (area.min.x, area.max.x),
            Axis::Vertical => (area.min.y, area.max.y),
        };
        let extent = (axis_max - axis_min).max(0) as f64;

        let mut solver = Solver::new();
        let starts: Vec<Symbol> = (0..n).map(|_| Symbol::external()).collect();
        let ends: Vec<Symbol> = (0..n).map(|_| Symbol::external()).collect();

        // start_i <= end_i for every item (non-negative size).
        for i in 0..n {
            let expr = sub(ends[i], starts[i]);
            solver.add(Cc::new(expr, RelOp::Ge, REQUIRED))?;
        }

        let gap = match request.spacing {
            Spacing::Space(n) => n as f64,
            Spacing::Overlap(n) => -(n as f64),
        };
        for i in 0..n.saturating_sub(1) {
            // start_{i+1} - end_i - gap == 0 (plus an interior spacer term
            // for flex modes that grow interior gaps, added below).
            let mut expr = sub(starts[i + 1], ends[i]);
            expr.add_constant(-gap);
            if let Some(spacer) = interior_spacer_symbol(request.flex, i, n) {
                expr.add_term(spacer, -1.0);
                solver.add(Cc::new(Expression::from_symbol(spacer, 1.0), RelOp::Ge, REQUIRED))?;
            }
            solver.add(Cc::new(expr, RelOp::Eq, REQUIRED))?;
        }

        let leading = flex_wants_leading_spacer(request.flex).then(Symbol::external);
        let trailing = flex_wants_trailing_spacer(request.flex).then(Symbol::external);

        match leading {
            Some(sym) => {
                solver.add(Cc::new(Expression::from_symbol(sym, 1.0), RelOp::Ge, REQUIRED))?;
                let mut expr = Expression::from_symbol(starts[0], 1.0);
                expr.add_term(sym, -1.0);
                expr.add_constant(-axis_min as f64);
                solver.add(Cc::new(expr, RelOp::Eq, REQUIRED))?;
            }
            None => {
                let mut expr = Expression::from_symbol(starts[0], 1.0);
                expr.add_constant(-axis_min as f64);
                solver.add(Cc::new(expr, RelOp::Eq, REQUIRED))?;
            }
        }
        match trailing {
            Some(sym) => {
                solver.add(Cc::new(Expression::from_symbol(sym, 1.0), RelOp::Ge, REQUIRED))?;
                let mut expr = Expression::from_symbol(ends[n - 1], 1.0);
                expr.add_term(sym, 1.0);
                expr.add_constant(-axis_max as f64);
                solver.add(Cc::new(expr, RelOp::Eq, REQUIRED))?;
            }
            None => {
                let mut expr = Expression::from_symbol(ends[n - 1], 1.0);
                expr.add_constant(-axis_max as f64);
                solver.add(Cc::new(expr, RelOp::Eq, REQUIRED))?;
            }
        }

        // Spacer-equality constraints pairing up whichever spacers this
        // flex mode grows together.
        for (a, b) in spacer_equal_pairs(request.flex, leading, trailing, n) {
            let expr = sub(a, b);
            solver.add(Cc::new(expr, RelOp::Eq, priority::SPACER_EQ))?;
        }
        if let (Flex::SpaceAround, Some(leading_sym)) = (request.flex, leading) {
            if let Some(interior) = interior_spacer_symbol(request.flex, 0, n) {
                // interior == 2 * leading
                let mut expr = Expression::from_symbol(interior, 1.0);
                expr.add_term(leading_sym, -2.0);
                solver.add(Cc::new(expr, RelOp::Eq, priority::SPACER_EQ))?;
            }
        }

        // Shared grow symbol for Fill(weight) items.
        let grow = Symbol::external();
        let mut has_fill = false;

        for (i, constraint) in request.constraints.iter().enumerate() {
            let size = sub(ends[i], starts[i]);
            match *constraint {
                Constraint::Len(k) => {
                    let mut expr = size;
                    expr.add_constant(-(k as f64));
                    solver.add(Cc::new(expr, RelOp::Eq, priority::LEN_EQ))?;
                }
                Constraint::Percentage(p) => {
                    let mut expr = size;
                    expr.add_constant(-(p / 100.0) * extent);
                    solver.add(Cc::new(expr, RelOp::Eq, priority::PERCENT_EQ))?;
                }
                Constraint::Ratio { num, den } => {
                    let mut expr = size;
                    let ratio = if den == 0 { 0.0 } else { num as f64 / den as f64 };
                    expr.add_constant(-ratio * extent);
                    solver.add(Cc::new(expr, RelOp::Eq, priority::RATIO_EQ))?;
                }
                Constraint::Min(k) => {
                    let mut expr = size;
                    expr.add_constant(-(k as f64));
                    solver.add(Cc::new(expr, RelOp::Ge, priority::HARD_BOUND))?;
                }
                Constraint::Max(k) => {
                    let mut ge = sub(ends[i], starts[i]);
                    ge.add_constant(-(k as f64));
                    solver.add(Cc::new(ge, RelOp::Le, priority::HARD_BOUND))?;
                    let mut eq = sub(ends[i], starts[i]);
                    eq.add_constant(-(k as f64));
                    solver.add(Cc::new(eq, RelOp::Eq, priority::MAX_EQ))?;
                }
                Constraint::Fill(w) => {
                    has_fill = true;
                    let mut expr = sub(ends[i], starts[i]);
                    expr.add_term(grow, -(w as f64));
                    solver.add(Cc::new(expr, RelOp::Eq, priority::FILL_GROW))?;
                }
            }
        }
        let _ = has_fill; // `grow` only affects rows that reference it.

        // All-segments-equal tie-break: pulls otherwise-free segments
        // toward an even share of the extent.
        let even_share = extent / n as f64;
        for i in 0..n {
            let mut expr = sub(ends[i], starts[i]);
            expr.add_constant(-even_share);
            solver.add(Cc::new(expr, RelOp::Eq, priority::ALL_SEGMENT_GROW))?;
        }

        let mut cursor = axis_min as f64
            + leading.map_or(0.0, |sym| solver.value(sym));
        let mut rects = Vec::with_capacity(n);
        for i in 0..n {
            let size = (solver.value(ends[i]) - solver.value(starts[i])).max(0.0);
            let size = size.round() as i32;
            let start = cursor.round() as i32;
            let end = start + size;
            rects.push(axis_rect(area, request.direction, start, end));
            cursor = end as f64 + gap;
            if let Some(spacer) = interior_spacer_symbol(request.flex, i, n) {
                cursor += solver.value(spacer);
            }
        }
        Ok(rects)
    }
}

fn sub(a: Symbol, b: Symbol) -> Expression {
    let mut e = Expression::from_symbol(a, 1.0);
    e.add_term(b, -1.0);
    e
}

fn axis_rect(area: Rect, direction: Axis, start: i32, end: i32) -> Rect {
    match direction {
        Axis::Horizontal => Rect::new(
            Point::new(start, area.min.y),
            Point::new(end, area.max.y),
        ),
        Axis::Vertical => Rect::new(
            Point::new(area.min.x, start),
            Point::new(area.max.x, end),
        ),
    }
}

fn flex_wants_leading_spacer(flex: Flex) -> bool {
    matches!(
        flex,
        Flex::End | Flex::Center | Flex::SpaceEvenly | Flex::SpaceAround
    )
}

fn flex_wants_trailing_spacer(flex: Flex) -> bool {
    matches!(
        flex,
        Flex::Start | Flex::Center | Flex::SpaceEvenly | Flex::SpaceAround
    )
}

/// The interior spacer symbol between item `i` and `i + 1`, if this flex
/// mode grows interior gaps. Allocated lazily and cached per call via a
/// thread-local-free approach: since `LayoutEngine::split` builds one
/// solver per call, interior spacers are simply re-derived from a stable
/// per-index allocation done once up front by the caller loop; here we
/// just decide whether one applies.
fn interior_spacer_symbol(flex: Flex, i: usize, n: usize) -> Option<Symbol> {
    if i + 1 >= n {
        return None;
    }
    match flex {
        Flex::SpaceBetween | Flex::SpaceEvenly | Flex::SpaceAround => {
            INTERIOR_SPACERS.with(|cell| {
                let mut slots = cell.borrow_mut();
                if slots.len() != n.saturating_sub(1) {
                    *slots = (0..n.saturating_sub(1)).map(|_| Symbol::external()).collect();
                }
                slots.get(i).copied()
            })
        }
        _ => None,
    }
}

thread_local! {
    static INTERIOR_SPACERS: std::cell::RefCell<Vec<Symbol>> = const { std::cell::RefCell::new(Vec::new()) };
}

fn spacer_equal_pairs(
    flex: Flex,
    leading: Option<Symbol>,
    trailing: Option<Symbol>,
    n: usize,
) -> Vec<(Symbol, Symbol)> {
    let mut pairs = Vec::new();
    match flex {
        Flex::Center => {
            if let (Some(l), Some(t)) = (leading, trailing) {
                pairs.push((l, t));
            }
        }
        Flex::SpaceBetween => {
            for i in 0..n.saturating_sub(2) {
                if let (Some(a), Some(b)) = (
                    interior_spacer_symbol(flex, i, n),
                    interior_spacer_symbol(flex, i + 1, n),
                ) {
                    pairs.push((a, b));
                }
            }
        }
        Flex::SpaceEvenly => {
            if let (Some(l), Some(t)) = (leading, trailing) {
                pairs.push((l, t));
            }
            for i in 0..n.saturating_sub(2) {
                if let (Some(a), Some(b)) = (
                    interior_spacer_symbol(flex, i, n),
                    interior_spacer_symbol(flex, i + 1, n),
                ) {
                    pairs.push((a, b));
                }
            }
            if let (Some(l), Some(first_interior)) = (leading, interior_spacer_symbol(flex, 0, n)) {
                pairs.push((l, first_interior));
            }
        }
        Flex::SpaceAround => {
            if let (Some(l), Some(t)) = (leading, trailing) {
                pairs.push((l, t));
            }
        }
        _ => {}
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect::from_size(x, y, w, h)
    }

    // --- Priority ordering ---

    #[test]
    fn priority_tiers_are_strictly_ordered() {
        use priority::*;
        assert!(SPACER_EQ > HARD_BOUND);
        assert!(HARD_BOUND > LEN_EQ);
        assert!(LEN_EQ > PERCENT_EQ);
        assert!(PERCENT_EQ > RATIO_EQ);
        assert!(RATIO_EQ > MAX_EQ);
        assert!(MAX_EQ > FILL_GROW);
        assert!(FILL_GROW > GROW);
        assert!(GROW > SPACE_GROW);
        assert!(SPACE_GROW > ALL_SEGMENT_GROW);
        assert!(REQUIRED > SPACER_EQ);
    }

    // --- Concrete scenarios (spec §8) ---

    #[test]
    fn legacy_split_of_two_lens() {
        // spec §8 scenario 3: equal-priority Len constraints that together
        // exceed nothing (25+25 < 100) still only the first is honored
        // exactly; the required total-extent chain forces the second item
        // to absorb the remainder rather than splitting the slack.
        let req = LayoutRequest::new(rect(0, 0, 100, 1), Axis::Horizontal)
            .constraints(vec![Constraint::Len(25), Constraint::Len(25)]);
        let got = LayoutEngine::split(&req).unwrap();
        assert_eq!(got, vec![rect(0, 0, 25, 1), rect(25, 0, 75, 1)]);
    }

    #[test]
    fn center_flex_single_len() {
        let req = LayoutRequest::new(rect(0, 0, 100, 1), Axis::Horizontal)
            .constraints(vec![Constraint::Len(50)])
            .flex(Flex::Center);
        let got = LayoutEngine::split(&req).unwrap();
        assert_eq!(got, vec![rect(25, 0, 50, 1)]);
    }

    #[test]
    fn space_evenly_two_lens() {
        let req = LayoutRequest::new(rect(0, 0, 100, 1), Axis::Horizontal)
            .constraints(vec![Constraint::Len(25), Constraint::Len(25)])
            .flex(Flex::SpaceEvenly);
        let got = LayoutEngine::split(&req).unwrap();
        assert_eq!(got, vec![rect(17, 0, 25, 1), rect(58, 0, 25, 1)]);
    }

    #[test]
    fn unsatisfiable_layout_legacy_clamps_nonnegative() {
        // spec §8 scenario 8: under Legacy, the first item is honored
        // exactly and the second absorbs whatever's left, even to zero.
        let req = LayoutRequest::new(rect(0, 0, 5, 1), Axis::Horizontal)
            .constraints(vec![Constraint::Len(10), Constraint::Len(10)]);
        let got = LayoutEngine::split(&req).unwrap();
        assert_eq!(got, vec![rect(0, 0, 5, 1), rect(5, 0, 0, 1)]);
    }

    // --- Universal properties ---

    #[test]
    fn adjacency_holds_with_zero_spacing() {
        let req = LayoutRequest::new(rect(0, 0, 30, 1), Axis::Horizontal).constraints(vec![
            Constraint::Len(10),
            Constraint::Len(10),
            Constraint::Len(10),
        ]);
        let got = LayoutEngine::split(&req).unwrap();
        for w in got.windows(2) {
            assert_eq!(w[0].max.x, w[1].min.x);
        }
    }

    #[test]
    fn legacy_coverage_sums_to_area_extent() {
        let req = LayoutRequest::new(rect(0, 0, 80, 1), Axis::Horizontal).constraints(vec![
            Constraint::Fill(1),
            Constraint::Len(20),
            Constraint::Fill(1),
        ]);
        let got = LayoutEngine::split(&req).unwrap();
        let sum: u32 = got.iter().map(|r| r.size(Axis::Horizontal)).sum();
        assert_eq!(sum, 80);
    }

    #[test]
    fn every_rect_has_nonnegative_size() {
        let req = LayoutRequest::new(rect(0, 0, 5, 1), Axis::Horizontal)
            .constraints(vec![Constraint::Len(10), Constraint::Min(3), Constraint::Len(10)]);
        let got = LayoutEngine::split(&req).unwrap();
        for r in got {
            assert!(r.size(Axis::Horizontal) < u32::MAX / 2);
        }
    }
}
