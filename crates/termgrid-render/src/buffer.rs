//! The 2-D grid of cells that callers draw into and the diff renderer
//! reads from.

use std::sync::Arc;

use termgrid_core::{Axis, CoreError, Point, Rect, WidthMethod, Wcwidth};

use crate::cell::Cell;

/// A row-major grid of `Cell`s with wide-character-aware area operations.
///
/// Construction, resize, and all area operations are infallible from the
/// caller's point of view: out-of-bounds writes are silently dropped (spec
/// §7 — `OutOfBounds` never surfaces), and `resize` with negative
/// dimensions is the sole case that returns `Err`.
pub struct ScreenBuffer {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    width_method: Arc<dyn WidthMethod>,
}

impl Clone for ScreenBuffer {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: self.cells.clone(),
            width_method: Arc::clone(&self.width_method),
        }
    }
}

impl std::fmt::Debug for ScreenBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl ScreenBuffer {
    /// Creates a `width x height` grid, every cell the empty cell, using
    /// the legacy wcwidth measurement by default.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_width_method(width, height, Arc::new(Wcwidth))
    }

    /// Creates a grid using an explicit `WidthMethod`, e.g. `GraphemeCluster`
    /// for callers that want modern emoji/ZWJ-aware measurement.
    #[must_use]
    pub fn with_width_method(width: u32, height: u32, width_method: Arc<dyn WidthMethod>) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::empty(); count],
            width_method,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn width_method(&self) -> &Arc<dyn WidthMethod> {
        &self.width_method
    }

    /// The rectangle `(0,0)..(width,height)`.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(0, 0, self.width, self.height)
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the cell at `(x, y)`, or `None` if out of bounds. A
    /// continuation placeholder is returned as-is — callers that want to
    /// skip it should check `Cell::is_continuation`.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Writes `cell` at `(x, y)`. Out of bounds is a silent no-op.
    ///
    /// If `cell` is wide and `(x+1, y)` is in bounds, the neighbor becomes
    /// a continuation placeholder. If the write would leave a half-wide
    /// cell dangling off the right edge, the cell is narrowed to width 1
    /// rather than silently truncated — the buffer never reports a
    /// half-written wide cell.
    ///
    /// If `(x, y)` was previously the continuation half of a wide cell, or
    /// this write clobbers the left half of a wide cell to its left, that
    /// other half is reset to empty so no dangling placeholder survives.
    pub fn set_cell(&mut self, x: i32, y: i32, mut cell: Cell) {
        if !self.in_bounds(x, y) {
            return;
        }
        self.clear_overlap(x, y);

        if cell.is_wide() && !self.in_bounds(x + 1, y) {
            cell = Cell::new(cell.grapheme(), 1, cell.style, cell.link.clone());
        }

        let idx = self.index(x, y);
        let wide = cell.is_wide();
        self.cells[idx] = cell;

        if wide {
            let ridx = self.index(x + 1, y);
            self.clear_overlap(x + 1, y);
            self.cells[ridx] = Cell::continuation();
        }
    }

    /// Resets whichever wide-cell half is overlapping `(x, y)` so that
    /// overwriting either half of a wide cell clears both atomically.
    fn clear_overlap(&mut self, x: i32, y: i32) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            let lidx = self.index(x - 1, y);
            self.cells[lidx] = Cell::empty();
        } else if self.cells[idx].is_wide() {
            if self.in_bounds(x + 1, y) {
                let ridx = self.index(x + 1, y);
                self.cells[ridx] = Cell::empty();
            }
        }
    }

    /// `fill_area(bounds(), empty)`.
    pub fn clear(&mut self) {
        let bounds = self.bounds();
        self.fill_area(bounds, Cell::empty());
    }

    /// `fill_area(r, empty)`.
    pub fn clear_area(&mut self, r: Rect) {
        self.fill_area(r, Cell::empty());
    }

    /// Writes `cell` to every cell in the buffer.
    pub fn fill(&mut self, cell: Cell) {
        let bounds = self.bounds();
        self.fill_area(bounds, cell);
    }

    /// Writes `cell` to every cell covered by `r`, honoring wide-cell
    /// stride (a wide fill cell advances the cursor by 2 columns so no two
    /// wide cells overlap). A zero-area `r` is a no-op.
    pub fn fill_area(&mut self, r: Rect, cell: Cell) {
        if r.is_empty() {
            return;
        }
        let area = self.bounds().intersection(r);
        if area.is_empty() {
            return;
        }
        let step = if cell.is_wide() { 2 } else { 1 };
        for y in area.min.y..area.max.y {
            let mut x = area.min.x;
            while x < area.max.x {
                self.set_cell(x, y, cell.clone());
                x += step;
            }
        }
    }

    /// A deep copy of the whole buffer.
    #[must_use]
    pub fn clone_buffer(&self) -> Self {
        self.clone()
    }

    /// A deep copy of the cells covered by `r`, reindexed so the clone's
    /// bounds start at `(0, 0)`.
    #[must_use]
    pub fn clone_area(&self, r: Rect) -> Self {
        let area = self.bounds().intersection(r);
        let width = area.width();
        let height = area.height();
        let mut out = Self::with_width_method(width, height, Arc::clone(&self.width_method));
        for y in 0..height {
            for x in 0..width {
                if let Some(src) = self.cell_at(area.min.x + x as i32, area.min.y + y as i32) {
                    if !src.is_continuation() {
                        out.set_cell(x as i32, y as i32, src.clone());
                    }
                }
            }
        }
        out
    }

    /// Resizes to `width x height`, preserving the top-left overlap with
    /// the old grid and clearing any newly exposed area. Rejects negative
    /// dimensions (callers pass `u32`, so this can only fail via overflow
    /// of the requested cell count, kept here for symmetry with the error
    /// surfaced by `LayoutEngine`/`DiffRenderer` call sites that resize
    /// from signed input).
    pub fn resize(&mut self, width: i64, height: i64) -> Result<(), CoreError> {
        if width < 0 || height < 0 {
            return Err(CoreError::InvalidDimension);
        }
        let (width, height) = (width as u32, height as u32);
        let mut next = Self::with_width_method(width, height, Arc::clone(&self.width_method));
        let overlap_w = self.width.min(width);
        let overlap_h = self.height.min(height);
        for y in 0..overlap_h {
            for x in 0..overlap_w {
                if let Some(src) = self.cell_at(x as i32, y as i32) {
                    if !src.is_continuation() {
                        next.set_cell(x as i32, y as i32, src.clone());
                    }
                }
            }
        }
        *self = next;
        Ok(())
    }

    /// Iterates the cells of row `y` left to right, or an empty iterator
    /// if `y` is out of bounds.
    pub fn row_cells(&self, y: i32) -> impl Iterator<Item = &Cell> {
        let (start, end) = if self.in_bounds(0, y) {
            let base = self.index(0, y);
            (base, base + self.width as usize)
        } else {
            (0, 0)
        };
        self.cells[start..end].iter()
    }

    /// Content equality: same dimensions and identical cells, ignoring
    /// which `WidthMethod` each side was constructed with.
    #[must_use]
    pub fn content_eq(&self, other: &ScreenBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }

    pub(crate) fn axis_size(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}
