//! Computes and emits the minimal ANSI byte sequence that transitions a
//! terminal from the previously committed frame to a newly composed one.

use std::io::Write;
use std::sync::Arc;

use termgrid_core::Point;
use termgrid_style::{Link, Style};

use crate::ansi::{self, cost_model};
use crate::buffer::ScreenBuffer;
use crate::cell::Cell;
use crate::error::RenderError;

/// Tracks previous-frame state and emits diffs between it and newly
/// composed frames.
///
/// One `DiffRenderer` is created per output sink (spec §3). Mode-flag
/// transitions (alt screen, cursor visibility) are recorded as pending and
/// flushed at the start of the next `commit`, strictly before any cell
/// bytes — this is the corrected ordering from spec §9's noted Open
/// Question, not the buggy one.
pub struct DiffRenderer {
    previous: ScreenBuffer,
    cursor: Option<Point>,
    current_style: Style,
    current_link: Option<Link>,
    alt_screen: bool,
    pending_alt_screen: Option<bool>,
    cursor_visible: bool,
    pending_cursor_visible: Option<bool>,
    relative_cursor: bool,
    requested_cursor: Option<Point>,
}

impl DiffRenderer {
    /// Creates a renderer whose `previous` buffer starts as an empty
    /// `width x height` grid, so the first `commit` is always a full
    /// redraw.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            previous: ScreenBuffer::new(width, height),
            cursor: None,
            current_style: Style::default(),
            current_link: None,
            alt_screen: false,
            pending_alt_screen: None,
            cursor_visible: true,
            pending_cursor_visible: None,
            relative_cursor: false,
            requested_cursor: None,
        }
    }

    pub fn enter_alt_screen(&mut self) {
        self.pending_alt_screen = Some(true);
    }

    pub fn exit_alt_screen(&mut self) {
        self.pending_alt_screen = Some(false);
    }

    pub fn show_cursor(&mut self) {
        self.pending_cursor_visible = Some(true);
    }

    pub fn hide_cursor(&mut self) {
        self.pending_cursor_visible = Some(false);
    }

    pub fn set_relative_cursor(&mut self, relative: bool) {
        self.relative_cursor = relative;
    }

    /// Requests that the cursor be moved to `p` at the end of the next
    /// `commit`'s emission, overriding "leave it where the last cell
    /// landed." Cleared after each commit.
    pub fn request_cursor(&mut self, p: Option<Point>) {
        self.requested_cursor = p;
    }

    /// Diffs `current` against the last committed frame and writes the
    /// resulting byte sequence to `out`, then atomically promotes `current`
    /// to be the new `previous`.
    ///
    /// On write failure, `out` may have already received a prefix of the
    /// bytes, but no renderer state (previous buffer, style/link tracking,
    /// pending mode flags) is mutated, so retrying with the same `current`
    /// re-emits a consistent diff.
    pub fn commit<W: Write>(&mut self, current: &ScreenBuffer, out: &mut W) -> Result<(), RenderError> {
        let mut buf = Vec::new();
        let mut cursor = self.cursor;
        let mut style = self.current_style;
        let mut link = self.current_link.clone();

        if let Some(entering) = self.pending_alt_screen {
            buf.extend_from_slice(if entering {
                ansi::ENTER_ALT_SCREEN
            } else {
                ansi::EXIT_ALT_SCREEN
            });
        }
        if let Some(visible) = self.pending_cursor_visible {
            buf.extend_from_slice(if visible {
                ansi::SHOW_CURSOR
            } else {
                ansi::HIDE_CURSOR
            });
        }

        let resized = current.width() != self.previous.width() || current.height() != self.previous.height();

        if resized {
            let blank = ScreenBuffer::new(current.width(), current.height());
            emit_full_row_diff(&blank, current, &mut buf, &mut cursor, &mut style, &mut link);
        } else if !current.content_eq(&self.previous) {
            if let Some(shift) = detect_vertical_shift(&self.previous, current) {
                emit_scroll(&mut buf, shift, current.height());
                // DECSTBM (set_scroll_region) homes the cursor to (1,1) as a
                // side effect, so the tracked position is no longer valid.
                cursor = None;
                let shifted = shifted_copy(&self.previous, shift);
                emit_row_diff(&shifted, current, &mut buf, &mut cursor, &mut style, &mut link);
            } else {
                emit_row_diff(&self.previous, current, &mut buf, &mut cursor, &mut style, &mut link);
            }
        }

        if let Some(target) = self.requested_cursor {
            move_cursor(&mut buf, &mut cursor, target);
        }

        out.write_all(&buf)?;

        self.previous = current.clone();
        self.cursor = cursor;
        self.current_style = style;
        self.current_link = link;
        if let Some(entering) = self.pending_alt_screen.take() {
            self.alt_screen = entering;
        }
        if let Some(visible) = self.pending_cursor_visible.take() {
            self.cursor_visible = visible;
        }
        self.requested_cursor = None;
        Ok(())
    }

    #[must_use]
    pub fn is_alt_screen(&self) -> bool {
        self.alt_screen
    }

    #[must_use]
    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}

/// A vertical shift, in rows, between `previous` and `current`. Positive
/// means content scrolled up (earlier rows dropped off the top); negative
/// means it scrolled down.
fn detect_vertical_shift(previous: &ScreenBuffer, current: &ScreenBuffer) -> Option<i32> {
    let height = current.height();
    if height < 2 {
        return None;
    }
    for k in 1..height {
        if rows_match_shifted(previous, current, k, true) {
            return Some(k as i32);
        }
    }
    for k in 1..height {
        if rows_match_shifted(previous, current, k, false) {
            return Some(-(k as i32));
        }
    }
    None
}

fn rows_match_shifted(previous: &ScreenBuffer, current: &ScreenBuffer, k: u32, up: bool) -> bool {
    let height = current.height();
    for y in 0..(height - k) {
        let (py, cy) = if up { (y + k, y) } else { (y, y + k) };
        if !row_eq(previous, py, current, cy) {
            return false;
        }
    }
    true
}

fn row_eq(a: &ScreenBuffer, ay: u32, b: &ScreenBuffer, by: u32) -> bool {
    a.row_cells(ay as i32).eq(b.row_cells(by as i32))
}

/// Rebuilds `previous` as the terminal would actually look after a scroll
/// of `shift` rows: row `y` becomes whatever was at row `y + shift` before,
/// and rows with no source (scrolled off, or newly exposed) come back
/// empty. Diffing `current` against this reflects only the genuinely new
/// content, instead of repainting every cell the scroll already moved into
/// place.
fn shifted_copy(previous: &ScreenBuffer, shift: i32) -> ScreenBuffer {
    let width = previous.width();
    let height = previous.height();
    let mut out = ScreenBuffer::with_width_method(width, height, Arc::clone(previous.width_method()));
    for y in 0..height as i32 {
        let src_y = y + shift;
        if src_y < 0 || src_y as u32 >= height {
            continue;
        }
        for (x, cell) in previous.row_cells(src_y).enumerate() {
            if !cell.is_continuation() {
                out.set_cell(x as i32, y, cell.clone());
            }
        }
    }
    out
}

fn emit_scroll(buf: &mut Vec<u8>, shift: i32, height: u32) {
    buf.extend_from_slice(&ansi::set_scroll_region(0, height.saturating_sub(1)));
    if shift > 0 {
        buf.extend_from_slice(&ansi::scroll_up(shift as u32));
    } else {
        buf.extend_from_slice(&ansi::scroll_down((-shift) as u32));
    }
}

fn emit_full_row_diff(
    previous: &ScreenBuffer,
    current: &ScreenBuffer,
    buf: &mut Vec<u8>,
    cursor: &mut Option<Point>,
    style: &mut Style,
    link: &mut Option<Link>,
) {
    emit_row_diff(previous, current, buf, cursor, style, link);
}

fn emit_row_diff(
    previous: &ScreenBuffer,
    current: &ScreenBuffer,
    buf: &mut Vec<u8>,
    cursor: &mut Option<Point>,
    style: &mut Style,
    link: &mut Option<Link>,
) {
    let width = current.width();
    let height = current.height();
    for y in 0..height {
        let prev_row: Vec<Cell> = previous.row_cells(y as i32).cloned().collect();
        let cur_row: Vec<Cell> = current.row_cells(y as i32).cloned().collect();
        let changed: Vec<bool> = prev_row
            .iter()
            .zip(cur_row.iter())
            .map(|(p, c)| p != c)
            .collect();
        for (start, end) in row_changed_runs(width, &changed) {
            move_cursor(buf, cursor, Point::new(start as i32, y as i32));
            let mut x = start;
            while x < end {
                let cell = &cur_row[x as usize];
                if cell.is_continuation() {
                    x += 1;
                    continue;
                }
                emit_style_delta(buf, style, &cell.style);
                *style = cell.style;
                emit_link_delta(buf, link, &cell.link);
                *link = cell.link.clone();
                buf.extend_from_slice(cell.grapheme().as_bytes());
                x += cell.width() as u32;
            }
            *cursor = Some(Point::new(end as i32, y as i32));
        }
    }
}

/// Builds contiguous emission runs from a per-column changed mask,
/// bridging gaps of at most three unchanged cells (rule 2: only jump the
/// cursor when a changed run is more than three cells past the last
/// emitted position).
fn row_changed_runs(width: u32, changed: &[bool]) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut x = 0u32;
    while x < width {
        if !changed[x as usize] {
            x += 1;
            continue;
        }
        let start = x;
        let mut end = x + 1;
        loop {
            let mut probe = end;
            while probe < width && !changed[probe as usize] {
                probe += 1;
            }
            if probe >= width || probe - end > 3 {
                break;
            }
            end = probe + 1;
        }
        runs.push((start, end));
        x = end;
    }
    runs
}

fn move_cursor(buf: &mut Vec<u8>, cursor: &mut Option<Point>, target: Point) {
    if let Some(cur) = *cursor {
        if cur.x == target.x && cur.y == target.y {
            return;
        }
        if cur.y == target.y {
            let from_x = cur.x.max(0) as u32;
            let to_x = target.x.max(0) as u32;
            let cup_bytes = ansi::cup(target.y as u32, target.x as u32);
            let cha_bytes = ansi::cha(target.x as u32);
            if to_x >= from_x {
                let cuf_bytes = ansi::cuf(to_x - from_x);
                let costs = [
                    (cost_model::cup_cost(target.y as u32, target.x as u32), &cup_bytes),
                    (cost_model::cha_cost(target.x as u32), &cha_bytes),
                    (cost_model::cuf_cost(to_x - from_x), &cuf_bytes),
                ];
                let cheapest = costs.iter().min_by_key(|(cost, _)| *cost).unwrap();
                buf.extend_from_slice(cheapest.1);
            } else {
                let cheapest = if cost_model::cha_cost(target.x as u32)
                    < cost_model::cup_cost(target.y as u32, target.x as u32)
                {
                    &cha_bytes
                } else {
                    &cup_bytes
                };
                buf.extend_from_slice(cheapest);
            }
            *cursor = Some(target);
            return;
        }
    }
    buf.extend_from_slice(&ansi::cup(target.y.max(0) as u32, target.x.max(0) as u32));
    *cursor = Some(target);
}

fn emit_style_delta(buf: &mut Vec<u8>, from: &Style, to: &Style) {
    if from == to {
        return;
    }
    let off = from.attrs - to.attrs;
    let on = to.attrs - from.attrs;
    if !off.is_empty() {
        ansi::sgr_unset_flags(buf, off).expect("write to Vec<u8> never fails");
    }
    if !on.is_empty() {
        ansi::sgr_set_flags(buf, on).expect("write to Vec<u8> never fails");
    }
    if from.fg != to.fg {
        match to.fg {
            Some(c) => ansi::sgr_fg_color(buf, c).expect("write to Vec<u8> never fails"),
            None => buf.extend_from_slice(b"\x1b[39m"),
        }
    }
    if from.bg != to.bg {
        match to.bg {
            Some(c) => ansi::sgr_bg_color(buf, c).expect("write to Vec<u8> never fails"),
            None => buf.extend_from_slice(b"\x1b[49m"),
        }
    }
    if from.underline != to.underline {
        ansi::sgr_underline_style(buf, to.underline).expect("write to Vec<u8> never fails");
    }
    if from.underline_color != to.underline_color {
        match to.underline_color {
            Some(c) => ansi::sgr_underline_color(buf, c).expect("write to Vec<u8> never fails"),
            None => buf.extend_from_slice(b"\x1b[59m"),
        }
    }
}

fn emit_link_delta(buf: &mut Vec<u8>, from: &Option<Link>, to: &Option<Link>) {
    if from == to {
        return;
    }
    match to {
        Some(link) => buf.extend_from_slice(&ansi::hyperlink_open(&link.url, &link.params)),
        None => buf.extend_from_slice(&ansi::hyperlink_close()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termgrid_style::Attributes;

    fn narrow(g: &'static str) -> Cell {
        Cell::new(g, 1, Style::default(), None)
    }

    #[test]
    fn identical_buffers_emit_no_cell_bytes() {
        let mut r = DiffRenderer::new(4, 2);
        let empty = ScreenBuffer::new(4, 2);
        let mut out = Vec::new();
        r.commit(&empty, &mut out).unwrap();
        // First commit against a matching blank `previous` is a no-op.
        assert!(out.is_empty());
    }

    #[test]
    fn second_identical_commit_emits_nothing() {
        let mut r = DiffRenderer::new(4, 2);
        let mut b = ScreenBuffer::new(4, 2);
        b.set_cell(0, 0, narrow("x"));
        let mut out = Vec::new();
        r.commit(&b, &mut out).unwrap();
        assert!(!out.is_empty());
        out.clear();
        r.commit(&b, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn changed_cell_emits_its_grapheme() {
        let mut r = DiffRenderer::new(3, 1);
        let mut b = ScreenBuffer::new(3, 1);
        b.set_cell(1, 0, narrow("q"));
        let mut out = Vec::new();
        r.commit(&b, &mut out).unwrap();
        assert!(out.windows(1).any(|w| w == b"q"));
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut r = DiffRenderer::new(2, 2);
        let mut out = Vec::new();
        let empty = ScreenBuffer::new(2, 2);
        r.commit(&empty, &mut out).unwrap();
        out.clear();
        let bigger = ScreenBuffer::new(4, 4);
        r.commit(&bigger, &mut out).unwrap();
        // All-empty content still produces no emittable cell diffs (every
        // cell is the empty cell in both the blank virtual previous and
        // `bigger`), but the renderer must not error and must adopt the
        // new dimensions for the next diff.
        let mut b = ScreenBuffer::new(4, 4);
        b.set_cell(3, 3, narrow("z"));
        out.clear();
        r.commit(&b, &mut out).unwrap();
        assert!(out.windows(1).any(|w| w == b"z"));
    }

    #[test]
    fn continuation_placeholder_is_never_emitted() {
        let mut r = DiffRenderer::new(3, 1);
        let mut b = ScreenBuffer::new(3, 1);
        b.set_cell(0, 0, Cell::new("\u{4e2d}", 2, Style::default(), None));
        let mut out = Vec::new();
        r.commit(&b, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches('\u{4e2d}').count(), 1);
    }

    #[test]
    fn style_delta_only_touches_differing_attribute() {
        let mut from = Style::default().with_attrs(Attributes::BOLD | Attributes::ITALIC);
        let to = Style::default().with_attrs(Attributes::ITALIC);
        let mut buf = Vec::new();
        emit_style_delta(&mut buf, &from, &to);
        // Bold turns off (22), italic stays on (no byte for it).
        assert_eq!(buf, b"\x1b[22m");
        from = to;
        buf.clear();
        emit_style_delta(&mut buf, &from, &to);
        assert!(buf.is_empty());
    }

    fn row_buffer(rows: &[&str]) -> ScreenBuffer {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut b = ScreenBuffer::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                b.set_cell(x as i32, y as i32, Cell::new(&ch.to_string(), 1, Style::default(), None));
            }
        }
        b
    }

    #[test]
    fn scroll_shift_only_repaints_genuinely_new_rows() {
        let mut r = DiffRenderer::new(3, 3);
        let mut out = Vec::new();
        r.commit(&row_buffer(&["aaa", "bbb", "ccc"]), &mut out).unwrap();

        out.clear();
        r.commit(&row_buffer(&["bbb", "ccc", "ddd"]), &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);

        // the scroll-up command is emitted...
        assert!(text.contains('S'));
        // ...and only the row the scroll didn't already move into place is
        // repainted; "bbb"/"ccc" came along for free with the scroll.
        assert_eq!(text.matches('d').count(), 3);
        assert_eq!(text.matches('b').count(), 0);
        assert_eq!(text.matches('c').count(), 0);
    }

    #[test]
    fn write_error_does_not_promote_previous() {
        struct Failing;
        impl Write for Failing {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("boom"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut r = DiffRenderer::new(2, 1);
        let mut b = ScreenBuffer::new(2, 1);
        b.set_cell(0, 0, narrow("q"));
        let mut sink = Failing;
        assert!(r.commit(&b, &mut sink).is_err());
        // previous is still the original blank buffer.
        assert!(r.previous.content_eq(&ScreenBuffer::new(2, 1)));
    }
}
