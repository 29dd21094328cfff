//! Parses a string that may carry ANSI SGR and OSC 8 hyperlink sequences
//! into a `ScreenBuffer`, one grapheme per cell.

use std::sync::Arc;

use termgrid_core::{graphemes, Rect, WidthMethod, Wcwidth};
use termgrid_render::{Cell, ScreenBuffer};
use termgrid_style::{Color, Link, NamedColor, Rgb, Style, UnderlineStyle};

/// `{ buffer }` — the parsed grid plus its reported dimensions.
#[derive(Debug, Clone)]
pub struct StyledString {
    buffer: ScreenBuffer,
}

struct Run {
    grapheme: String,
    width: u8,
    style: Style,
    link: Option<Link>,
}

impl StyledString {
    /// Parses `text` using the legacy wcwidth measurement.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_with_width_method(text, Arc::new(Wcwidth))
    }

    /// Parses `text`, measuring grapheme widths with `width_method`.
    #[must_use]
    pub fn parse_with_width_method(text: &str, width_method: Arc<dyn WidthMethod>) -> Self {
        let rows = parse_runs(text, width_method.as_ref());
        let height = rows.len() as u32;
        let width = rows
            .iter()
            .map(|row| row.iter().map(|r| r.width as u32).sum())
            .max()
            .unwrap_or(0);

        let mut buffer = ScreenBuffer::with_width_method(width, height, width_method);
        for (y, row) in rows.iter().enumerate() {
            let mut x: i32 = 0;
            for run in row {
                buffer.set_cell(x, y as i32, Cell::new(&run.grapheme, run.width, run.style, run.link.clone()));
                x += run.width as i32;
            }
        }
        Self { buffer }
    }

    /// Width in cells of the widest line.
    #[must_use]
    pub fn unicode_width(&self) -> u32 {
        self.buffer.width()
    }

    /// Number of lines: one more than the newlines encountered while
    /// parsing.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    #[must_use]
    pub fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    /// Blits the parsed grid onto `target` within `area`, clipping both
    /// extents; continuation placeholders are skipped since `set_cell`
    /// regenerates them from the preceding wide cell.
    pub fn draw(&self, target: &mut ScreenBuffer, area: Rect) {
        let dst_w = area.width();
        let dst_h = area.height();
        for y in 0..self.buffer.height().min(dst_h) {
            for x in 0..self.buffer.width().min(dst_w) {
                let Some(cell) = self.buffer.cell_at(x as i32, y as i32) else {
                    continue;
                };
                if cell.is_continuation() {
                    continue;
                }
                target.set_cell(area.min.x + x as i32, area.min.y + y as i32, cell.clone());
            }
        }
    }
}

fn parse_runs(text: &str, width_method: &dyn WidthMethod) -> Vec<Vec<Run>> {
    let mut rows: Vec<Vec<Run>> = vec![Vec::new()];
    let mut style = Style::ZERO;
    let mut link: Option<Link> = None;
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after_esc) = rest.strip_prefix('\x1b') {
            if let Some(after_csi) = after_esc.strip_prefix('[') {
                if let Some(end) = after_csi.find('m') {
                    apply_sgr(&after_csi[..end], &mut style);
                    rest = &after_csi[end + 1..];
                    continue;
                }
                rest = after_esc;
                continue;
            }
            if let Some(after_osc) = after_esc.strip_prefix(']') {
                if let Some(params_and_url) = after_osc.strip_prefix("8;") {
                    let (body, remainder) = split_osc_terminator(params_and_url);
                    let mut parts = body.splitn(2, ';');
                    let params = parts.next().unwrap_or("");
                    let url = parts.next().unwrap_or("");
                    link = if url.is_empty() {
                        None
                    } else {
                        Some(Link::new(url.to_string()).with_params(params.to_string()))
                    };
                    rest = remainder;
                    continue;
                }
            }
            rest = after_esc;
            continue;
        }

        let next_esc = rest.find('\x1b').unwrap_or(rest.len());
        let run = &rest[..next_esc];
        for g in graphemes(run) {
            match g {
                "\n" => rows.push(Vec::new()),
                "\r" => {}
                _ => {
                    let w = width_method.grapheme_width(g);
                    if w == 0 {
                        continue;
                    }
                    rows.last_mut().unwrap().push(Run {
                        grapheme: g.to_string(),
                        width: w,
                        style,
                        link: link.clone(),
                    });
                }
            }
        }
        rest = &rest[next_esc..];
    }
    rows
}

/// Splits at the first OSC terminator (`BEL` or `ESC \`), returning the
/// body before it and the remainder after it. If no terminator is found,
/// the whole remainder is treated as the body and parsing stops.
fn split_osc_terminator(s: &str) -> (&str, &str) {
    if let Some(pos) = s.find('\x07') {
        (&s[..pos], &s[pos + 1..])
    } else if let Some(pos) = s.find("\x1b\\") {
        (&s[..pos], &s[pos + 2..])
    } else {
        (s, "")
    }
}

fn apply_sgr(params: &str, style: &mut Style) {
    let codes: Vec<&str> = params.split(';').collect();
    let mut i = 0;
    while i < codes.len() {
        let Ok(code) = codes[i].parse::<u16>() else {
            i += 1;
            continue;
        };
        match code {
            0 => *style = Style::ZERO,
            1 => style.attrs.insert(termgrid_style::Attributes::BOLD),
            2 => style.attrs.insert(termgrid_style::Attributes::FAINT),
            3 => style.attrs.insert(termgrid_style::Attributes::ITALIC),
            4 => style.underline = UnderlineStyle::Single,
            5 => style.attrs.insert(termgrid_style::Attributes::BLINK),
            7 => style.attrs.insert(termgrid_style::Attributes::REVERSE),
            8 => style.attrs.insert(termgrid_style::Attributes::CONCEAL),
            9 => style.attrs.insert(termgrid_style::Attributes::STRIKETHROUGH),
            22 => {
                style.attrs.remove(termgrid_style::Attributes::BOLD);
                style.attrs.remove(termgrid_style::Attributes::FAINT);
            }
            23 => style.attrs.remove(termgrid_style::Attributes::ITALIC),
            24 => style.underline = UnderlineStyle::None,
            25 => style.attrs.remove(termgrid_style::Attributes::BLINK),
            27 => style.attrs.remove(termgrid_style::Attributes::REVERSE),
            28 => style.attrs.remove(termgrid_style::Attributes::CONCEAL),
            29 => style.attrs.remove(termgrid_style::Attributes::STRIKETHROUGH),
            30..=37 => style.fg = Some(Color::Named(named_from_index(code - 30))),
            38 => {
                i = consume_extended_color(&codes, i, |c| style.fg = Some(c));
                continue;
            }
            39 => style.fg = None,
            40..=47 => style.bg = Some(Color::Named(named_from_index(code - 40))),
            48 => {
                i = consume_extended_color(&codes, i, |c| style.bg = Some(c));
                continue;
            }
            49 => style.bg = None,
            58 => {
                i = consume_extended_color(&codes, i, |c| style.underline_color = Some(c));
                continue;
            }
            59 => style.underline_color = None,
            90..=97 => style.fg = Some(Color::Named(named_from_index(8 + code - 90))),
            100..=107 => style.bg = Some(Color::Named(named_from_index(8 + code - 100))),
            _ => {}
        }
        i += 1;
    }
}

/// Consumes a `38`/`48`/`58`-style extended color sub-sequence starting at
/// `codes[i]` (the `38` itself), returning the index just past it.
fn consume_extended_color(codes: &[&str], i: usize, mut set: impl FnMut(Color)) -> usize {
    match codes.get(i + 1) {
        Some(&"5") => {
            if let Some(n) = codes.get(i + 2).and_then(|s| s.parse::<u8>().ok()) {
                set(Color::Indexed(n));
            }
            i + 3
        }
        Some(&"2") => {
            let r = codes.get(i + 2).and_then(|s| s.parse::<u8>().ok()).unwrap_or(0);
            let g = codes.get(i + 3).and_then(|s| s.parse::<u8>().ok()).unwrap_or(0);
            let b = codes.get(i + 4).and_then(|s| s.parse::<u8>().ok()).unwrap_or(0);
            set(Color::Rgb(Rgb::new(r, g, b)));
            i + 5
        }
        _ => i + 1,
    }
}

fn named_from_index(idx: u16) -> NamedColor {
    match idx {
        0 => NamedColor::Black,
        1 => NamedColor::Red,
        2 => NamedColor::Green,
        3 => NamedColor::Yellow,
        4 => NamedColor::Blue,
        5 => NamedColor::Magenta,
        6 => NamedColor::Cyan,
        7 => NamedColor::White,
        8 => NamedColor::BrightBlack,
        9 => NamedColor::BrightRed,
        10 => NamedColor::BrightGreen,
        11 => NamedColor::BrightYellow,
        12 => NamedColor::BrightBlue,
        13 => NamedColor::BrightMagenta,
        14 => NamedColor::BrightCyan,
        _ => NamedColor::BrightWhite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_reports_width_and_height() {
        let s = StyledString::parse("hello");
        assert_eq!(s.unicode_width(), 5);
        assert_eq!(s.height(), 1);
    }

    #[test]
    fn newline_increments_height() {
        let s = StyledString::parse("line one\nline two");
        assert_eq!(s.height(), 2);
        assert_eq!(s.unicode_width(), 8);
    }

    #[test]
    fn wide_graphemes_count_twice() {
        let s = StyledString::parse("\u{4e2d}\u{6587}");
        assert_eq!(s.unicode_width(), 4);
    }

    #[test]
    fn sgr_sequence_is_not_drawn() {
        let s = StyledString::parse("\x1b[1mhi\x1b[0m");
        assert_eq!(s.unicode_width(), 2);
        let cell = s.buffer().cell_at(0, 0).unwrap();
        assert!(cell.style.attrs.contains(termgrid_style::Attributes::BOLD));
    }

    #[test]
    fn bold_sgr_applies_to_following_text() {
        let s = StyledString::parse("\x1b[1mhi");
        let cell = s.buffer().cell_at(1, 0).unwrap();
        assert!(cell.style.attrs.contains(termgrid_style::Attributes::BOLD));
    }

    #[test]
    fn reset_code_clears_style() {
        let s = StyledString::parse("\x1b[1mhi\x1b[0mbye");
        let cell = s.buffer().cell_at(2, 0).unwrap();
        assert!(cell.style.is_zero());
    }

    #[test]
    fn indexed_fg_color_is_parsed() {
        let s = StyledString::parse("\x1b[38;5;200mx");
        let cell = s.buffer().cell_at(0, 0).unwrap();
        assert_eq!(cell.style.fg, Some(Color::Indexed(200)));
    }

    #[test]
    fn rgb_bg_color_is_parsed() {
        let s = StyledString::parse("\x1b[48;2;10;20;30mx");
        let cell = s.buffer().cell_at(0, 0).unwrap();
        assert_eq!(cell.style.bg, Some(Color::Rgb(Rgb::new(10, 20, 30))));
    }

    #[test]
    fn hyperlink_sets_link_on_subsequent_cells() {
        let s = StyledString::parse("\x1b]8;;https://example.com\x1b\\click\x1b]8;;\x1b\\");
        let cell = s.buffer().cell_at(0, 0).unwrap();
        assert_eq!(cell.link.as_ref().unwrap().url, "https://example.com");
    }

    #[test]
    fn hyperlink_closes_with_empty_url() {
        let s = StyledString::parse("\x1b]8;;https://example.com\x1b\\a\x1b]8;;\x1b\\b");
        let after_close = s.buffer().cell_at(1, 0).unwrap();
        assert!(after_close.link.is_none());
    }

    #[test]
    fn draw_clips_to_area() {
        let s = StyledString::parse("hello world");
        let mut target = ScreenBuffer::new(5, 1);
        s.draw(&mut target, Rect::from_size(0, 0, 5, 1));
        assert_eq!(target.cell_at(0, 0).unwrap().grapheme(), "h");
        assert_eq!(target.cell_at(4, 0).unwrap().grapheme(), "o");
    }
}
