//! Pure ANSI/SGR/mode byte-emitter functions.
//!
//! This module treats ANSI encoding as plain byte-slice construction, never
//! terminal-capability-aware: callers decide *what* to emit (the diff
//! renderer), this module only knows *how* to spell it out as bytes.

use std::io::{self, Write};

use termgrid_style::{Attributes, Color, NamedColor, Rgb, UnderlineStyle};

pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// The SGR on/off code pair for one boolean attribute.
#[derive(Debug, Clone, Copy)]
pub struct SgrCodes {
    pub on: u8,
    pub off: u8,
}

pub const SGR_BOLD: SgrCodes = SgrCodes { on: 1, off: 22 };
pub const SGR_FAINT: SgrCodes = SgrCodes { on: 2, off: 22 };
pub const SGR_ITALIC: SgrCodes = SgrCodes { on: 3, off: 23 };
pub const SGR_BLINK: SgrCodes = SgrCodes { on: 5, off: 25 };
pub const SGR_REVERSE: SgrCodes = SgrCodes { on: 7, off: 27 };
pub const SGR_CONCEAL: SgrCodes = SgrCodes { on: 8, off: 28 };
pub const SGR_STRIKETHROUGH: SgrCodes = SgrCodes { on: 9, off: 29 };

/// Returns the on/off code pair for one flag of `Attributes`, or `None` if
/// more than one (or zero) bits are set.
#[must_use]
pub fn sgr_codes_for_flag(flag: Attributes) -> Option<SgrCodes> {
    match flag {
        Attributes::BOLD => Some(SGR_BOLD),
        Attributes::FAINT => Some(SGR_FAINT),
        Attributes::ITALIC => Some(SGR_ITALIC),
        Attributes::BLINK => Some(SGR_BLINK),
        Attributes::REVERSE => Some(SGR_REVERSE),
        Attributes::CONCEAL => Some(SGR_CONCEAL),
        Attributes::STRIKETHROUGH => Some(SGR_STRIKETHROUGH),
        _ => None,
    }
}

/// All individually addressable attribute flags, in a stable emission
/// order.
pub const ALL_ATTRS: [Attributes; 7] = [
    Attributes::BOLD,
    Attributes::FAINT,
    Attributes::ITALIC,
    Attributes::BLINK,
    Attributes::REVERSE,
    Attributes::CONCEAL,
    Attributes::STRIKETHROUGH,
];

pub fn sgr_set_flags<W: Write>(w: &mut W, flags: Attributes) -> io::Result<()> {
    for flag in ALL_ATTRS {
        if flags.contains(flag) {
            write!(w, "\x1b[{}m", sgr_codes_for_flag(flag).unwrap().on)?;
        }
    }
    Ok(())
}

pub fn sgr_unset_flags<W: Write>(w: &mut W, flags: Attributes) -> io::Result<()> {
    for flag in ALL_ATTRS {
        if flags.contains(flag) {
            write!(w, "\x1b[{}m", sgr_codes_for_flag(flag).unwrap().off)?;
        }
    }
    Ok(())
}

pub fn sgr_fg_color<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Named(n) => write!(w, "\x1b[{}m", named_fg_code(n)),
        Color::Indexed(i) => write!(w, "\x1b[38;5;{i}m"),
        Color::Rgb(Rgb { r, g, b }) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
    }
}

pub fn sgr_bg_color<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Named(n) => write!(w, "\x1b[{}m", named_bg_code(n)),
        Color::Indexed(i) => write!(w, "\x1b[48;5;{i}m"),
        Color::Rgb(Rgb { r, g, b }) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
    }
}

pub fn sgr_underline_color<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Named(n) => write!(w, "\x1b[58;5;{}m", named_index(n)),
        Color::Indexed(i) => write!(w, "\x1b[58;5;{i}m"),
        Color::Rgb(Rgb { r, g, b }) => write!(w, "\x1b[58;2;{r};{g};{b}m"),
    }
}

pub fn sgr_underline_style<W: Write>(w: &mut W, style: UnderlineStyle) -> io::Result<()> {
    match style {
        UnderlineStyle::None => write!(w, "\x1b[24m"),
        UnderlineStyle::Single => write!(w, "\x1b[4m"),
        UnderlineStyle::Double => write!(w, "\x1b[4:2m"),
        UnderlineStyle::Curly => write!(w, "\x1b[4:3m"),
        UnderlineStyle::Dotted => write!(w, "\x1b[4:4m"),
        UnderlineStyle::Dashed => write!(w, "\x1b[4:5m"),
    }
}

pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

fn named_index(n: NamedColor) -> u8 {
    match n {
        NamedColor::Black => 0,
        NamedColor::Red => 1,
        NamedColor::Green => 2,
        NamedColor::Yellow => 3,
        NamedColor::Blue => 4,
        NamedColor::Magenta => 5,
        NamedColor::Cyan => 6,
        NamedColor::White => 7,
        NamedColor::BrightBlack => 8,
        NamedColor::BrightRed => 9,
        NamedColor::BrightGreen => 10,
        NamedColor::BrightYellow => 11,
        NamedColor::BrightBlue => 12,
        NamedColor::BrightMagenta => 13,
        NamedColor::BrightCyan => 14,
        NamedColor::BrightWhite => 15,
    }
}

fn named_fg_code(n: NamedColor) -> u16 {
    let idx = named_index(n);
    if idx < 8 {
        30 + idx as u16
    } else {
        82 + idx as u16 // 90..97
    }
}

fn named_bg_code(n: NamedColor) -> u16 {
    let idx = named_index(n);
    if idx < 8 {
        40 + idx as u16
    } else {
        92 + idx as u16 // 100..107
    }
}

// --- cursor movement ---

#[must_use]
pub fn cup(row: u32, col: u32) -> Vec<u8> {
    format!("\x1b[{};{}H", row + 1, col + 1).into_bytes()
}

#[must_use]
pub fn cha(col: u32) -> Vec<u8> {
    format!("\x1b[{}G", col + 1).into_bytes()
}

#[must_use]
pub fn cuf(n: u32) -> Vec<u8> {
    if n == 1 {
        b"\x1b[C".to_vec()
    } else {
        format!("\x1b[{n}C").into_bytes()
    }
}

// --- modes ---

pub const ENTER_ALT_SCREEN: &[u8] = b"\x1b[?1049h";
pub const EXIT_ALT_SCREEN: &[u8] = b"\x1b[?1049l";
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
pub const ERASE_DISPLAY: &[u8] = b"\x1b[2J";
pub const ERASE_LINE: &[u8] = b"\x1b[2K";

#[must_use]
pub fn hyperlink_open(url: &str, params: &str) -> Vec<u8> {
    format!("\x1b]8;{params};{url}\x1b\\").into_bytes()
}

#[must_use]
pub fn hyperlink_close() -> Vec<u8> {
    b"\x1b]8;;\x1b\\".to_vec()
}

#[must_use]
pub fn scroll_up(n: u32) -> Vec<u8> {
    format!("\x1b[{n}S").into_bytes()
}

#[must_use]
pub fn scroll_down(n: u32) -> Vec<u8> {
    format!("\x1b[{n}T").into_bytes()
}

#[must_use]
pub fn set_scroll_region(top: u32, bottom: u32) -> Vec<u8> {
    format!("\x1b[{};{}r", top + 1, bottom + 1).into_bytes()
}

/// Byte-cost comparison between absolute (CUP), column-only (CHA), and
/// relative-forward (CUF) cursor addressing, used by the diff renderer to
/// pick the cheapest sequence for a same-row move.
pub mod cost_model {
    fn digit_count(mut n: u32) -> usize {
        if n == 0 {
            return 1;
        }
        let mut count = 0;
        while n > 0 {
            count += 1;
            n /= 10;
        }
        count
    }

    /// `\x1b[{row+1};{col+1}H`
    #[must_use]
    pub fn cup_cost(row: u32, col: u32) -> usize {
        3 + digit_count(row + 1) + 1 + digit_count(col + 1) + 1
    }

    /// `\x1b[{col+1}G`
    #[must_use]
    pub fn cha_cost(col: u32) -> usize {
        2 + digit_count(col + 1) + 1
    }

    /// `\x1b[{n}C`, or the 3-byte `\x1b[C` shorthand when `n == 1`.
    #[must_use]
    pub fn cuf_cost(n: u32) -> usize {
        if n == 1 {
            3
        } else {
            2 + digit_count(n) + 1
        }
    }

    /// The cheapest way to move from `(from_x, from_y)` to `(to_x, to_y)`,
    /// in bytes. Relative motion (`cuf`) is only considered when staying on
    /// the same row and moving forward.
    #[must_use]
    pub fn cheapest_move_cost(from_x: u32, from_y: u32, to_x: u32, to_y: u32) -> usize {
        let cup = cup_cost(to_y, to_x);
        if from_y != to_y {
            return cup;
        }
        let cha = cha_cost(to_x);
        if to_x >= from_x {
            let cuf = cuf_cost(to_x - from_x);
            cup.min(cha).min(cuf)
        } else {
            cup.min(cha)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cost_model::*;

    #[test]
    fn cup_one_indexes_from_one() {
        assert_eq!(cup(0, 0), b"\x1b[1;1H");
    }

    #[test]
    fn cuf_one_uses_shorthand() {
        assert_eq!(cuf(1), b"\x1b[C");
        assert_eq!(cuf(5), b"\x1b[5C");
    }

    #[test]
    fn cha_cost_matches_byte_length() {
        assert_eq!(cha_cost(0), cha(0).len());
        assert_eq!(cha_cost(123), cha(123).len());
    }

    #[test]
    fn cup_cost_matches_byte_length() {
        assert_eq!(cup_cost(9, 41), cup(9, 41).len());
    }

    #[test]
    fn cheapest_move_prefers_cuf_for_small_forward_hop() {
        let cost = cheapest_move_cost(5, 2, 7, 2);
        assert_eq!(cost, cuf_cost(2));
    }

    #[test]
    fn cheapest_move_falls_back_to_cup_across_rows() {
        let cost = cheapest_move_cost(5, 2, 7, 3);
        assert_eq!(cost, cup_cost(3, 7));
    }

    #[test]
    fn sgr_flags_round_trip_on_then_off() {
        let mut on = Vec::new();
        sgr_set_flags(&mut on, Attributes::BOLD | Attributes::ITALIC).unwrap();
        assert_eq!(on, b"\x1b[1m\x1b[3m");
        let mut off = Vec::new();
        sgr_unset_flags(&mut off, Attributes::BOLD | Attributes::ITALIC).unwrap();
        assert_eq!(off, b"\x1b[22m\x1b[23m");
    }
}
