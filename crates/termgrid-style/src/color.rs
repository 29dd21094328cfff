//! Abstract color representation.
//!
//! `Color` stays a plain data type: the core never probes terminal
//! capabilities or negotiates a color profile — that's an external
//! collaborator's job (spec §1, Out of scope). Downscaling from RGBA to a
//! narrower palette, if a renderer needs it, is likewise out of scope here.

/// A terminal color: a named ANSI color, an 8-bit indexed palette entry, or
/// 24-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Named(NamedColor),
    Indexed(u8),
    Rgb(Rgb),
}

/// The eight standard ANSI colors plus their bright variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceptual luminance using the BT.709 luma coefficients.
    #[must_use]
    pub fn luminance_u8(&self) -> u8 {
        let l = 2126 * self.r as u32 + 7152 * self.g as u32 + 722 * self.b as u32;
        ((l + 5000) / 10000) as u8
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_has_max_luminance() {
        assert_eq!(Rgb::new(255, 255, 255).luminance_u8(), 255);
    }

    #[test]
    fn black_has_zero_luminance() {
        assert_eq!(Rgb::new(0, 0, 0).luminance_u8(), 0);
    }

    #[test]
    fn green_dominates_luma_over_blue() {
        assert!(Rgb::new(0, 255, 0).luminance_u8() > Rgb::new(0, 0, 255).luminance_u8());
    }
}
