//! Per-cell visual style: colors, attributes, and underline decoration.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Boolean display attributes. Stored as a bitset so a style's
    /// "zero-ness" check and attribute-delta emission (see
    /// `termgrid-render::diff`) are both plain bitwise ops.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u8 {
        const BOLD          = 0b0000_0001;
        const FAINT         = 0b0000_0010;
        const ITALIC        = 0b0000_0100;
        const BLINK         = 0b0000_1000;
        const REVERSE       = 0b0001_0000;
        const CONCEAL       = 0b0010_0000;
        const STRIKETHROUGH = 0b0100_0000;
    }
}

/// The decoration style of an underline, independent of whether one is
/// present at all (`UnderlineStyle::None` means absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnderlineStyle {
    #[default]
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

/// The aggregate visual style of a cell. `Style::default()` is the *zero*
/// style: no colors, no attributes, no underline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attrs: Attributes,
    pub underline: UnderlineStyle,
    pub underline_color: Option<Color>,
}

impl Style {
    /// The zero style: equivalent to `Style::default()`, spelled out for
    /// call sites that want to be explicit about the comparison they mean.
    pub const ZERO: Style = Style {
        fg: None,
        bg: None,
        attrs: Attributes::empty(),
        underline: UnderlineStyle::None,
        underline_color: None,
    };

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[must_use]
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs |= attrs;
        self
    }

    #[must_use]
    pub fn with_underline(mut self, style: UnderlineStyle) -> Self {
        self.underline = style;
        self
    }
}
