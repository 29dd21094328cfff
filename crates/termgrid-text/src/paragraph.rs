//! Draws plain text into a `ScreenBuffer`, wrapping whole words at the
//! area's right edge (falling back to a mid-word character wrap only when a
//! single word is wider than the area) and optionally truncating with a
//! tail on the last row.

use termgrid_core::{graphemes, Point, Rect, WidthMethod};
use termgrid_render::{Cell, ScreenBuffer};
use termgrid_style::{Link, Style};

/// `{ text, style, link, truncate, tail }`.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: String,
    pub style: Style,
    pub link: Option<Link>,
    pub truncate: bool,
    pub tail: String,
}

impl Paragraph {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::ZERO,
            link: None,
            truncate: false,
            tail: String::new(),
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    #[must_use]
    pub fn truncate(mut self, tail: impl Into<String>) -> Self {
        self.truncate = true;
        self.tail = tail.into();
        self
    }

    /// Draws into `screen` within `area`.
    pub fn draw(&self, screen: &mut ScreenBuffer, area: Rect) {
        if area.is_empty() {
            return;
        }
        let width_method = screen.width_method().clone();
        let tokens = tokenize(&self.text, width_method.as_ref());

        let mut x = area.min.x;
        let mut y = area.min.y;

        for token in &tokens {
            if y >= area.max.y {
                break;
            }
            match token {
                Token::Newline => {
                    y += 1;
                    x = area.min.x;
                }
                Token::CarriageReturn => {
                    x = area.min.x;
                }
                Token::Space(g, w) => {
                    if x + i32::from(*w) > area.max.x && y + 1 < area.max.y {
                        y += 1;
                        x = area.min.x;
                        // The space that triggered the wrap is dropped, not
                        // carried to the start of the next row.
                        continue;
                    }
                    if self.should_truncate(x, *w, y, area, width_method.as_ref()) {
                        self.write_tail(screen, x, y, area, width_method.as_ref());
                        return;
                    }
                    self.place(screen, area, x, y, g, *w);
                    x += i32::from(*w);
                }
                Token::Word(glyphs) => {
                    let word_width: i32 = glyphs.iter().map(|(_, w)| i32::from(*w)).sum();
                    if x + word_width > area.max.x && x > area.min.x && y + 1 < area.max.y {
                        y += 1;
                        x = area.min.x;
                    }
                    for (g, w) in glyphs {
                        if y >= area.max.y {
                            break;
                        }
                        if x + i32::from(*w) > area.max.x && y + 1 < area.max.y {
                            y += 1;
                            x = area.min.x;
                        }
                        if self.should_truncate(x, *w, y, area, width_method.as_ref()) {
                            self.write_tail(screen, x, y, area, width_method.as_ref());
                            return;
                        }
                        self.place(screen, area, x, y, g, *w);
                        x += i32::from(*w);
                    }
                }
            }
        }
    }

    fn place(&self, screen: &mut ScreenBuffer, area: Rect, x: i32, y: i32, g: &str, w: u8) {
        if area.contains(Point::new(x, y)) {
            screen.set_cell(x, y, Cell::new(g, w, self.style, self.link.clone()));
        }
    }

    fn should_truncate(
        &self,
        x: i32,
        w: u8,
        y: i32,
        area: Rect,
        width_method: &dyn WidthMethod,
    ) -> bool {
        if !self.truncate || y != area.max.y - 1 {
            return false;
        }
        let tail_width = width_method.string_width(&self.tail) as i32;
        x + i32::from(w) + tail_width > area.max.x
    }

    fn write_tail(
        &self,
        screen: &mut ScreenBuffer,
        mut x: i32,
        y: i32,
        area: Rect,
        width_method: &dyn WidthMethod,
    ) {
        for g in graphemes(&self.tail) {
            let w = width_method.grapheme_width(g);
            if w == 0 || x >= area.max.x {
                continue;
            }
            self.place(screen, area, x, y, g, w);
            x += i32::from(w);
        }
    }
}

enum Token<'a> {
    Newline,
    CarriageReturn,
    Space(&'a str, u8),
    Word(Vec<(&'a str, u8)>),
}

fn tokenize<'a>(text: &'a str, width_method: &dyn WidthMethod) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut word: Vec<(&str, u8)> = Vec::new();
    for g in graphemes(text) {
        match g {
            "\n" => {
                flush_word(&mut word, &mut tokens);
                tokens.push(Token::Newline);
            }
            "\r" => {
                flush_word(&mut word, &mut tokens);
                tokens.push(Token::CarriageReturn);
            }
            " " => {
                flush_word(&mut word, &mut tokens);
                tokens.push(Token::Space(g, 1));
            }
            _ => {
                let w = width_method.grapheme_width(g);
                if w == 0 {
                    continue;
                }
                word.push((g, w));
            }
        }
    }
    flush_word(&mut word, &mut tokens);
    tokens
}

fn flush_word<'a>(word: &mut Vec<(&'a str, u8)>, tokens: &mut Vec<Token<'a>>) {
    if !word.is_empty() {
        tokens.push(Token::Word(std::mem::take(word)));
    }
}
