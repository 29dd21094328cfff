#![forbid(unsafe_code)]
//! Grapheme-aware text composition: parsing ANSI-styled strings into cells
//! and drawing wrapped/truncated paragraphs.

pub mod paragraph;
pub mod styled_string;
pub mod wrap;

pub use paragraph::Paragraph;
pub use styled_string::StyledString;
pub use wrap::{wrap_text, wrap_with_options, WrapMode, WrapOptions};
