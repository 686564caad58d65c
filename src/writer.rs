//! Low-level text output for the emitter.
//!
//! [`Writer`] is an in-memory buffer that tracks the current column so the
//! emitter can indent block content. The free functions decide how scalars
//! are spelled: whether a string can stay plain, how it is quoted and
//! escaped, and how numbers are rendered.

use crate::options::EmitterManip;
use base64::Engine;
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub(crate) struct Writer {
    output: String,
    column: usize,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            output: String::with_capacity(256),
            column: 0,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.output
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.output.len()
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    pub fn write(&mut self, text: &str) {
        match text.rfind('\n') {
            Some(pos) => self.column = text[pos + 1..].chars().count(),
            None => self.column += text.chars().count(),
        }
        self.output.push_str(text);
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.column = 0;
    }

    /// Starts a new line unless the cursor is already at the start of one.
    pub fn ensure_line_start(&mut self) {
        if self.column > 0 {
            self.newline();
        }
    }

    /// Writes one space unless the cursor is at line start or after a space.
    pub fn ensure_space(&mut self) {
        if self.column > 0 && !self.output.ends_with(' ') {
            self.write(" ");
        }
    }

    pub fn indent_to(&mut self, column: usize) {
        while self.column < column {
            self.output.push(' ');
            self.column += 1;
        }
    }
}

/// How a string scalar is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
}

/// Picks the style for `text` given the requested format.
///
/// A requested style the text cannot be written in falls back to double
/// quotes, which can represent anything.
pub(crate) fn choose_string_style(
    text: &str,
    format: EmitterManip,
    escape_non_ascii: bool,
    flow: bool,
    key: bool,
) -> StringStyle {
    let has_non_ascii = !text.is_ascii();
    match format {
        EmitterManip::SingleQuoted => {
            if text.chars().any(char::is_control) || (escape_non_ascii && has_non_ascii) {
                StringStyle::DoubleQuoted
            } else {
                StringStyle::SingleQuoted
            }
        }
        EmitterManip::DoubleQuoted => StringStyle::DoubleQuoted,
        EmitterManip::Literal => {
            let representable = !flow
                && !key
                && !(escape_non_ascii && has_non_ascii)
                && !text.ends_with("\n\n")
                && !text.starts_with(' ')
                && !text
                    .chars()
                    .any(|c| c.is_control() && c != '\n');
            if representable {
                StringStyle::Literal
            } else {
                StringStyle::DoubleQuoted
            }
        }
        _ => {
            if is_valid_plain_scalar(text, flow, escape_non_ascii) {
                StringStyle::Plain
            } else {
                StringStyle::DoubleQuoted
            }
        }
    }
}

/// Whether `text` reads back as the same string when written unquoted.
pub(crate) fn is_valid_plain_scalar(text: &str, flow: bool, escape_non_ascii: bool) -> bool {
    if text.is_empty() || crate::convert::is_null_literal(text) {
        return false;
    }
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        return false;
    }
    if text.starts_with("---") || text.starts_with("...") {
        return false;
    }

    let mut chars = text.chars();
    match chars.next() {
        Some(
            '[' | ']' | '{' | '}' | ',' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%'
            | '@' | '`',
        ) => return false,
        // Indicators that are plain only when glued to the next character.
        Some('-' | '?' | ':') => match chars.next() {
            Some(next) if !next.is_whitespace() => {}
            _ => return false,
        },
        _ => {}
    }

    let bad_char = text.chars().any(|c| {
        c.is_control()
            || c == '\u{feff}'
            || (escape_non_ascii && !c.is_ascii())
            || (flow && matches!(c, ',' | '[' | ']' | '{' | '}'))
    });
    if bad_char {
        return false;
    }

    !(text.contains(": ") || text.contains(" #") || text.ends_with(':'))
}

pub(crate) fn single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        if ch == '\'' {
            out.push_str("''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

pub(crate) fn double_quoted(text: &str, escape_non_ascii: bool) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\0' => out.push_str("\\0"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if c.is_control() || c == '\u{feff}' || (escape_non_ascii && !c.is_ascii()) => {
                if (c as u32) <= 0xFFFF {
                    let _ = write!(out, "\\u{:04X}", c as u32);
                } else {
                    let _ = write!(out, "\\U{:08X}", c as u32);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Writes the body of a literal block scalar. The header (`|` or `|-`) is
/// already on the current line.
pub(crate) fn write_literal_body(writer: &mut Writer, text: &str, indent: usize) {
    let body = text.strip_suffix('\n').unwrap_or(text);
    for line in body.split('\n') {
        writer.newline();
        if !line.is_empty() {
            writer.indent_to(indent);
            writer.write(line);
        }
    }
}

pub(crate) fn literal_header(text: &str) -> &'static str {
    if text.ends_with('\n') {
        "|"
    } else {
        "|-"
    }
}

pub(crate) fn format_int(value: i128, base: EmitterManip) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    match base {
        EmitterManip::Hex => format!("{}0x{:x}", sign, magnitude),
        EmitterManip::Oct => format!("{}0o{:o}", sign, magnitude),
        _ => value.to_string(),
    }
}

/// Renders `value` with `precision` significant digits, choosing between
/// fixed and exponent notation the way `%g` does.
pub(crate) fn format_float(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return ".nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { ".inf" } else { "-.inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

pub(crate) fn encode_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

fn is_flow_indicator(c: char) -> bool {
    matches!(c, ',' | '[' | ']' | '{' | '}')
}

/// Anchor and alias names: non-empty, no whitespace, no flow indicators.
pub(crate) fn is_valid_anchor_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || is_flow_indicator(c))
}

pub(crate) fn is_valid_tag_content(content: &str, verbatim: bool) -> bool {
    if verbatim {
        return !content.is_empty()
            && !content
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || c == '>');
    }
    !content
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || is_flow_indicator(c))
}
