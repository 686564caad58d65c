//! Emitter manipulators and global emitter configuration.
//!
//! - [`EmitterManip`]: every token an [`Emitter`](crate::Emitter) accepts,
//!   both structural (`BeginSeq`, `Key`, ...) and formatting (`Flow`, `Hex`,
//!   ...).
//! - [`EmitterOptions`]: the global defaults an emitter starts with.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_node::{Emitter, EmitterManip, EmitterOptions};
//!
//! let options = EmitterOptions::new()
//!     .with_bool_format(EmitterManip::YesNoBool)
//!     .with_bool_case(EmitterManip::UpperCase);
//!
//! let mut out = Emitter::with_options(options);
//! out.emit(true);
//! assert_eq!(out.as_str(), "YES");
//! ```

/// A manipulator token.
///
/// Structural tokens open and close groups or documents. Every other token
/// selects a value on one formatting axis; passed to
/// [`Emitter::emit`](crate::Emitter::emit) it applies to the next emitted
/// value only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmitterManip {
    // general
    Auto,
    TagByKind,
    Newline,

    // output character set
    EmitNonAscii,
    EscapeNonAscii,

    // string style
    SingleQuoted,
    DoubleQuoted,
    Literal,

    // bool spelling
    YesNoBool,
    TrueFalseBool,
    OnOffBool,

    // bool case
    UpperCase,
    LowerCase,
    CamelCase,

    // bool length
    LongBool,
    ShortBool,

    // int base
    Dec,
    Hex,
    Oct,

    // document
    BeginDoc,
    EndDoc,

    // sequence
    BeginSeq,
    EndSeq,
    Flow,
    Block,

    // map
    BeginMap,
    EndMap,
    Key,
    Value,
    LongKey,
}

impl EmitterManip {
    /// Returns `true` for tokens that drive structure rather than formatting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_node::EmitterManip;
    ///
    /// assert!(EmitterManip::BeginSeq.is_structural());
    /// assert!(!EmitterManip::Flow.is_structural());
    /// ```
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            EmitterManip::BeginDoc
                | EmitterManip::EndDoc
                | EmitterManip::BeginSeq
                | EmitterManip::EndSeq
                | EmitterManip::BeginMap
                | EmitterManip::EndMap
                | EmitterManip::Key
                | EmitterManip::Value
                | EmitterManip::TagByKind
                | EmitterManip::Newline
        )
    }
}

/// Global configuration for an [`Emitter`](crate::Emitter).
///
/// Every field is one formatting axis. The emitter validates the values when
/// it applies them: a value that does not belong to its axis, or a number out
/// of range, leaves the emitter's default in place.
///
/// # Examples
///
/// ```rust
/// use yaml_node::{EmitterManip, EmitterOptions};
///
/// let options = EmitterOptions::new();
/// assert_eq!(options.indent, 2);
/// assert_eq!(options.seq_format, EmitterManip::Block);
///
/// let options = EmitterOptions::flow().with_indent(4);
/// assert_eq!(options.map_format, EmitterManip::Flow);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterOptions {
    pub charset: EmitterManip,
    pub string_format: EmitterManip,
    pub bool_format: EmitterManip,
    pub bool_case: EmitterManip,
    pub bool_length: EmitterManip,
    pub int_base: EmitterManip,
    pub seq_format: EmitterManip,
    pub map_format: EmitterManip,
    pub map_key_format: EmitterManip,
    pub indent: usize,
    pub pre_comment_indent: usize,
    pub post_comment_indent: usize,
    pub float_precision: usize,
    pub double_precision: usize,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        EmitterOptions {
            charset: EmitterManip::EmitNonAscii,
            string_format: EmitterManip::Auto,
            bool_format: EmitterManip::TrueFalseBool,
            bool_case: EmitterManip::LowerCase,
            bool_length: EmitterManip::LongBool,
            int_base: EmitterManip::Dec,
            seq_format: EmitterManip::Block,
            map_format: EmitterManip::Block,
            map_key_format: EmitterManip::Auto,
            indent: 2,
            pre_comment_indent: 2,
            post_comment_indent: 1,
            float_precision: 6,
            double_precision: 15,
        }
    }
}

impl EmitterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that render every sequence and map in flow style.
    #[must_use]
    pub fn flow() -> Self {
        EmitterOptions {
            seq_format: EmitterManip::Flow,
            map_format: EmitterManip::Flow,
            ..Default::default()
        }
    }

    /// `EmitNonAscii` or `EscapeNonAscii`.
    #[must_use]
    pub fn with_charset(mut self, charset: EmitterManip) -> Self {
        self.charset = charset;
        self
    }

    /// `Auto`, `SingleQuoted`, `DoubleQuoted` or `Literal`.
    #[must_use]
    pub fn with_string_format(mut self, format: EmitterManip) -> Self {
        self.string_format = format;
        self
    }

    #[must_use]
    pub fn with_bool_format(mut self, format: EmitterManip) -> Self {
        self.bool_format = format;
        self
    }

    #[must_use]
    pub fn with_bool_case(mut self, case: EmitterManip) -> Self {
        self.bool_case = case;
        self
    }

    #[must_use]
    pub fn with_bool_length(mut self, length: EmitterManip) -> Self {
        self.bool_length = length;
        self
    }

    /// `Dec`, `Hex` or `Oct`.
    #[must_use]
    pub fn with_int_base(mut self, base: EmitterManip) -> Self {
        self.int_base = base;
        self
    }

    #[must_use]
    pub fn with_seq_format(mut self, format: EmitterManip) -> Self {
        self.seq_format = format;
        self
    }

    #[must_use]
    pub fn with_map_format(mut self, format: EmitterManip) -> Self {
        self.map_format = format;
        self
    }

    /// `Auto` or `LongKey`.
    #[must_use]
    pub fn with_map_key_format(mut self, format: EmitterManip) -> Self {
        self.map_key_format = format;
        self
    }

    /// Sets the number of columns each nested block level is indented by.
    ///
    /// Accepted range is 2 to 9.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_pre_comment_indent(mut self, indent: usize) -> Self {
        self.pre_comment_indent = indent;
        self
    }

    #[must_use]
    pub fn with_post_comment_indent(mut self, indent: usize) -> Self {
        self.post_comment_indent = indent;
        self
    }

    /// Significant digits for `f32` values, at most 9.
    #[must_use]
    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision;
        self
    }

    /// Significant digits for `f64` values, at most 17.
    #[must_use]
    pub fn with_double_precision(mut self, precision: usize) -> Self {
        self.double_precision = precision;
        self
    }
}
