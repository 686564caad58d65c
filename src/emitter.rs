//! The emitter: manipulator tokens and values in, text out.
//!
//! An [`Emitter`] is driven by a sequence of [`emit`](Emitter::emit) calls.
//! Structural tokens ([`EmitterManip::BeginSeq`], [`EmitterManip::Key`], ...)
//! open and close groups. Every other manipulator changes formatting for the
//! next value only. Values are anything implementing [`Emit`].
//!
//! ```rust
//! use yaml_node::{Emitter, EmitterManip::*};
//!
//! let mut out = Emitter::new();
//! out.emit(BeginMap)
//!     .emit(Key).emit("name").emit(Value).emit("Ada")
//!     .emit(Key).emit("langs").emit(Value)
//!     .emit(Flow).emit(BeginSeq).emit("en").emit("fr").emit(EndSeq)
//!     .emit(EndMap);
//!
//! assert!(out.good());
//! assert_eq!(out.as_str(), "name: Ada\nlangs: [en, fr]");
//! ```
//!
//! ## Errors
//!
//! A call that breaks the token protocol puts the emitter in a bad state.
//! The first error is kept, and every later call does nothing:
//!
//! ```rust
//! use yaml_node::{Emitter, EmitError, EmitterManip::*};
//!
//! let mut out = Emitter::new();
//! out.emit(BeginMap).emit(1);
//! assert!(!out.good());
//! assert_eq!(out.error(), Some(&EmitError::ExpectedKey));
//!
//! let size = out.size();
//! out.emit(Key).emit("ignored");
//! assert_eq!(out.size(), size);
//! ```

use crate::convert::Null;
use crate::emitter_state::{EmitterState, FmtScope, GroupKind, MapPhase, Pending};
use crate::error::EmitError;
use crate::node::{NodeRef, NodeType};
use crate::options::{EmitterManip, EmitterOptions};
use crate::writer::{self, StringStyle, Writer};
use indexmap::IndexMap;

/// Formatting state plus the output buffer.
#[derive(Debug, Clone)]
pub struct Emitter {
    state: EmitterState,
    writer: Writer,
    properties: Properties,
}

/// Anchors and tags waiting for the node they annotate.
#[derive(Debug, Clone, Default)]
struct Properties {
    rendered: Vec<String>,
    anchor: bool,
    tag: bool,
}

impl Properties {
    fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    #[must_use]
    pub fn new() -> Self {
        Emitter {
            state: EmitterState::new(),
            writer: Writer::new(),
            properties: Properties::default(),
        }
    }

    /// Creates an emitter whose global settings come from `options`.
    ///
    /// Values that are out of range or belong to another axis are ignored.
    #[must_use]
    pub fn with_options(options: EmitterOptions) -> Self {
        let mut emitter = Self::new();
        if !emitter.state.apply_options(&options) {
            tracing::debug!(?options, "some emitter options were rejected");
        }
        emitter
    }

    /// The text emitted so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.writer.as_str()
    }

    /// Length in bytes of the text emitted so far.
    #[must_use]
    pub fn size(&self) -> usize {
        self.writer.len()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.writer.into_inner()
    }

    #[must_use]
    pub fn good(&self) -> bool {
        self.state.good()
    }

    #[must_use]
    pub fn error(&self) -> Option<&EmitError> {
        self.state.error()
    }

    /// The first error as text; empty while the emitter is good.
    #[must_use]
    pub fn last_error(&self) -> String {
        self.state.last_error()
    }

    #[must_use]
    pub fn state(&self) -> &EmitterState {
        &self.state
    }

    // ------------------------------------------------------------------
    // Global setters
    // ------------------------------------------------------------------

    pub fn set_output_charset(&mut self, value: EmitterManip) -> bool {
        if !self.good() {
            return false;
        }
        self.state.set_output_charset(value, FmtScope::Global)
    }

    pub fn set_string_format(&mut self, value: EmitterManip) -> bool {
        if !self.good() {
            return false;
        }
        self.state.set_string_format(value, FmtScope::Global)
    }

    /// Sets whichever of the bool spelling, case and length axes accepts
    /// `value`.
    pub fn set_bool_format(&mut self, value: EmitterManip) -> bool {
        if !self.good() {
            return false;
        }
        let mut ok = false;
        ok |= self.state.set_bool_format(value, FmtScope::Global);
        ok |= self.state.set_bool_case_format(value, FmtScope::Global);
        ok |= self.state.set_bool_length_format(value, FmtScope::Global);
        ok
    }

    pub fn set_int_base(&mut self, value: EmitterManip) -> bool {
        if !self.good() {
            return false;
        }
        self.state.set_int_format(value, FmtScope::Global)
    }

    pub fn set_seq_format(&mut self, value: EmitterManip) -> bool {
        if !self.good() {
            return false;
        }
        self.state
            .set_flow_type(GroupKind::Seq, value, FmtScope::Global)
    }

    /// Sets the map style (`Flow`/`Block`) or the key style (`Auto`/`LongKey`).
    pub fn set_map_format(&mut self, value: EmitterManip) -> bool {
        if !self.good() {
            return false;
        }
        let mut ok = false;
        ok |= self
            .state
            .set_flow_type(GroupKind::Map, value, FmtScope::Global);
        ok |= self.state.set_map_key_format(value, FmtScope::Global);
        ok
    }

    pub fn set_indent(&mut self, n: usize) -> bool {
        if !self.good() {
            return false;
        }
        self.state.set_indent(n, FmtScope::Global)
    }

    pub fn set_pre_comment_indent(&mut self, n: usize) -> bool {
        if !self.good() {
            return false;
        }
        self.state.set_pre_comment_indent(n, FmtScope::Global)
    }

    pub fn set_post_comment_indent(&mut self, n: usize) -> bool {
        if !self.good() {
            return false;
        }
        self.state.set_post_comment_indent(n, FmtScope::Global)
    }

    pub fn set_float_precision(&mut self, n: usize) -> bool {
        if !self.good() {
            return false;
        }
        self.state.set_float_precision(n, FmtScope::Global)
    }

    pub fn set_double_precision(&mut self, n: usize) -> bool {
        if !self.good() {
            return false;
        }
        self.state.set_double_precision(n, FmtScope::Global)
    }

    #[must_use]
    pub fn float_precision(&self) -> usize {
        self.state.float_precision()
    }

    #[must_use]
    pub fn double_precision(&self) -> usize {
        self.state.double_precision()
    }

    // ------------------------------------------------------------------
    // Token dispatch
    // ------------------------------------------------------------------

    /// Emits `value` and returns `self` for chaining.
    pub fn emit<T: Emit>(&mut self, value: T) -> &mut Self {
        value.emit_to(self);
        self
    }

    /// Runs `op` if the emitter is good and records its error, if any.
    fn run(&mut self, op: impl FnOnce(&mut Self) -> Result<(), EmitError>) {
        if !self.good() {
            return;
        }
        if let Err(error) = op(self) {
            self.state.set_error(error);
        }
    }

    /// Handles a structural token or sets a local formatting value.
    pub fn set_local_value(&mut self, value: EmitterManip) -> &mut Self {
        if !self.good() {
            return self;
        }
        match value {
            EmitterManip::BeginDoc => self.run(Self::begin_doc),
            EmitterManip::EndDoc => self.run(Self::end_doc),
            EmitterManip::BeginSeq => self.run(|e| e.begin_group(GroupKind::Seq)),
            EmitterManip::EndSeq => self.run(|e| e.end_group(GroupKind::Seq)),
            EmitterManip::BeginMap => self.run(|e| e.begin_group(GroupKind::Map)),
            EmitterManip::EndMap => self.run(|e| e.end_group(GroupKind::Map)),
            EmitterManip::Key => self.run(Self::key),
            EmitterManip::Value => self.run(Self::value),
            EmitterManip::TagByKind => self.run(|e| e.add_tag(String::from("!"))),
            EmitterManip::Newline => self.run(Self::newline),
            other => {
                self.state.set_local_value(other);
            }
        }
        self
    }

    pub fn set_local_indent(&mut self, indent: Indent) -> &mut Self {
        if self.good() {
            self.state.set_indent(indent.0, FmtScope::Local);
        }
        self
    }

    pub fn set_local_precision(&mut self, precision: Precision) -> &mut Self {
        if !self.good() {
            return self;
        }
        if let Some(n) = precision.float {
            self.state.set_float_precision(n, FmtScope::Local);
        }
        if let Some(n) = precision.double {
            self.state.set_double_precision(n, FmtScope::Local);
        }
        self
    }

    fn begin_doc(&mut self) -> Result<(), EmitError> {
        if self.state.depth() > 0 {
            return Err(EmitError::UnexpectedBeginDoc);
        }
        if !self.properties.is_empty() {
            return Err(EmitError::DanglingProperty);
        }
        self.writer.ensure_line_start();
        self.writer.write("---");
        self.state.pending = Pending::Inline;
        self.state.has_root = false;
        Ok(())
    }

    fn end_doc(&mut self) -> Result<(), EmitError> {
        if self.state.depth() > 0 {
            return Err(EmitError::UnexpectedEndDoc);
        }
        if !self.properties.is_empty() {
            return Err(EmitError::DanglingProperty);
        }
        self.writer.ensure_line_start();
        self.writer.write("...");
        self.state.pending = Pending::Nothing;
        self.state.has_root = false;
        Ok(())
    }

    fn begin_group(&mut self, kind: GroupKind) -> Result<(), EmitError> {
        let flow = self.state.in_flow() || self.state.flow_type(kind) == EmitterManip::Flow;
        self.prepare_node(!flow)?;
        self.flush_properties();
        self.state.push_group(kind);
        if flow {
            self.write_content(match kind {
                GroupKind::Seq => "[",
                GroupKind::Map => "{",
            });
        }
        Ok(())
    }

    fn end_group(&mut self, kind: GroupKind) -> Result<(), EmitError> {
        let Some(group) = self.state.current_group() else {
            return Err(match kind {
                GroupKind::Seq => EmitError::UnexpectedEndSeq,
                GroupKind::Map => EmitError::UnexpectedEndMap,
            });
        };
        if group.kind != kind {
            return Err(EmitError::UnmatchedGroupTag);
        }
        match group.phase {
            MapPhase::Idle => {}
            MapPhase::AwaitKey | MapPhase::WritingKey => return Err(EmitError::ExpectedKey),
            MapPhase::KeyDone | MapPhase::AwaitValue | MapPhase::WritingValue => {
                return Err(EmitError::ExpectedValue)
            }
        }
        if !self.properties.is_empty() {
            return Err(EmitError::DanglingProperty);
        }

        if let Some(group) = self.state.pop_group() {
            let text = match (group.flow, kind) {
                (true, GroupKind::Seq) => Some("]"),
                (true, GroupKind::Map) => Some("}"),
                (false, GroupKind::Seq) if group.child_count == 0 => Some("[]"),
                (false, GroupKind::Map) if group.child_count == 0 => Some("{}"),
                _ => None,
            };
            if let Some(text) = text {
                if group.flow {
                    self.writer.write(text);
                } else {
                    self.write_content(text);
                }
            }
        }
        self.state.pending = Pending::Nothing;
        self.finish_node();
        Ok(())
    }

    fn key(&mut self) -> Result<(), EmitError> {
        let group = match self.state.current_group_mut() {
            Some(group) if group.kind == GroupKind::Map => group,
            _ => return Err(EmitError::UnexpectedKey),
        };
        match group.phase {
            MapPhase::Idle => {
                group.phase = MapPhase::AwaitKey;
                Ok(())
            }
            MapPhase::KeyDone | MapPhase::AwaitValue => Err(EmitError::ExpectedValue),
            _ => Err(EmitError::UnexpectedKey),
        }
    }

    fn value(&mut self) -> Result<(), EmitError> {
        match self.state.current_group_mut() {
            Some(group) if group.kind == GroupKind::Map && group.phase == MapPhase::KeyDone => {
                group.phase = MapPhase::AwaitValue;
                Ok(())
            }
            _ => Err(EmitError::UnexpectedValue),
        }
    }

    /// Inserts a blank line between block entries; ignored anywhere else.
    fn newline(&mut self) -> Result<(), EmitError> {
        let between_entries = match self.state.current_group() {
            None => true,
            Some(group) => !group.flow && group.phase == MapPhase::Idle,
        };
        if between_entries && self.state.pending == Pending::Nothing {
            self.writer.ensure_line_start();
            self.writer.newline();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Node placement
    // ------------------------------------------------------------------

    /// Writes whatever must precede the next node in its parent: an entry
    /// indicator, a separator, or a map colon. `block_group` is set when the
    /// node is a block sequence or map.
    fn prepare_node(&mut self, block_group: bool) -> Result<(), EmitError> {
        let Some(group) = self.state.current_group() else {
            self.prepare_document_root();
            return Ok(());
        };
        let (kind, flow, phase) = (group.kind, group.flow, group.phase);
        let (indent, content) = (group.indent, group.indent + group.width);
        let (first, long_key) = (group.child_count == 0, group.long_key);

        match (kind, flow) {
            (GroupKind::Seq, false) => {
                self.start_block_entry(indent);
                self.write_indicator("-", content);
            }
            (GroupKind::Seq, true) => {
                if !first {
                    self.writer.write(",");
                    self.state.pending = Pending::Inline;
                }
            }
            (GroupKind::Map, _) => match phase {
                MapPhase::Idle | MapPhase::WritingValue => return Err(EmitError::ExpectedKey),
                MapPhase::KeyDone | MapPhase::WritingKey => return Err(EmitError::ExpectedValue),
                MapPhase::AwaitKey => {
                    let long = block_group || self.state.map_key_format() == EmitterManip::LongKey;
                    if flow {
                        if !first {
                            self.writer.write(",");
                            self.state.pending = Pending::Inline;
                        }
                        if long {
                            self.write_content("?");
                            self.state.pending = Pending::Inline;
                        }
                    } else {
                        self.start_block_entry(indent);
                        if long {
                            self.write_indicator("?", content);
                        }
                    }
                    if let Some(group) = self.state.current_group_mut() {
                        group.long_key = long;
                        group.phase = MapPhase::WritingKey;
                    }
                }
                MapPhase::AwaitValue => {
                    if long_key && !flow {
                        self.writer.ensure_line_start();
                        self.writer.indent_to(indent);
                        self.write_indicator(":", content);
                    } else {
                        self.writer.write(":");
                        self.state.pending = Pending::Inline;
                    }
                    if let Some(group) = self.state.current_group_mut() {
                        group.phase = MapPhase::WritingValue;
                    }
                }
            },
        }
        if kind == GroupKind::Seq {
            if let Some(group) = self.state.current_group_mut() {
                group.child_count += 1;
            }
        }
        Ok(())
    }

    fn prepare_document_root(&mut self) {
        if self.state.has_root {
            // A second root starts a new document.
            self.writer.ensure_line_start();
            self.writer.write("---");
            self.state.pending = Pending::Inline;
        } else if self.state.pending == Pending::Nothing {
            self.writer.ensure_line_start();
        }
        self.state.has_root = true;
    }

    fn start_block_entry(&mut self, indent: usize) {
        if self.state.pending != Pending::Indicator {
            self.writer.ensure_line_start();
            self.writer.indent_to(indent);
        }
        self.state.pending = Pending::Nothing;
    }

    fn write_indicator(&mut self, indicator: &str, content_column: usize) {
        self.writer.write(indicator);
        self.writer.write(" ");
        self.writer.indent_to(content_column);
        self.state.pending = Pending::Indicator;
    }

    /// Writes inline text, separated from a preceding header by one space.
    fn write_content(&mut self, text: &str) {
        if self.state.pending == Pending::Inline {
            self.writer.ensure_space();
        }
        self.writer.write(text);
        self.state.pending = Pending::Nothing;
    }

    fn flush_properties(&mut self) {
        let properties = std::mem::take(&mut self.properties);
        for property in &properties.rendered {
            self.write_content(property);
            self.state.pending = Pending::Inline;
        }
    }

    /// Closes the current node: drops local settings and advances the
    /// parent map's entry phase.
    fn finish_node(&mut self) {
        self.state.clear_local_settings();
        if let Some(group) = self.state.current_group_mut() {
            if group.kind == GroupKind::Map {
                match group.phase {
                    MapPhase::WritingKey => group.phase = MapPhase::KeyDone,
                    MapPhase::WritingValue => {
                        group.phase = MapPhase::Idle;
                        group.child_count += 1;
                    }
                    _ => {}
                }
            }
        }
    }

    fn writing_key(&self) -> bool {
        self.state
            .current_group()
            .is_some_and(|group| group.phase == MapPhase::WritingKey)
    }

    /// Column where the content of a block scalar in the current group goes.
    fn block_content_column(&self) -> usize {
        self.state
            .current_group()
            .map_or(self.state.indent(), |group| group.indent + group.width)
    }

    // ------------------------------------------------------------------
    // Scalars and properties
    // ------------------------------------------------------------------

    /// Writes `text` as it is, with no quoting.
    fn write_plain(&mut self, text: &str) -> Result<(), EmitError> {
        self.prepare_node(false)?;
        self.flush_properties();
        self.write_content(text);
        self.finish_node();
        Ok(())
    }

    fn write_string(&mut self, text: &str) -> Result<(), EmitError> {
        self.prepare_node(false)?;
        self.flush_properties();

        let escape = self.state.output_charset() == EmitterManip::EscapeNonAscii;
        let style = writer::choose_string_style(
            text,
            self.state.string_format(),
            escape,
            self.state.in_flow(),
            self.writing_key(),
        );
        match style {
            StringStyle::Plain => self.write_content(text),
            StringStyle::SingleQuoted => self.write_content(&writer::single_quoted(text)),
            StringStyle::DoubleQuoted => self.write_content(&writer::double_quoted(text, escape)),
            StringStyle::Literal => {
                let column = self.block_content_column();
                self.write_content(writer::literal_header(text));
                writer::write_literal_body(&mut self.writer, text, column);
            }
        }
        self.finish_node();
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), EmitError> {
        let name = self.state.bool_name(value);
        let text = if self.state.bool_length_format() == EmitterManip::ShortBool {
            &name[..1]
        } else {
            name
        };
        self.write_plain(text)
    }

    fn write_int(&mut self, value: i128) -> Result<(), EmitError> {
        let text = writer::format_int(value, self.state.int_format());
        self.write_plain(&text)
    }

    fn write_float(&mut self, value: f64, precision: usize) -> Result<(), EmitError> {
        self.write_plain(&writer::format_float(value, precision))
    }

    fn write_alias(&mut self, name: &str) -> Result<(), EmitError> {
        if !writer::is_valid_anchor_name(name) || !self.properties.is_empty() {
            return Err(EmitError::InvalidAlias);
        }
        self.prepare_node(false)?;
        self.write_content(&format!("*{}", name));
        self.finish_node();
        Ok(())
    }

    fn add_anchor(&mut self, name: &str) -> Result<(), EmitError> {
        if !writer::is_valid_anchor_name(name) {
            return Err(EmitError::InvalidAnchor);
        }
        if self.properties.anchor {
            return Err(EmitError::DuplicateProperty("anchor"));
        }
        self.properties.anchor = true;
        self.properties.rendered.push(format!("&{}", name));
        Ok(())
    }

    fn add_tag(&mut self, rendered: String) -> Result<(), EmitError> {
        if self.properties.tag {
            return Err(EmitError::DuplicateProperty("tag"));
        }
        self.properties.tag = true;
        self.properties.rendered.push(rendered);
        Ok(())
    }

    fn write_comment(&mut self, text: &str) -> Result<(), EmitError> {
        if self.writer.column() > 0 {
            let pre = self.state.pre_comment_indent();
            self.writer.indent_to(self.writer.column() + pre);
        }
        let column = self.writer.column();
        let post = " ".repeat(self.state.post_comment_indent());
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.writer.newline();
                self.writer.indent_to(column);
            }
            self.writer.write("#");
            self.writer.write(&post);
            self.writer.write(line);
        }
        self.writer.newline();

        if self.state.pending == Pending::Nothing {
            return Ok(());
        }
        match self.state.current_group() {
            // After `---`: the root starts on the fresh line.
            None => self.state.pending = Pending::Nothing,
            // A block group that has just opened puts its first entry at the
            // group's own indent, like every later entry.
            Some(group) if !group.flow && group.child_count == 0 && group.phase == MapPhase::Idle => {
                let indent = group.indent;
                self.writer.indent_to(indent);
                self.state.pending = Pending::Indicator;
            }
            // Content still owed to an open entry continues on the next line.
            Some(_) => {
                let column = self.block_content_column();
                self.writer.indent_to(column);
                self.state.pending = Pending::Indicator;
            }
        }
        Ok(())
    }

    fn write_binary(&mut self, data: &[u8]) -> Result<(), EmitError> {
        self.add_tag(String::from("!!binary"))?;
        let encoded = writer::encode_base64(data);
        self.write_plain(&format!("\"{}\"", encoded))
    }

    fn write_node(&mut self, node: NodeRef<'_>) {
        if let Some(tag) = node.tag() {
            self.emit(Tag::from_node_tag(tag));
        }
        match node.kind() {
            NodeType::Undefined | NodeType::Null => {
                self.emit(Null);
            }
            NodeType::Scalar => {
                self.emit(node.scalar().unwrap_or_default());
            }
            NodeType::Sequence => {
                self.emit(EmitterManip::BeginSeq);
                for entry in node.iter() {
                    if let Some(child) = entry.node() {
                        self.write_node(*child);
                    }
                }
                self.emit(EmitterManip::EndSeq);
            }
            NodeType::Map => {
                self.emit(EmitterManip::BeginMap);
                for entry in node.iter() {
                    if let Some((key, value)) = entry.pair() {
                        self.emit(EmitterManip::Key);
                        self.write_node(*key);
                        self.emit(EmitterManip::Value);
                        self.write_node(*value);
                    }
                }
                self.emit(EmitterManip::EndMap);
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Emittable values
// ----------------------------------------------------------------------------

/// A value the emitter can write.
pub trait Emit {
    fn emit_to(&self, out: &mut Emitter);
}

impl<T: Emit + ?Sized> Emit for &T {
    fn emit_to(&self, out: &mut Emitter) {
        (**self).emit_to(out);
    }
}

impl Emit for EmitterManip {
    fn emit_to(&self, out: &mut Emitter) {
        out.set_local_value(*self);
    }
}

impl Emit for str {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.write_string(self));
    }
}

impl Emit for String {
    fn emit_to(&self, out: &mut Emitter) {
        self.as_str().emit_to(out);
    }
}

impl Emit for char {
    fn emit_to(&self, out: &mut Emitter) {
        let mut buf = [0u8; 4];
        self.encode_utf8(&mut buf).emit_to(out);
    }
}

impl Emit for bool {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.write_bool(*self));
    }
}

macro_rules! emit_int {
    ($($ty:ty),*) => {$(
        impl Emit for $ty {
            fn emit_to(&self, out: &mut Emitter) {
                out.run(|e| e.write_int(*self as i128));
            }
        }
    )*};
}

emit_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Emit for f32 {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.write_float(f64::from(*self), e.state.float_precision()));
    }
}

impl Emit for f64 {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.write_float(*self, e.state.double_precision()));
    }
}

impl Emit for Null {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.write_plain("~"));
    }
}

impl<T: Emit> Emit for Option<T> {
    fn emit_to(&self, out: &mut Emitter) {
        match self {
            Some(value) => value.emit_to(out),
            None => Null.emit_to(out),
        }
    }
}

impl<T: Emit> Emit for [T] {
    fn emit_to(&self, out: &mut Emitter) {
        out.emit(EmitterManip::BeginSeq);
        for item in self {
            item.emit_to(out);
        }
        out.emit(EmitterManip::EndSeq);
    }
}

impl<T: Emit> Emit for Vec<T> {
    fn emit_to(&self, out: &mut Emitter) {
        self.as_slice().emit_to(out);
    }
}

impl<K: Emit, V: Emit> Emit for IndexMap<K, V> {
    fn emit_to(&self, out: &mut Emitter) {
        out.emit(EmitterManip::BeginMap);
        for (key, value) in self {
            out.emit(EmitterManip::Key).emit(key);
            out.emit(EmitterManip::Value).emit(value);
        }
        out.emit(EmitterManip::EndMap);
    }
}

impl Emit for NodeRef<'_> {
    fn emit_to(&self, out: &mut Emitter) {
        out.write_node(*self);
    }
}

/// Local indent override for the next value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(pub usize);

impl Emit for Indent {
    fn emit_to(&self, out: &mut Emitter) {
        out.set_local_indent(*self);
    }
}

/// Local precision override for the next floating-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Precision {
    pub float: Option<usize>,
    pub double: Option<usize>,
}

impl Precision {
    /// Same precision for `f32` and `f64`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Precision {
            float: Some(n),
            double: Some(n),
        }
    }

    #[must_use]
    pub fn float(n: usize) -> Self {
        Precision {
            float: Some(n),
            double: None,
        }
    }

    #[must_use]
    pub fn double(n: usize) -> Self {
        Precision {
            float: None,
            double: Some(n),
        }
    }
}

impl Emit for Precision {
    fn emit_to(&self, out: &mut Emitter) {
        out.set_local_precision(*self);
    }
}

/// A reference to an anchored node, written `*name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias(pub String);

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Alias(name.into())
    }
}

impl Emit for Alias {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.write_alias(&self.0));
    }
}

/// Anchors the next node, written `&name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor(pub String);

impl Anchor {
    pub fn new(name: impl Into<String>) -> Self {
        Anchor(name.into())
    }
}

impl Emit for Anchor {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.add_anchor(&self.0));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `!<content>`
    Verbatim,
    /// `!content`
    Local,
    /// `!!content`
    Secondary,
}

/// Tags the next node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub content: String,
}

const CORE_SCHEMA_PREFIX: &str = "tag:yaml.org,2002:";

impl Tag {
    pub fn verbatim(content: impl Into<String>) -> Self {
        Tag {
            kind: TagKind::Verbatim,
            content: content.into(),
        }
    }

    pub fn local(content: impl Into<String>) -> Self {
        Tag {
            kind: TagKind::Local,
            content: content.into(),
        }
    }

    pub fn secondary(content: impl Into<String>) -> Self {
        Tag {
            kind: TagKind::Secondary,
            content: content.into(),
        }
    }

    /// Interprets a tag string stored on a node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_node::{Tag, TagKind};
    ///
    /// assert_eq!(Tag::from_node_tag("!!str"), Tag::secondary("str"));
    /// assert_eq!(Tag::from_node_tag("tag:yaml.org,2002:int"), Tag::secondary("int"));
    /// assert_eq!(Tag::from_node_tag("!point"), Tag::local("point"));
    /// assert_eq!(Tag::from_node_tag("urn:x").kind, TagKind::Verbatim);
    /// ```
    #[must_use]
    pub fn from_node_tag(tag: &str) -> Self {
        if let Some(rest) = tag.strip_prefix("!!") {
            Tag::secondary(rest)
        } else if let Some(rest) = tag.strip_prefix('!') {
            Tag::local(rest)
        } else if let Some(rest) = tag.strip_prefix(CORE_SCHEMA_PREFIX) {
            Tag::secondary(rest)
        } else {
            Tag::verbatim(tag)
        }
    }

    fn is_valid(&self) -> bool {
        match self.kind {
            TagKind::Verbatim => writer::is_valid_tag_content(&self.content, true),
            TagKind::Local => writer::is_valid_tag_content(&self.content, false),
            TagKind::Secondary => {
                !self.content.is_empty() && writer::is_valid_tag_content(&self.content, false)
            }
        }
    }

    fn render(&self) -> String {
        match self.kind {
            TagKind::Verbatim => format!("!<{}>", self.content),
            TagKind::Local => format!("!{}", self.content),
            TagKind::Secondary => format!("!!{}", self.content),
        }
    }
}

impl Emit for Tag {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| {
            if !self.is_valid() {
                return Err(EmitError::InvalidTag);
            }
            e.add_tag(self.render())
        });
    }
}

/// A comment, written `# text` and followed by a line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment(pub String);

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Comment(text.into())
    }
}

impl Emit for Comment {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.write_comment(&self.0));
    }
}

/// Raw bytes, written as a `!!binary` base64 scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary(pub Vec<u8>);

impl Binary {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Binary(data.into())
    }
}

impl Emit for Binary {
    fn emit_to(&self, out: &mut Emitter) {
        out.run(|e| e.write_binary(&self.0));
    }
}
