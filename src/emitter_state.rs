//! Formatting state behind an [`Emitter`](crate::Emitter).
//!
//! Every formatting axis is a [`Setting`] with two levels: a global value
//! and an optional local override that applies to the next emitted value
//! only. Resolution is always local first, then global.
//!
//! Opening a group snapshots the settings. Local overrides in force at that
//! moment become the group's own defaults, so `Hex` followed by `BeginSeq`
//! renders every element of that sequence in hex. Closing the group restores
//! the snapshot, which also undoes global changes made inside it.

use crate::error::EmitError;
use crate::options::{EmitterManip, EmitterOptions};

/// Lifetime of a setting change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FmtScope {
    /// Applies to the next emitted value, then reverts.
    Local,
    /// Applies until changed again (or until the enclosing group closes).
    Global,
}

/// One formatting axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Setting<T> {
    global: T,
    local: Option<T>,
}

impl<T: Copy> Setting<T> {
    pub const fn new(value: T) -> Self {
        Setting {
            global: value,
            local: None,
        }
    }

    #[inline]
    pub fn get(&self) -> T {
        self.local.unwrap_or(self.global)
    }

    pub fn set(&mut self, value: T, scope: FmtScope) {
        match scope {
            FmtScope::Local => self.local = Some(value),
            FmtScope::Global => self.global = value,
        }
    }

    fn clear_local(&mut self) {
        self.local = None;
    }

    fn promote_local(&mut self) {
        if let Some(value) = self.local.take() {
            self.global = value;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    charset: Setting<EmitterManip>,
    string_format: Setting<EmitterManip>,
    bool_format: Setting<EmitterManip>,
    bool_case: Setting<EmitterManip>,
    bool_length: Setting<EmitterManip>,
    int_base: Setting<EmitterManip>,
    seq_format: Setting<EmitterManip>,
    map_format: Setting<EmitterManip>,
    map_key_format: Setting<EmitterManip>,
    indent: Setting<usize>,
    pre_comment_indent: Setting<usize>,
    post_comment_indent: Setting<usize>,
    float_precision: Setting<usize>,
    double_precision: Setting<usize>,
}

macro_rules! each_setting {
    ($settings:expr, $method:ident) => {{
        let s = $settings;
        s.charset.$method();
        s.string_format.$method();
        s.bool_format.$method();
        s.bool_case.$method();
        s.bool_length.$method();
        s.int_base.$method();
        s.seq_format.$method();
        s.map_format.$method();
        s.map_key_format.$method();
        s.indent.$method();
        s.pre_comment_indent.$method();
        s.post_comment_indent.$method();
        s.float_precision.$method();
        s.double_precision.$method();
    }};
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = EmitterOptions::default();
        Settings {
            charset: Setting::new(defaults.charset),
            string_format: Setting::new(defaults.string_format),
            bool_format: Setting::new(defaults.bool_format),
            bool_case: Setting::new(defaults.bool_case),
            bool_length: Setting::new(defaults.bool_length),
            int_base: Setting::new(defaults.int_base),
            seq_format: Setting::new(defaults.seq_format),
            map_format: Setting::new(defaults.map_format),
            map_key_format: Setting::new(defaults.map_key_format),
            indent: Setting::new(defaults.indent),
            pre_comment_indent: Setting::new(defaults.pre_comment_indent),
            post_comment_indent: Setting::new(defaults.post_comment_indent),
            float_precision: Setting::new(defaults.float_precision),
            double_precision: Setting::new(defaults.double_precision),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Seq,
    Map,
}

/// Progress through the current entry of a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MapPhase {
    /// Between entries; the next token must be `Key`.
    Idle,
    AwaitKey,
    WritingKey,
    /// The key is written; the next token must be `Value`.
    KeyDone,
    AwaitValue,
    WritingValue,
}

/// One open sequence or map.
#[derive(Clone, Debug)]
pub(crate) struct Group {
    pub kind: GroupKind,
    pub flow: bool,
    /// Column at which block entries start.
    pub indent: usize,
    /// Columns nested block content is shifted by.
    pub width: usize,
    pub child_count: usize,
    pub phase: MapPhase,
    pub long_key: bool,
    saved: Settings,
}

/// What the writer just produced, deciding how the next node is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pending {
    Nothing,
    /// An entry indicator (`- `, `? `, `: `) with the cursor at the content
    /// column. A nested block group may start on this line.
    Indicator,
    /// A header on the current line (`key:`, `---`, an anchor). Inline content
    /// follows after a space; block entries start on the next line.
    Inline,
}

/// Global/local settings, the group stack and the error status.
#[derive(Clone, Debug)]
pub struct EmitterState {
    settings: Settings,
    groups: Vec<Group>,
    error: Option<EmitError>,
    pub(crate) pending: Pending,
    /// Whether the current document already holds a root node.
    pub(crate) has_root: bool,
}

impl Default for EmitterState {
    fn default() -> Self {
        Self::new()
    }
}

impl EmitterState {
    #[must_use]
    pub fn new() -> Self {
        EmitterState {
            settings: Settings::default(),
            groups: Vec::new(),
            error: None,
            pending: Pending::Nothing,
            has_root: false,
        }
    }

    /// Applies `options` as global settings. Returns `false` if any value
    /// was rejected; the rejected axes keep their previous value.
    pub fn apply_options(&mut self, options: &EmitterOptions) -> bool {
        let scope = FmtScope::Global;
        let mut ok = true;
        ok &= self.set_output_charset(options.charset, scope);
        ok &= self.set_string_format(options.string_format, scope);
        ok &= self.set_bool_format(options.bool_format, scope);
        ok &= self.set_bool_case_format(options.bool_case, scope);
        ok &= self.set_bool_length_format(options.bool_length, scope);
        ok &= self.set_int_format(options.int_base, scope);
        ok &= self.set_flow_type(GroupKind::Seq, options.seq_format, scope);
        ok &= self.set_flow_type(GroupKind::Map, options.map_format, scope);
        ok &= self.set_map_key_format(options.map_key_format, scope);
        ok &= self.set_indent(options.indent, scope);
        ok &= self.set_pre_comment_indent(options.pre_comment_indent, scope);
        ok &= self.set_post_comment_indent(options.post_comment_indent, scope);
        ok &= self.set_float_precision(options.float_precision, scope);
        ok &= self.set_double_precision(options.double_precision, scope);
        ok
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn good(&self) -> bool {
        self.error.is_none()
    }

    #[must_use]
    pub fn error(&self) -> Option<&EmitError> {
        self.error.as_ref()
    }

    /// The first error recorded, as text; empty while the state is good.
    #[must_use]
    pub fn last_error(&self) -> String {
        self.error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Records `error` unless one is already recorded.
    pub fn set_error(&mut self, error: EmitError) {
        if self.error.is_none() {
            tracing::debug!(%error, "emitter entered bad state");
            self.error = Some(error);
        }
    }

    // ------------------------------------------------------------------
    // Setters. Each returns `false` and changes nothing when `value` does
    // not belong to the axis.
    // ------------------------------------------------------------------

    /// Sets `value` locally on every axis that accepts it.
    pub fn set_local_value(&mut self, value: EmitterManip) -> bool {
        let scope = FmtScope::Local;
        let mut ok = false;
        ok |= self.set_output_charset(value, scope);
        ok |= self.set_string_format(value, scope);
        ok |= self.set_bool_format(value, scope);
        ok |= self.set_bool_case_format(value, scope);
        ok |= self.set_bool_length_format(value, scope);
        ok |= self.set_int_format(value, scope);
        ok |= self.set_flow_type(GroupKind::Seq, value, scope);
        ok |= self.set_flow_type(GroupKind::Map, value, scope);
        ok |= self.set_map_key_format(value, scope);
        ok
    }

    pub fn set_output_charset(&mut self, value: EmitterManip, scope: FmtScope) -> bool {
        match value {
            EmitterManip::EmitNonAscii | EmitterManip::EscapeNonAscii => {
                self.settings.charset.set(value, scope);
                true
            }
            _ => false,
        }
    }

    pub fn set_string_format(&mut self, value: EmitterManip, scope: FmtScope) -> bool {
        match value {
            EmitterManip::Auto
            | EmitterManip::SingleQuoted
            | EmitterManip::DoubleQuoted
            | EmitterManip::Literal => {
                self.settings.string_format.set(value, scope);
                true
            }
            _ => false,
        }
    }

    pub fn set_bool_format(&mut self, value: EmitterManip, scope: FmtScope) -> bool {
        match value {
            EmitterManip::YesNoBool | EmitterManip::TrueFalseBool | EmitterManip::OnOffBool => {
                self.settings.bool_format.set(value, scope);
                true
            }
            _ => false,
        }
    }

    pub fn set_bool_case_format(&mut self, value: EmitterManip, scope: FmtScope) -> bool {
        match value {
            EmitterManip::UpperCase | EmitterManip::LowerCase | EmitterManip::CamelCase => {
                self.settings.bool_case.set(value, scope);
                true
            }
            _ => false,
        }
    }

    pub fn set_bool_length_format(&mut self, value: EmitterManip, scope: FmtScope) -> bool {
        match value {
            EmitterManip::LongBool | EmitterManip::ShortBool => {
                self.settings.bool_length.set(value, scope);
                true
            }
            _ => false,
        }
    }

    pub fn set_int_format(&mut self, value: EmitterManip, scope: FmtScope) -> bool {
        match value {
            EmitterManip::Dec | EmitterManip::Hex | EmitterManip::Oct => {
                self.settings.int_base.set(value, scope);
                true
            }
            _ => false,
        }
    }

    pub fn set_flow_type(&mut self, kind: GroupKind, value: EmitterManip, scope: FmtScope) -> bool {
        if !matches!(value, EmitterManip::Flow | EmitterManip::Block) {
            return false;
        }
        match kind {
            GroupKind::Seq => self.settings.seq_format.set(value, scope),
            GroupKind::Map => self.settings.map_format.set(value, scope),
        }
        true
    }

    pub fn set_map_key_format(&mut self, value: EmitterManip, scope: FmtScope) -> bool {
        match value {
            EmitterManip::Auto | EmitterManip::LongKey => {
                self.settings.map_key_format.set(value, scope);
                true
            }
            _ => false,
        }
    }

    pub fn set_indent(&mut self, value: usize, scope: FmtScope) -> bool {
        if !(2..=9).contains(&value) {
            return false;
        }
        self.settings.indent.set(value, scope);
        true
    }

    pub fn set_pre_comment_indent(&mut self, value: usize, scope: FmtScope) -> bool {
        if value == 0 {
            return false;
        }
        self.settings.pre_comment_indent.set(value, scope);
        true
    }

    pub fn set_post_comment_indent(&mut self, value: usize, scope: FmtScope) -> bool {
        if value == 0 {
            return false;
        }
        self.settings.post_comment_indent.set(value, scope);
        true
    }

    pub fn set_float_precision(&mut self, value: usize, scope: FmtScope) -> bool {
        if value > 9 {
            return false;
        }
        self.settings.float_precision.set(value, scope);
        true
    }

    pub fn set_double_precision(&mut self, value: usize, scope: FmtScope) -> bool {
        if value > 17 {
            return false;
        }
        self.settings.double_precision.set(value, scope);
        true
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    #[must_use]
    pub fn output_charset(&self) -> EmitterManip {
        self.settings.charset.get()
    }

    #[must_use]
    pub fn string_format(&self) -> EmitterManip {
        self.settings.string_format.get()
    }

    #[must_use]
    pub fn bool_format(&self) -> EmitterManip {
        self.settings.bool_format.get()
    }

    #[must_use]
    pub fn bool_case_format(&self) -> EmitterManip {
        self.settings.bool_case.get()
    }

    #[must_use]
    pub fn bool_length_format(&self) -> EmitterManip {
        self.settings.bool_length.get()
    }

    #[must_use]
    pub fn int_format(&self) -> EmitterManip {
        self.settings.int_base.get()
    }

    #[must_use]
    pub fn flow_type(&self, kind: GroupKind) -> EmitterManip {
        match kind {
            GroupKind::Seq => self.settings.seq_format.get(),
            GroupKind::Map => self.settings.map_format.get(),
        }
    }

    #[must_use]
    pub fn map_key_format(&self) -> EmitterManip {
        self.settings.map_key_format.get()
    }

    #[must_use]
    pub fn indent(&self) -> usize {
        self.settings.indent.get()
    }

    #[must_use]
    pub fn pre_comment_indent(&self) -> usize {
        self.settings.pre_comment_indent.get()
    }

    #[must_use]
    pub fn post_comment_indent(&self) -> usize {
        self.settings.post_comment_indent.get()
    }

    #[must_use]
    pub fn float_precision(&self) -> usize {
        self.settings.float_precision.get()
    }

    #[must_use]
    pub fn double_precision(&self) -> usize {
        self.settings.double_precision.get()
    }

    /// The boolean spelling selected by the format, case and length axes.
    ///
    /// A short length always spells `y`/`n` style words; the writer keeps
    /// only their first letter.
    #[must_use]
    pub fn bool_name(&self, value: bool) -> &'static str {
        let format = if self.bool_length_format() == EmitterManip::ShortBool {
            EmitterManip::YesNoBool
        } else {
            self.bool_format()
        };
        compute_full_bool_name(format, self.bool_case_format(), value)
    }

    /// Reverts every local override. Called once a value has been emitted.
    pub fn clear_local_settings(&mut self) {
        each_setting!(&mut self.settings, clear_local);
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Number of open groups.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn current_group(&self) -> Option<&Group> {
        self.groups.last()
    }

    pub(crate) fn current_group_mut(&mut self) -> Option<&mut Group> {
        self.groups.last_mut()
    }

    /// Whether the innermost open group renders in flow style.
    #[must_use]
    pub fn in_flow(&self) -> bool {
        self.current_group().is_some_and(|group| group.flow)
    }

    pub(crate) fn push_group(&mut self, kind: GroupKind) {
        let parent = self.groups.last();
        let flow = parent.is_some_and(|p| p.flow) || self.flow_type(kind) == EmitterManip::Flow;
        let indent = parent.map_or(0, |p| p.indent + p.width);
        let width = self.indent();

        let mut saved = self.settings.clone();
        each_setting!(&mut saved, clear_local);
        each_setting!(&mut self.settings, promote_local);

        tracing::trace!(?kind, flow, indent, depth = self.groups.len() + 1, "open group");
        self.groups.push(Group {
            kind,
            flow,
            indent,
            width,
            child_count: 0,
            phase: MapPhase::Idle,
            long_key: false,
            saved,
        });
    }

    pub(crate) fn pop_group(&mut self) -> Option<Group> {
        let mut group = self.groups.pop()?;
        tracing::trace!(kind = ?group.kind, depth = self.groups.len(), "close group");
        self.settings = std::mem::take(&mut group.saved);
        Some(group)
    }
}

/// Composes the spelling, case and length axes into one boolean word.
///
/// Combinations the setters cannot produce fall through to `y`/`n`.
pub(crate) fn compute_full_bool_name(
    format: EmitterManip,
    case: EmitterManip,
    value: bool,
) -> &'static str {
    use EmitterManip::{CamelCase, LowerCase, OnOffBool, TrueFalseBool, UpperCase, YesNoBool};

    match (format, case) {
        (YesNoBool, UpperCase) => if value { "YES" } else { "NO" },
        (YesNoBool, CamelCase) => if value { "Yes" } else { "No" },
        (YesNoBool, LowerCase) => if value { "yes" } else { "no" },
        (OnOffBool, UpperCase) => if value { "ON" } else { "OFF" },
        (OnOffBool, CamelCase) => if value { "On" } else { "Off" },
        (OnOffBool, LowerCase) => if value { "on" } else { "off" },
        (TrueFalseBool, UpperCase) => if value { "TRUE" } else { "FALSE" },
        (TrueFalseBool, CamelCase) => if value { "True" } else { "False" },
        (TrueFalseBool, LowerCase) => if value { "true" } else { "false" },
        _ => if value { "y" } else { "n" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EmitterManip as M;

    #[test]
    fn test_local_overrides_global_once() {
        let mut state = EmitterState::new();
        assert!(state.set_int_format(M::Hex, FmtScope::Global));
        assert!(state.set_int_format(M::Oct, FmtScope::Local));
        assert_eq!(state.int_format(), M::Oct);
        state.clear_local_settings();
        assert_eq!(state.int_format(), M::Hex);
    }

    #[test]
    fn test_setters_reject_foreign_values() {
        let mut state = EmitterState::new();
        assert!(!state.set_int_format(M::Flow, FmtScope::Global));
        assert!(!state.set_bool_format(M::UpperCase, FmtScope::Global));
        assert!(!state.set_indent(1, FmtScope::Global));
        assert!(!state.set_indent(10, FmtScope::Global));
        assert!(!state.set_pre_comment_indent(0, FmtScope::Global));
        assert!(!state.set_float_precision(10, FmtScope::Global));
        assert!(!state.set_double_precision(18, FmtScope::Global));
        assert_eq!(state.int_format(), M::Dec);
        assert_eq!(state.indent(), 2);
    }

    #[test]
    fn test_local_value_reaches_every_accepting_axis() {
        let mut state = EmitterState::new();
        assert!(state.set_local_value(M::Flow));
        assert_eq!(state.flow_type(GroupKind::Seq), M::Flow);
        assert_eq!(state.flow_type(GroupKind::Map), M::Flow);

        assert!(state.set_local_value(M::Auto));
        assert_eq!(state.string_format(), M::Auto);
        assert_eq!(state.map_key_format(), M::Auto);

        assert!(!state.set_local_value(M::BeginSeq));
    }

    #[test]
    fn test_bool_names() {
        assert_eq!(compute_full_bool_name(M::OnOffBool, M::UpperCase, true), "ON");
        assert_eq!(compute_full_bool_name(M::YesNoBool, M::CamelCase, false), "No");
        assert_eq!(compute_full_bool_name(M::TrueFalseBool, M::LowerCase, true), "true");
        assert_eq!(compute_full_bool_name(M::Hex, M::LowerCase, true), "y");
        assert_eq!(compute_full_bool_name(M::YesNoBool, M::Flow, false), "n");
    }

    #[test]
    fn test_short_bool_forces_yes_no() {
        let mut state = EmitterState::new();
        state.set_bool_format(M::OnOffBool, FmtScope::Global);
        state.set_bool_length_format(M::ShortBool, FmtScope::Global);
        assert_eq!(state.bool_name(true), "yes");
    }

    #[test]
    fn test_group_scope_restores_settings() {
        let mut state = EmitterState::new();
        state.set_int_format(M::Hex, FmtScope::Local);
        state.push_group(GroupKind::Seq);
        // The local override became the group's default.
        assert_eq!(state.int_format(), M::Hex);
        state.clear_local_settings();
        assert_eq!(state.int_format(), M::Hex);

        state.set_bool_case_format(M::UpperCase, FmtScope::Global);
        state.pop_group();
        assert_eq!(state.int_format(), M::Dec);
        assert_eq!(state.bool_case_format(), M::LowerCase);
    }

    #[test]
    fn test_nested_group_geometry() {
        let mut state = EmitterState::new();
        state.push_group(GroupKind::Map);
        state.set_indent(4, FmtScope::Global);
        state.push_group(GroupKind::Seq);
        let inner = state.current_group().unwrap();
        assert_eq!(inner.indent, 2);
        assert_eq!(inner.width, 4);
        assert!(!inner.flow);

        state.set_local_value(M::Flow);
        state.push_group(GroupKind::Map);
        state.clear_local_settings();
        state.push_group(GroupKind::Seq);
        // Children of a flow group are flow.
        assert!(state.in_flow());
        assert_eq!(state.depth(), 4);
    }

    #[test]
    fn test_first_error_sticks() {
        let mut state = EmitterState::new();
        state.set_error(EmitError::UnexpectedEndSeq);
        state.set_error(EmitError::UnexpectedKey);
        assert!(!state.good());
        assert_eq!(state.error(), Some(&EmitError::UnexpectedEndSeq));
        assert!(!state.last_error().is_empty());
    }
}
