use yaml_node::EmitterManip::*;
use yaml_node::{
    to_string, to_string_with_options, yaml, Document, EmitError, Emitter, EmitterOptions,
    EmitterState, FmtScope, GroupKind, Indent, Null,
};

#[test]
fn test_balanced_map_is_good() {
    let mut out = Emitter::new();
    out.emit(BeginMap)
        .emit(Key)
        .emit("a")
        .emit(Value)
        .emit(1)
        .emit(EndMap);
    assert!(out.good());
    assert!(out.last_error().is_empty());
    assert_eq!(out.as_str(), "a: 1");
}

#[test]
fn test_value_without_key_is_sticky() {
    let mut out = Emitter::new();
    out.emit(BeginMap).emit(1);
    assert!(!out.good());
    assert!(!out.last_error().is_empty());

    let size = out.size();
    let message = out.last_error();
    out.emit(Key)
        .emit("a")
        .emit(Value)
        .emit("b")
        .emit(EndMap)
        .emit(BeginSeq)
        .emit(true)
        .emit(Null);
    assert_eq!(out.size(), size);
    assert_eq!(out.last_error(), message);
}

#[test]
fn test_unbalanced_end_tokens() {
    let mut out = Emitter::new();
    out.emit(BeginSeq).emit(EndSeq).emit(EndSeq);
    assert_eq!(out.error(), Some(&EmitError::UnexpectedEndSeq));

    let mut out = Emitter::new();
    out.emit(EndMap);
    assert_eq!(out.error(), Some(&EmitError::UnexpectedEndMap));
}

#[test]
fn test_bool_spelling_combinations() {
    let mut state = EmitterState::new();
    assert!(state.set_bool_format(OnOffBool, FmtScope::Global));
    assert!(state.set_bool_case_format(UpperCase, FmtScope::Global));
    assert_eq!(state.bool_name(true), "ON");
    assert_eq!(state.bool_name(false), "OFF");

    assert!(state.set_bool_format(YesNoBool, FmtScope::Global));
    assert!(state.set_bool_case_format(CamelCase, FmtScope::Global));
    assert_eq!(state.bool_name(false), "No");

    // short length spells yes/no words; the writer keeps the first letter
    assert!(state.set_bool_length_format(ShortBool, FmtScope::Global));
    assert!(state.set_bool_format(OnOffBool, FmtScope::Global));
    assert_eq!(state.bool_name(true), "Yes");

    let mut out = Emitter::new();
    out.emit(BeginSeq)
        .emit(ShortBool)
        .emit(true)
        .emit(ShortBool)
        .emit(UpperCase)
        .emit(false)
        .emit(EndSeq);
    assert_eq!(out.as_str(), "- y\n- N");
}

#[test]
fn test_setters_reject_foreign_values() {
    let mut state = EmitterState::new();
    assert!(!state.set_bool_format(Hex, FmtScope::Global));
    assert_eq!(state.bool_format(), TrueFalseBool);
    assert!(!state.set_int_format(Flow, FmtScope::Global));
    assert_eq!(state.int_format(), Dec);
    assert!(!state.set_indent(1, FmtScope::Global));
    assert!(!state.set_indent(10, FmtScope::Global));
    assert_eq!(state.indent(), 2);
    assert!(!state.set_double_precision(18, FmtScope::Global));
    assert!(state.set_flow_type(GroupKind::Seq, Flow, FmtScope::Global));
    assert_eq!(state.flow_type(GroupKind::Seq), Flow);
    assert_eq!(state.flow_type(GroupKind::Map), Block);
}

#[test]
fn test_local_scope_reverts_after_one_value() {
    let mut state = EmitterState::new();
    assert!(state.set_int_format(Hex, FmtScope::Local));
    assert_eq!(state.int_format(), Hex);
    state.clear_local_settings();
    assert_eq!(state.int_format(), Dec);

    let mut out = Emitter::new();
    out.emit(BeginSeq)
        .emit(UpperCase)
        .emit(true)
        .emit(true)
        .emit(EndSeq);
    assert_eq!(out.as_str(), "- TRUE\n- true");
}

#[test]
fn test_global_settings_persist() {
    let mut out = Emitter::new();
    assert!(out.set_bool_format(OnOffBool));
    assert!(out.set_int_base(Oct));
    out.emit(BeginSeq).emit(false).emit(8).emit(9).emit(EndSeq);
    assert_eq!(out.as_str(), "- off\n- 0o10\n- 0o11");
}

#[test]
fn test_local_indent_applies_to_next_group() {
    let mut out = Emitter::new();
    out.emit(BeginMap)
        .emit(Key)
        .emit("a")
        .emit(Value)
        .emit(Indent(4))
        .emit(BeginMap)
        .emit(Key)
        .emit("b")
        .emit(Value)
        .emit(BeginMap)
        .emit(Key)
        .emit("c")
        .emit(Value)
        .emit(1)
        .emit(EndMap)
        .emit(EndMap)
        .emit(Key)
        .emit("d")
        .emit(Value)
        .emit(BeginMap)
        .emit(Key)
        .emit("e")
        .emit(Value)
        .emit(2)
        .emit(EndMap)
        .emit(EndMap);
    assert!(out.good(), "{}", out.last_error());
    assert_eq!(out.as_str(), "a:\n  b:\n      c: 1\nd:\n  e: 2");
}

#[test]
fn test_options_apply_as_globals() {
    let options = EmitterOptions::new()
        .with_bool_format(YesNoBool)
        .with_int_base(Hex);
    let mut out = Emitter::with_options(options);
    out.emit(Flow)
        .emit(BeginSeq)
        .emit(true)
        .emit(31)
        .emit(EndSeq);
    assert_eq!(out.as_str(), "[yes, 0x1f]");
}

#[test]
fn test_rejected_options_keep_defaults() {
    let options = EmitterOptions::new().with_indent(42);
    let out = Emitter::with_options(options);
    assert_eq!(out.state().indent(), 2);
}

#[test]
fn test_tree_emission_block() {
    let doc = yaml!({
        "name": "demo",
        "ports": [80, 443],
        "limits": { "cpu": 2, "mem": null }
    });
    assert_eq!(
        to_string(doc.root()).unwrap(),
        "name: demo\nports:\n  - 80\n  - 443\nlimits:\n  cpu: 2\n  mem: ~"
    );
}

#[test]
fn test_tree_emission_flow() {
    let doc = yaml!({ "ports": [80, 443], "empty": [] });
    assert_eq!(
        to_string_with_options(doc.root(), EmitterOptions::flow()).unwrap(),
        "{ports: [80, 443], empty: []}"
    );
}

#[test]
fn test_undefined_tree_emits_null() {
    let doc = Document::new();
    assert_eq!(to_string(doc.root()).unwrap(), "~");
}

#[test]
fn test_tagged_node_emission() {
    let mut doc = Document::scalar("3");
    doc.root_mut().set_tag("!!str");
    assert_eq!(to_string(doc.root()).unwrap(), "!!str 3");
}
