//! Property-based tests for the node model, the emitter settings, and the
//! serde bridge.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use yaml_node::EmitterManip::{self, *};
use yaml_node::{from_node, to_node, Document, Emitter, NodeType};

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_node(value) {
        Ok(doc) => match from_node::<T>(doc.root()) {
            Ok(back) => *value == back,
            Err(e) => {
                eprintln!("from_node failed: {}", e);
                eprintln!("tree was: {}", doc.root());
                false
            }
        },
        Err(e) => {
            eprintln!("to_node failed: {}", e);
            false
        }
    }
}

fn bool_format() -> impl Strategy<Value = EmitterManip> {
    prop_oneof![Just(TrueFalseBool), Just(YesNoBool), Just(OnOffBool)]
}

fn bool_case() -> impl Strategy<Value = EmitterManip> {
    prop_oneof![Just(UpperCase), Just(LowerCase), Just(CamelCase)]
}

fn bool_length() -> impl Strategy<Value = EmitterManip> {
    prop_oneof![Just(LongBool), Just(ShortBool)]
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_tuple(t in (any::<i32>(), any::<bool>(), "[a-z]{0,8}")) {
        prop_assert!(roundtrip(&t));
    }

    #[test]
    fn prop_any_string(s in ".{0,24}") {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_sequence_index_policy(len in 0usize..8, probe in 0usize..16) {
        let mut doc = Document::sequence();
        for i in 0..len {
            doc.root_mut().push(i).unwrap();
        }
        let found = doc.root().get(probe).unwrap();
        if probe < len {
            prop_assert_eq!(found.decode::<usize>(), Some(probe));
        } else {
            prop_assert!(!found.is_defined());
        }
        prop_assert_eq!(doc.root().len(), len);
    }

    #[test]
    fn prop_write_at_len_appends_beyond_promotes(len in 0usize..6, extra in 0usize..3) {
        let mut doc = Document::sequence();
        for i in 0..len {
            doc.root_mut().push(i).unwrap();
        }
        doc.root_mut().get_mut(len + extra).unwrap().set("new");

        let root = doc.root();
        if extra == 0 {
            prop_assert_eq!(root.kind(), NodeType::Sequence);
            prop_assert_eq!(root.len(), len + 1);
        } else {
            prop_assert_eq!(root.kind(), NodeType::Map);
        }
        prop_assert_eq!(root.get(len + extra).unwrap().scalar(), Some("new"));
    }

    #[test]
    fn prop_insert_same_key_keeps_size(
        keys in prop::collection::vec("[a-e]", 1..12),
    ) {
        let mut doc = Document::map();
        for (i, key) in keys.iter().enumerate() {
            doc.root_mut().insert(key.as_str(), i).unwrap();
        }
        let mut distinct = keys.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(doc.root().len(), distinct.len());

        for key in &distinct {
            let last = keys.iter().rposition(|k| k == key).unwrap();
            prop_assert_eq!(doc.root().get(key.as_str()).unwrap().decode::<usize>(), Some(last));
        }
    }

    #[test]
    fn prop_emitted_bool_reads_back(
        value in any::<bool>(),
        format in bool_format(),
        case in bool_case(),
        length in bool_length(),
    ) {
        let mut out = Emitter::new();
        out.emit(format).emit(case).emit(length).emit(value);
        prop_assert!(out.good());

        let text = out.as_str();
        if length == ShortBool {
            prop_assert_eq!(text.chars().count(), 1);
        }
        prop_assert_eq!(Document::scalar(text).root().decode::<bool>(), Some(value));
    }
}
