use yaml_node::{yaml, Document, IterPosition, IterValue, NodeIter, NodeRef};

fn describe(node: NodeRef<'_>) -> Vec<String> {
    node.iter()
        .map(|entry| match entry {
            IterValue::Node(n) => n.scalar().unwrap_or("?").to_string(),
            IterValue::Pair { key, value } => format!(
                "{}={}",
                key.scalar().unwrap_or("?"),
                value.scalar().unwrap_or("?")
            ),
            IterValue::Empty => "empty".to_string(),
        })
        .collect()
}

#[test]
fn test_sequence_yields_single_nodes_in_order() {
    let doc = yaml!(["a", "b", "c"]);
    assert_eq!(describe(doc.root()), vec!["a", "b", "c"]);
}

#[test]
fn test_map_yields_pairs_in_insertion_order() {
    let mut doc = Document::new();
    doc.root_mut().insert("k2", "v2").unwrap();
    doc.root_mut().insert("k1", "v1").unwrap();
    assert_eq!(describe(doc.root()), vec!["k2=v2", "k1=v1"]);
}

#[test]
fn test_undefined_is_immediately_at_end() {
    let doc = Document::new();
    let it = doc.root().begin();
    assert!(it.at_end());
    assert_eq!(it, doc.root().end());
    assert_eq!(it.position(), IterPosition::None);

    let missing = doc.root().get("nothing").unwrap();
    assert_eq!(missing.iter().count(), 0);
}

#[test]
fn test_generic_child_walk() {
    fn count_leaves(node: NodeRef<'_>) -> usize {
        if node.is_scalar() {
            return 1;
        }
        node.iter()
            .filter_map(|entry| entry.value().copied())
            .map(count_leaves)
            .sum()
    }

    let doc = yaml!({ "a": [1, 2, { "b": 3 }], "c": 4 });
    assert_eq!(count_leaves(doc.root()), 4);
}

#[test]
fn test_cursor_walk_matches_iterator() {
    let doc = yaml!([10, 20, 30]);
    let root = doc.root();

    let mut cursor: NodeIter<'_> = root.begin();
    let mut seen = Vec::new();
    while cursor != root.end() {
        seen.push(cursor.get().node().and_then(|n| n.decode::<i32>()));
        cursor.advance();
    }
    assert_eq!(seen, vec![Some(10), Some(20), Some(30)]);
    assert!(cursor.get().is_empty());
}

#[test]
fn test_mutable_iteration_rewrites_values() {
    let mut doc = yaml!(["a", "b"]);
    {
        let mut root = doc.root_mut();
        let mut it = root.begin();
        while !it.at_end() {
            let upper = it
                .get()
                .node()
                .and_then(|n| n.scalar())
                .map(str::to_uppercase);
            if let (Some(mut node), Some(upper)) = (it.value_mut(), upper) {
                node.set(upper);
            }
            it.advance();
        }
    }
    assert_eq!(describe(doc.root()), vec!["A", "B"]);
}

#[test]
fn test_for_loop_over_node_ref() {
    let doc = yaml!({ "x": 1, "y": 2 });
    let mut keys = Vec::new();
    for entry in doc.root() {
        if let Some(key) = entry.key() {
            keys.push(key.scalar().unwrap_or_default().to_string());
        }
    }
    assert_eq!(keys, vec!["x", "y"]);
}
