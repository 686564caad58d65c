/// Builds a [`Document`](crate::Document) from a JSON-like literal.
///
/// Arrays become sequences and objects become maps in the order written.
/// Any other expression is encoded through its
/// [`Encode`](crate::Encode) implementation.
///
/// ```rust
/// use yaml_node::{yaml, NodeType};
///
/// let doc = yaml!({
///     "name": "Alice",
///     "langs": ["rust", "c"],
///     "manager": null
/// });
/// assert_eq!(doc.root().get("langs").unwrap().len(), 2);
/// assert_eq!(doc.root().get("manager").unwrap().kind(), NodeType::Null);
/// ```
#[macro_export]
macro_rules! yaml {
    (null) => {
        $crate::Document::null()
    };

    (true) => {
        $crate::Document::from_value(&true)
    };

    (false) => {
        $crate::Document::from_value(&false)
    };

    ([]) => {
        $crate::Document::sequence()
    };

    ([ $($elem:tt),+ $(,)? ]) => {{
        let mut doc = $crate::Document::sequence();
        let root = doc.root_id();
        $(
            let child = doc.adopt($crate::yaml!($elem));
            let _ = doc.append_sequence_child(root, child);
        )+
        doc
    }};

    ({}) => {
        $crate::Document::map()
    };

    ({ $($key:literal : $value:tt),+ $(,)? }) => {{
        let mut doc = $crate::Document::map();
        let root = doc.root_id();
        $(
            let key = doc.adopt($crate::Document::from_value(&$key));
            let value = doc.adopt($crate::yaml!($value));
            let _ = doc.insert_map_pair(root, key, value);
        )+
        doc
    }};

    ($other:expr) => {
        $crate::Document::from_value(&$other)
    };
}
