//! # yaml_node
//!
//! An in-memory YAML document model and a stateful YAML text emitter.
//!
//! ## Key Features
//!
//! - **Arena-backed tree**: every [`Document`] owns its nodes in one
//!   [`Memory`] arena; handles are cheap ids, and subtrees can be shared
//! - **Auto-vivification**: writing through a missing key or index builds the
//!   structure on the fly, while reads never modify the tree
//! - **Open conversion protocol**: any type implementing [`Encode`] and
//!   [`Convertible`] can be stored, read back, and used as a map key
//! - **One iterator for both containers**: [`NodeIter`] yields elements of a
//!   sequence or entries of a map behind the same interface
//! - **Manipulator-driven emitter**: [`Emitter`] turns a stream of tokens and
//!   values into block or flow YAML, with scoped formatting settings and a
//!   sticky error state
//! - **Serde bridge**: [`to_node`] and [`from_node`] move any
//!   `Serialize`/`Deserialize` type in and out of the tree
//!
//! ## Quick Start
//!
//! ```rust
//! use yaml_node::{to_string, Document};
//!
//! let mut doc = Document::new();
//! doc.root_mut().get_mut("name").unwrap().set("Alice");
//! doc.root_mut().get_mut("langs").unwrap().push("rust").unwrap();
//! doc.root_mut().get_mut("langs").unwrap().push("c").unwrap();
//!
//! assert_eq!(to_string(doc.root()).unwrap(), "name: Alice\nlangs:\n  - rust\n  - c");
//! ```
//!
//! ### Serde types
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use yaml_node::{from_node, to_node, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let doc = to_node(&user).unwrap();
//! assert_eq!(to_string(doc.root()).unwrap(), "id: 123\nname: Alice\nactive: true");
//!
//! let back: User = from_node(doc.root()).unwrap();
//! assert_eq!(back, user);
//! ```
//!
//! ### Driving the emitter directly
//!
//! ```rust
//! use yaml_node::{Emitter, EmitterManip::*};
//!
//! let mut out = Emitter::new();
//! out.emit(BeginSeq)
//!     .emit(YesNoBool).emit(true)
//!     .emit(Hex).emit(255)
//!     .emit(EndSeq);
//! assert_eq!(out.as_str(), "- yes\n- 0xff");
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Emission never panics on a bad token sequence; the emitter records the
//!   first error and ignores the rest of the stream

pub mod convert;
pub mod de;
pub mod emitter;
pub mod emitter_state;
pub mod error;
pub mod iterator;
pub mod macros;
pub mod memory;
pub mod node;
pub mod options;
pub mod ser;
mod writer;

pub use convert::{Convertible, Encode, Index, NodeKey, Null};
pub use de::{from_node, NodeDeserializer};
pub use emitter::{Alias, Anchor, Binary, Comment, Emit, Emitter, Indent, Precision, Tag, TagKind};
pub use emitter_state::{EmitterState, FmtScope, GroupKind, Setting};
pub use error::{EmitError, Error, Result};
pub use iterator::{IterPosition, IterValue, NodeIter, NodeIterMut};
pub use memory::{Memory, NodeId};
pub use node::{Document, NodeData, NodeMut, NodeRef, NodeType, NodeValue};
pub use options::{EmitterManip, EmitterOptions};
pub use ser::{to_node, NodeSerializer};

/// Renders the subtree under `node` as YAML text with default settings.
///
/// # Examples
///
/// ```rust
/// use yaml_node::{to_string, yaml};
///
/// let doc = yaml!({ "a": [1, 2] });
/// assert_eq!(to_string(doc.root()).unwrap(), "a:\n  - 1\n  - 2");
/// ```
///
/// # Errors
///
/// Returns [`Error::Emit`] if the emitter rejects the tree, for instance an
/// anchor or tag that is not well formed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(node: NodeRef<'_>) -> Result<String> {
    to_string_with_options(node, EmitterOptions::default())
}

/// Renders the subtree under `node` with the given global settings.
///
/// # Examples
///
/// ```rust
/// use yaml_node::{to_string_with_options, yaml, EmitterOptions};
///
/// let doc = yaml!({ "a": [1, 2] });
/// let text = to_string_with_options(doc.root(), EmitterOptions::flow()).unwrap();
/// assert_eq!(text, "{a: [1, 2]}");
/// ```
///
/// # Errors
///
/// Returns [`Error::Emit`] if the emitter ends in a bad state.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(node: NodeRef<'_>, options: EmitterOptions) -> Result<String> {
    let mut out = Emitter::with_options(options);
    out.emit(node);
    match out.error() {
        Some(err) => Err(Error::Emit(err.clone())),
        None => Ok(out.into_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let doc = to_node(&point).unwrap();
        assert_eq!(to_string(doc.root()).unwrap(), "x: 1\ny: 2");
        let back: Point = from_node(doc.root()).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_user_block_and_flow() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };
        let doc = to_node(&user).unwrap();

        let block = to_string(doc.root()).unwrap();
        assert_eq!(
            block,
            "id: 123\nname: Alice\nactive: true\ntags:\n  - admin\n  - user"
        );

        let flow = to_string_with_options(doc.root(), EmitterOptions::flow()).unwrap();
        assert_eq!(
            flow,
            "{id: 123, name: Alice, active: true, tags: [admin, user]}"
        );
    }

    #[test]
    fn test_bad_tag_is_reported() {
        let mut doc = Document::scalar("x");
        doc.root_mut().set_tag("!bad tag");
        let err = to_string(doc.root()).unwrap_err();
        assert!(matches!(err, Error::Emit(EmitError::InvalidTag)));
    }

    #[test]
    fn test_display_matches_to_string() {
        let doc = yaml!([1, [2, 3]]);
        assert_eq!(doc.root().to_string(), to_string(doc.root()).unwrap());
    }
}
