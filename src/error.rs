//! Error types for node access, conversion, and emission.
//!
//! Two families of failure exist in this crate:
//!
//! - [`Error`]: returned through `Result` by node operations and the serde
//!   bridge. Indexing a scalar node is the only failure a plain read can
//!   produce ([`Error::BadSubscript`]).
//! - [`EmitError`]: recorded by an [`Emitter`](crate::Emitter) when the caller
//!   breaks the manipulator protocol. The emitter keeps the first one it sees
//!   and ignores every call after that.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_node::{Document, Error};
//!
//! let doc = Document::scalar("plain");
//! let err = doc.root().get("key").unwrap_err();
//! assert!(matches!(err, Error::BadSubscript { .. }));
//! ```

use crate::memory::NodeId;
use crate::node::NodeType;
use std::fmt;
use thiserror::Error;

/// Represents all errors a node operation or serde conversion can return.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Attempted to index into a scalar node.
    #[error("operator[] call on a scalar (node is {kind:?})")]
    BadSubscript { kind: NodeType },

    /// Attempted to append to a node that is not sequence-like.
    #[error("appending to a non-sequence (node is {kind:?})")]
    BadPushback { kind: NodeType },

    /// A node id that was not allocated by this document's arena.
    #[error("node {id:?} does not belong to this document")]
    UnknownNode { id: NodeId },

    /// Linking the node would make it its own descendant.
    #[error("node {id:?} would become its own descendant")]
    Cycle { id: NodeId },

    /// A node could not be decoded into the requested type.
    #[error("bad conversion: node cannot be read as {expected}")]
    BadConversion { expected: String },

    /// The emitter rejected the manipulator sequence.
    #[error("emitter error: {0}")]
    Emit(#[from] EmitError),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates the error produced when a scalar is indexed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_node::{Error, NodeType};
    ///
    /// let err = Error::bad_subscript(NodeType::Scalar);
    /// assert!(err.to_string().contains("scalar"));
    /// ```
    pub fn bad_subscript(kind: NodeType) -> Self {
        Error::BadSubscript { kind }
    }

    /// Creates the error produced when appending to a scalar or a map.
    pub fn bad_pushback(kind: NodeType) -> Self {
        Error::BadPushback { kind }
    }

    /// Creates a conversion error naming the type that was expected.
    pub fn bad_conversion(expected: &str) -> Self {
        Error::BadConversion {
            expected: expected.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_node::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// A protocol violation detected by the emitter.
///
/// The `Display` text is what [`Emitter::last_error`](crate::Emitter::last_error)
/// reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("unexpected key token")]
    UnexpectedKey,

    #[error("unexpected value token")]
    UnexpectedValue,

    #[error("expected key token")]
    ExpectedKey,

    #[error("expected value token")]
    ExpectedValue,

    #[error("unmatched group tag")]
    UnmatchedGroupTag,

    #[error("unexpected end sequence token")]
    UnexpectedEndSeq,

    #[error("unexpected end map token")]
    UnexpectedEndMap,

    #[error("unexpected begin document token inside an open group")]
    UnexpectedBeginDoc,

    #[error("unexpected end document token inside an open group")]
    UnexpectedEndDoc,

    #[error("invalid anchor")]
    InvalidAnchor,

    #[error("invalid alias")]
    InvalidAlias,

    #[error("invalid tag")]
    InvalidTag,

    #[error("a node may carry only one {0}")]
    DuplicateProperty(&'static str),

    #[error("anchor or tag is not followed by any content")]
    DanglingProperty,
}

pub type Result<T> = std::result::Result<T, Error>;
