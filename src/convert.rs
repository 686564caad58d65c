//! Conversion between application values and nodes.
//!
//! Two traits make up the protocol:
//!
//! - [`Encode`]: turns a value into a standalone [`Document`]. The document
//!   has its own arena, which the receiving tree merges in when the value is
//!   attached.
//! - [`Convertible`]: adds [`decode`](Convertible::decode), which never fails
//!   loudly. A node of the wrong shape decodes to `None`.
//!
//! Map lookups go through [`NodeKey`], blanket-implemented for every
//! `Convertible + PartialEq` type: a stored key equals a probe when it decodes
//! to the probe's type and the decoded value compares equal.
//!
//! ```rust
//! use yaml_node::{Document, Convertible};
//!
//! let doc = Document::scalar("0x1F");
//! assert_eq!(doc.root().decode::<u8>(), Some(31));
//! assert_eq!(doc.root().decode::<bool>(), None);
//! ```
//!
//! Implementing the protocol for an application type:
//!
//! ```rust
//! use yaml_node::{Convertible, Document, Encode, NodeRef};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! impl Encode for Point {
//!     fn encode(&self) -> Document {
//!         let mut doc = Document::sequence();
//!         doc.root_mut().push(self.x).unwrap();
//!         doc.root_mut().push(self.y).unwrap();
//!         doc
//!     }
//! }
//!
//! impl Convertible for Point {
//!     fn decode(node: NodeRef<'_>) -> Option<Self> {
//!         if node.len() != 2 {
//!             return None;
//!         }
//!         Some(Point {
//!             x: node.get(0).ok()?.decode()?,
//!             y: node.get(1).ok()?.decode()?,
//!         })
//!     }
//! }
//!
//! let mut doc = Document::new();
//! doc.root_mut().insert(Point { x: 1, y: 2 }, "origin-ish").unwrap();
//! assert_eq!(doc.root().get(Point { x: 1, y: 2 }).unwrap().scalar(), Some("origin-ish"));
//! ```

use crate::node::{Document, NodeRef, NodeType};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use std::hash::Hash;

/// How a key addresses a sequence slot.
///
/// Signedness is carried in the tag so that a single lookup routine can
/// reject negative indices before treating the rest as unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Index {
    Unsigned(u64),
    Signed(i64),
    /// The key is not integral and never hits a sequence element.
    #[default]
    None,
}

impl Index {
    /// The 0-based position this index names, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_node::Index;
    ///
    /// assert_eq!(Index::Unsigned(3).position(), Some(3));
    /// assert_eq!(Index::Signed(-1).position(), None);
    /// assert_eq!(Index::Signed(2).position(), Some(2));
    /// assert_eq!(Index::None.position(), None);
    /// ```
    #[must_use]
    pub fn position(self) -> Option<usize> {
        match self {
            Index::Unsigned(i) => usize::try_from(i).ok(),
            Index::Signed(i) if i < 0 => None,
            Index::Signed(i) => Index::Unsigned(i as u64).position(),
            Index::None => None,
        }
    }
}

/// Encoding half of the conversion protocol.
pub trait Encode {
    /// Builds a standalone document holding this value.
    fn encode(&self) -> Document;

    /// How this value addresses a sequence element when used as a key.
    fn as_index(&self) -> Index {
        Index::None
    }
}

/// Full conversion protocol: [`Encode`] plus a non-throwing decode.
pub trait Convertible: Encode + Sized {
    /// Reads a value out of `node`; `None` on a kind mismatch or malformed
    /// content.
    fn decode(node: NodeRef<'_>) -> Option<Self>;
}

/// Anything usable as a lookup key.
pub trait NodeKey {
    fn index(&self) -> Index {
        Index::None
    }

    /// Whether the stored key `node` equals this key.
    fn matches(&self, node: NodeRef<'_>) -> bool;

    /// The node inserted when this key is missing.
    fn to_document(&self) -> Document;
}

impl<T: Convertible + PartialEq> NodeKey for T {
    fn index(&self) -> Index {
        self.as_index()
    }

    fn matches(&self, node: NodeRef<'_>) -> bool {
        T::decode(node).is_some_and(|decoded| decoded == *self)
    }

    fn to_document(&self) -> Document {
        self.encode()
    }
}

impl NodeKey for &str {
    fn matches(&self, node: NodeRef<'_>) -> bool {
        node.scalar() == Some(*self)
    }

    fn to_document(&self) -> Document {
        Document::scalar(*self)
    }
}

impl NodeKey for &String {
    fn matches(&self, node: NodeRef<'_>) -> bool {
        node.scalar() == Some(self.as_str())
    }

    fn to_document(&self) -> Document {
        Document::scalar(self.as_str())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self) -> Document {
        (**self).encode()
    }

    fn as_index(&self) -> Index {
        (**self).as_index()
    }
}

/// The null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Null;

pub(crate) fn is_null_literal(text: &str) -> bool {
    matches!(text, "~" | "null" | "Null" | "NULL" | "")
}

/// `true` for a Null node or a scalar spelled as a null literal.
pub(crate) fn is_null_like(node: NodeRef<'_>) -> bool {
    match node.kind() {
        NodeType::Null => true,
        NodeType::Scalar => node.scalar().is_some_and(is_null_literal),
        _ => false,
    }
}

impl Encode for Null {
    fn encode(&self) -> Document {
        Document::null()
    }
}

impl Convertible for Null {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        is_null_like(node).then_some(Null)
    }
}

// ----------------------------------------------------------------------------
// Scalars
// ----------------------------------------------------------------------------

impl Encode for str {
    fn encode(&self) -> Document {
        Document::scalar(self)
    }
}

impl Encode for String {
    fn encode(&self) -> Document {
        Document::scalar(self.as_str())
    }
}

impl Convertible for String {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        node.scalar().map(str::to_string)
    }
}

impl Encode for char {
    fn encode(&self) -> Document {
        Document::scalar(self.to_string())
    }
}

impl Convertible for char {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        let mut chars = node.scalar()?.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

impl Encode for bool {
    fn encode(&self) -> Document {
        Document::scalar(if *self { "true" } else { "false" })
    }
}

impl Convertible for bool {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        parse_bool(node.scalar()?)
    }
}

/// Accepts `y/n`, `yes/no`, `true/false` and `on/off` written all lower case,
/// all upper case, or capitalised.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    const NAMES: [(&str, &str); 4] = [("y", "n"), ("yes", "no"), ("true", "false"), ("on", "off")];

    if !is_flexible_case(text) {
        return None;
    }
    let lower = text.to_ascii_lowercase();
    NAMES.iter().find_map(|&(yes, no)| {
        if lower == yes {
            Some(true)
        } else if lower == no {
            Some(false)
        } else {
            None
        }
    })
}

fn is_flexible_case(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    let rest = chars.as_str();
    let rest_lower = rest.chars().all(|c| !c.is_ascii_uppercase());
    let rest_upper = rest.chars().all(|c| !c.is_ascii_lowercase());
    if first.is_ascii_uppercase() {
        rest_lower || rest_upper
    } else {
        rest_lower
    }
}

/// Parses decimal, `0x` hexadecimal and `0o` octal integers with an
/// optional sign.
pub(crate) fn parse_integer(text: &str) -> Option<i128> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        radix_digits(hex, 16)?
    } else if let Some(oct) = digits.strip_prefix("0o") {
        radix_digits(oct, 8)?
    } else {
        radix_digits(digits, 10)?
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn radix_digits(digits: &str, radix: u32) -> Option<i128> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i128::from_str_radix(digits, radix).ok()
}

pub(crate) fn parse_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ => {
            let numeric = !text.is_empty()
                && text
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
            if numeric {
                text.parse().ok()
            } else {
                None
            }
        }
    }
}

pub(crate) fn float_text(value: f64) -> String {
    if value.is_nan() {
        ".nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else {
        value.to_string()
    }
}

macro_rules! convertible_signed {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self) -> Document {
                Document::scalar(self.to_string())
            }

            fn as_index(&self) -> Index {
                Index::Signed(*self as i64)
            }
        }

        impl Convertible for $ty {
            fn decode(node: NodeRef<'_>) -> Option<Self> {
                parse_integer(node.scalar()?).and_then(|value| <$ty>::try_from(value).ok())
            }
        }
    )*};
}

macro_rules! convertible_unsigned {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self) -> Document {
                Document::scalar(self.to_string())
            }

            fn as_index(&self) -> Index {
                Index::Unsigned(*self as u64)
            }
        }

        impl Convertible for $ty {
            fn decode(node: NodeRef<'_>) -> Option<Self> {
                parse_integer(node.scalar()?).and_then(|value| <$ty>::try_from(value).ok())
            }
        }
    )*};
}

convertible_signed!(i8, i16, i32, i64, isize);
convertible_unsigned!(u8, u16, u32, u64, usize);

macro_rules! convertible_float {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self) -> Document {
                if self.is_finite() {
                    Document::scalar(self.to_string())
                } else {
                    Document::scalar(float_text(f64::from(*self)))
                }
            }
        }

        impl Convertible for $ty {
            fn decode(node: NodeRef<'_>) -> Option<Self> {
                parse_float(node.scalar()?).map(|value| value as $ty)
            }
        }
    )*};
}

convertible_float!(f32, f64);

impl Encode for DateTime<Utc> {
    fn encode(&self) -> Document {
        Document::scalar(self.to_rfc3339())
    }
}

impl Convertible for DateTime<Utc> {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        DateTime::parse_from_rfc3339(node.scalar()?)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }
}

impl Encode for BigInt {
    fn encode(&self) -> Document {
        Document::scalar(self.to_string())
    }
}

impl Convertible for BigInt {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        node.scalar()?.parse().ok()
    }
}

// ----------------------------------------------------------------------------
// Containers
// ----------------------------------------------------------------------------

impl<T: Encode> Encode for Option<T> {
    fn encode(&self) -> Document {
        match self {
            Some(value) => value.encode(),
            None => Document::null(),
        }
    }
}

impl<T: Convertible> Convertible for Option<T> {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        if is_null_like(node) {
            return Some(None);
        }
        T::decode(node).map(Some)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self) -> Document {
        let mut doc = Document::sequence();
        let children = self.iter().map(|item| doc.adopt(item.encode())).collect();
        let root = doc.root_id();
        doc.set_sequence(root, children);
        doc
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self) -> Document {
        self.as_slice().encode()
    }
}

impl<T: Convertible> Convertible for Vec<T> {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        if !node.is_sequence() {
            return None;
        }
        node.iter()
            .map(|entry| entry.node().and_then(|child| T::decode(*child)))
            .collect()
    }
}

impl<K: Encode, V: Encode> Encode for IndexMap<K, V> {
    fn encode(&self) -> Document {
        let mut doc = Document::map();
        let pairs = self
            .iter()
            .map(|(key, value)| (doc.adopt(key.encode()), doc.adopt(value.encode())))
            .collect();
        let root = doc.root_id();
        doc.set_map(root, pairs);
        doc
    }
}

impl<K, V> Convertible for IndexMap<K, V>
where
    K: Convertible + Hash + Eq,
    V: Convertible,
{
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        if !node.is_map() {
            return None;
        }
        node.iter()
            .map(|entry| {
                let (key, value) = entry.pair()?;
                Some((K::decode(*key)?, V::decode(*value)?))
            })
            .collect()
    }
}

impl Encode for Document {
    fn encode(&self) -> Document {
        Document::from_subtree(self.root())
    }
}

impl Convertible for Document {
    fn decode(node: NodeRef<'_>) -> Option<Self> {
        Some(Document::from_subtree(node))
    }
}

impl Encode for NodeRef<'_> {
    fn encode(&self) -> Document {
        Document::from_subtree(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_text<T: Convertible>(text: &str) -> Option<T> {
        Document::scalar(text).root().decode()
    }

    #[test]
    fn test_index_policy() {
        assert_eq!(3u8.as_index(), Index::Unsigned(3));
        assert_eq!((-3i32).as_index(), Index::Signed(-3));
        assert_eq!("3".encode().root().scalar(), Some("3"));
        assert_eq!(true.as_index(), Index::None);
        assert_eq!(1.5f64.as_index(), Index::None);
    }

    #[test]
    fn test_integer_decoding() {
        assert_eq!(decode_text::<i32>("42"), Some(42));
        assert_eq!(decode_text::<i32>("-42"), Some(-42));
        assert_eq!(decode_text::<i32>("+7"), Some(7));
        assert_eq!(decode_text::<u16>("0xff"), Some(255));
        assert_eq!(decode_text::<u16>("0o17"), Some(15));
        assert_eq!(decode_text::<u8>("256"), None);
        assert_eq!(decode_text::<u8>("-1"), None);
        assert_eq!(decode_text::<i32>("4x"), None);
        assert_eq!(decode_text::<i32>(""), None);
        assert_eq!(decode_text::<i32>("0x-5"), None);
    }

    #[test]
    fn test_bool_decoding() {
        for text in ["y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON"] {
            assert_eq!(decode_text::<bool>(text), Some(true), "{}", text);
        }
        for text in ["n", "no", "No", "false", "FALSE", "off", "Off"] {
            assert_eq!(decode_text::<bool>(text), Some(false), "{}", text);
        }
        assert_eq!(decode_text::<bool>("tRUE"), None);
        assert_eq!(decode_text::<bool>("1"), None);
    }

    #[test]
    fn test_float_decoding() {
        assert_eq!(decode_text::<f64>("3.5"), Some(3.5));
        assert_eq!(decode_text::<f64>("1e3"), Some(1000.0));
        assert_eq!(decode_text::<f64>(".inf"), Some(f64::INFINITY));
        assert_eq!(decode_text::<f64>("-.INF"), Some(f64::NEG_INFINITY));
        assert!(decode_text::<f64>(".nan").is_some_and(f64::is_nan));
        assert_eq!(decode_text::<f64>("nan"), None);
        assert_eq!(decode_text::<f64>("abc"), None);
        assert_eq!(f64::NEG_INFINITY.encode().root().scalar(), Some("-.inf"));
    }

    #[test]
    fn test_f32_encodes_shortest_text() {
        assert_eq!(0.1f32.encode().root().scalar(), Some("0.1"));
        assert_eq!(2.5f32.encode().root().scalar(), Some("2.5"));
        assert_eq!(f32::NAN.encode().root().scalar(), Some(".nan"));
        assert_eq!(decode_text::<f32>("0.1"), Some(0.1f32));
    }

    #[test]
    fn test_string_and_char() {
        assert_eq!(decode_text::<String>("hello"), Some("hello".to_string()));
        assert_eq!(decode_text::<char>("x"), Some('x'));
        assert_eq!(decode_text::<char>("xy"), None);
        assert_eq!(Document::null().root().decode::<String>(), None);
    }

    #[test]
    fn test_null_and_option() {
        assert_eq!(decode_text::<Null>("~"), Some(Null));
        assert_eq!(Document::null().root().decode::<Null>(), Some(Null));
        assert_eq!(decode_text::<Null>("x"), None);
        assert_eq!(decode_text::<Option<i32>>("null"), Some(None));
        assert_eq!(decode_text::<Option<i32>>("5"), Some(Some(5)));
        assert!(None::<i32>.encode().root().is_null());
    }

    #[test]
    fn test_vec_roundtrip() {
        let doc = vec![1, 2, 3].encode();
        assert!(doc.root().is_sequence());
        assert_eq!(doc.root().decode::<Vec<i32>>(), Some(vec![1, 2, 3]));
        assert_eq!(doc.root().decode::<Vec<bool>>(), None);
        assert_eq!(Document::scalar("1").root().decode::<Vec<i32>>(), None);
    }

    #[test]
    fn test_indexmap_roundtrip() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), 2);
        map.insert("a".to_string(), 1);
        let doc = map.encode();
        assert!(doc.root().is_map());
        let back: IndexMap<String, i32> = doc.root().decode().unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_date_and_bigint() {
        let date = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(date.encode().root().decode::<DateTime<Utc>>(), Some(date));

        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(big.encode().root().decode::<BigInt>(), Some(big));
        assert_eq!(decode_text::<BigInt>("12a"), None);
    }

    #[test]
    fn test_key_matching() {
        let doc = Document::scalar("10");
        assert!(10u32.matches(doc.root()));
        assert!(10i8.matches(doc.root()));
        assert!(NodeKey::matches(&"10", doc.root()));
        assert!(!11u32.matches(doc.root()));
        assert!(!true.matches(doc.root()));
    }
}
