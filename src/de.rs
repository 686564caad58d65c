//! Serde deserialization out of the node model.
//!
//! [`from_node`] reads any `Deserialize` type from a [`NodeRef`]. Typed
//! requests (`bool`, `u16`, `String`, ...) decode the scalar the same way
//! [`NodeRef::decode`] does, so `yes`, `On` and `0x1F` are all accepted where a
//! bool or an integer is asked for.
//!
//! Self-describing requests (`deserialize_any`, used by untagged enums and by
//! dynamic values such as `serde_json::Value`) resolve a plain scalar by its
//! spelling, in this order:
//!
//! | spelling                               | resolves to |
//! |----------------------------------------|-------------|
//! | empty, `~`, `null`, `Null`, `NULL`     | unit        |
//! | `true`, `True`, `TRUE` (and `false`)   | bool        |
//! | decimal, `0x` hex or `0o` octal digits | integer     |
//! | a float, `.inf`, `-.inf`, `.nan`       | float       |
//! | anything else                          | string      |
//!
//! A scalar tagged `!!str` is always a string, and one tagged `!!binary` is
//! base64 decoded into bytes.
//!
//! ```rust
//! use serde::Deserialize;
//! use yaml_node::{from_node, Document};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server { host: String, port: u16 }
//!
//! let mut doc = Document::new();
//! doc.root_mut().insert("host", "localhost").unwrap();
//! doc.root_mut().insert("port", 8080).unwrap();
//!
//! let server: Server = from_node(doc.root()).unwrap();
//! assert_eq!(server, Server { host: "localhost".into(), port: 8080 });
//! ```

use crate::convert::{is_null_literal, parse_bool, parse_float, parse_integer};
use crate::iterator::NodeIter;
use crate::{Error, NodeRef, NodeType, Result};
use base64::Engine;
use serde::de::{self, Error as _, Expected, IntoDeserializer, Unexpected, Visitor};
use serde::Deserialize;

/// Reads a `T` out of `node`.
///
/// # Errors
///
/// Fails when the shape or the content of the tree does not match `T`.
pub fn from_node<'de, T>(node: NodeRef<'de>) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(NodeDeserializer::new(node))
}

/// What a plain scalar means when nothing asks for a specific type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resolved<'a> {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(&'a str),
}

pub(crate) fn resolve_plain(text: &str) -> Resolved<'_> {
    if is_null_literal(text) {
        Resolved::Null
    } else if let Some(b) = core_bool(text) {
        Resolved::Bool(b)
    } else if let Some(i) = parse_integer(text) {
        Resolved::Int(i)
    } else if let Some(f) = parse_float(text) {
        Resolved::Float(f)
    } else {
        Resolved::Str(text)
    }
}

fn core_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn has_tag(node: NodeRef<'_>, short: &str) -> bool {
    node.tag().is_some_and(|tag| {
        tag.strip_prefix("!!")
            .or_else(|| tag.strip_prefix("tag:yaml.org,2002:"))
            == Some(short)
    })
}

fn unexpected(node: NodeRef<'_>) -> Unexpected<'_> {
    match node.kind() {
        NodeType::Undefined | NodeType::Null => Unexpected::Unit,
        NodeType::Scalar => Unexpected::Str(node.scalar().unwrap_or_default()),
        NodeType::Sequence => Unexpected::Seq,
        NodeType::Map => Unexpected::Map,
    }
}

fn scalar_text<'de>(node: NodeRef<'de>, expected: &dyn Expected) -> Result<&'de str> {
    node.scalar()
        .ok_or_else(|| Error::invalid_type(unexpected(node), expected))
}

fn decode_binary(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.split_whitespace().collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|err| Error::custom(format!("invalid !!binary scalar: {err}")))
}

fn visit_integer<'de, V: Visitor<'de>>(value: i128, text: &'de str, visitor: V) -> Result<V::Value> {
    if let Ok(v) = i64::try_from(value) {
        visitor.visit_i64(v)
    } else if let Ok(v) = u64::try_from(value) {
        visitor.visit_u64(v)
    } else {
        visitor.visit_borrowed_str(text)
    }
}

/// Deserializer over one node of a document.
#[derive(Clone, Copy, Debug)]
pub struct NodeDeserializer<'de> {
    node: NodeRef<'de>,
}

impl<'de> NodeDeserializer<'de> {
    #[must_use]
    pub fn new(node: NodeRef<'de>) -> Self {
        NodeDeserializer { node }
    }

    fn integer<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let text = scalar_text(self.node, &visitor)?;
        match parse_integer(text) {
            Some(value) => visit_integer(value, text, visitor),
            None => Err(Error::invalid_type(Unexpected::Str(text), &visitor)),
        }
    }

    fn float<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let text = scalar_text(self.node, &visitor)?;
        match parse_float(text) {
            Some(value) => visitor.visit_f64(value),
            None => Err(Error::invalid_type(Unexpected::Str(text), &visitor)),
        }
    }
}

impl<'de> IntoDeserializer<'de, Error> for NodeRef<'de> {
    type Deserializer = NodeDeserializer<'de>;

    fn into_deserializer(self) -> Self::Deserializer {
        NodeDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for NodeDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let node = self.node;
        match node.kind() {
            NodeType::Undefined | NodeType::Null => visitor.visit_unit(),
            NodeType::Sequence => visitor.visit_seq(SeqDeserializer::new(node)),
            NodeType::Map => visitor.visit_map(MapDeserializer::new(node)),
            NodeType::Scalar => {
                let text = node.scalar().unwrap_or_default();
                if has_tag(node, "str") {
                    return visitor.visit_borrowed_str(text);
                }
                if has_tag(node, "binary") {
                    return visitor.visit_byte_buf(decode_binary(text)?);
                }
                match resolve_plain(text) {
                    Resolved::Null => visitor.visit_unit(),
                    Resolved::Bool(b) => visitor.visit_bool(b),
                    Resolved::Int(i) => visit_integer(i, text, visitor),
                    Resolved::Float(f) => visitor.visit_f64(f),
                    Resolved::Str(s) => visitor.visit_borrowed_str(s),
                }
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let text = scalar_text(self.node, &visitor)?;
        match parse_bool(text) {
            Some(b) => visitor.visit_bool(b),
            None => Err(Error::invalid_type(Unexpected::Str(text), &visitor)),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let text = scalar_text(self.node, &visitor)?;
        match parse_integer(text) {
            Some(value) => visitor.visit_i128(value),
            None => Err(Error::invalid_type(Unexpected::Str(text), &visitor)),
        }
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let text = scalar_text(self.node, &visitor)?;
        match parse_integer(text).and_then(|value| u128::try_from(value).ok()) {
            Some(value) => visitor.visit_u128(value),
            None => Err(Error::invalid_type(Unexpected::Str(text), &visitor)),
        }
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.float(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.float(visitor)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let text = scalar_text(self.node, &visitor)?;
        visitor.visit_borrowed_str(text)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let node = self.node;
        match node.kind() {
            NodeType::Sequence => visitor.visit_seq(SeqDeserializer::new(node)),
            NodeType::Scalar if has_tag(node, "binary") => {
                visitor.visit_byte_buf(decode_binary(node.scalar().unwrap_or_default())?)
            }
            NodeType::Scalar => visitor.visit_borrowed_bytes(node.scalar().unwrap_or_default().as_bytes()),
            _ => Err(Error::invalid_type(unexpected(node), &visitor)),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let node = self.node;
        let absent = match node.kind() {
            NodeType::Undefined | NodeType::Null => true,
            NodeType::Scalar => {
                !has_tag(node, "str") && node.scalar().is_some_and(is_null_literal)
            }
            NodeType::Sequence | NodeType::Map => false,
        };
        if absent {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let node = self.node;
        match node.kind() {
            NodeType::Undefined | NodeType::Null => visitor.visit_unit(),
            NodeType::Scalar if node.scalar().is_some_and(is_null_literal) => visitor.visit_unit(),
            _ => Err(Error::invalid_type(unexpected(node), &visitor)),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node.kind() {
            NodeType::Sequence => visitor.visit_seq(SeqDeserializer::new(self.node)),
            _ => Err(Error::invalid_type(unexpected(self.node), &visitor)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node.kind() {
            NodeType::Map => visitor.visit_map(MapDeserializer::new(self.node)),
            _ => Err(Error::invalid_type(unexpected(self.node), &visitor)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let node = self.node;
        match node.kind() {
            NodeType::Scalar => visitor.visit_enum(EnumDeserializer {
                variant: node,
                value: None,
            }),
            NodeType::Map if node.len() == 1 => {
                let entry = node.iter().next().and_then(|entry| {
                    entry.pair().map(|(key, value)| (*key, *value))
                });
                match entry {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    }),
                    None => Err(Error::invalid_value(Unexpected::Map, &"a single-entry map")),
                }
            }
            NodeType::Map => Err(Error::invalid_length(node.len(), &"a single-entry map")),
            _ => Err(Error::invalid_type(unexpected(node), &visitor)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqDeserializer<'de> {
    iter: NodeIter<'de>,
}

impl<'de> SeqDeserializer<'de> {
    fn new(node: NodeRef<'de>) -> Self {
        SeqDeserializer { iter: node.iter() }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next().and_then(|entry| entry.node().copied()) {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'de> {
    iter: NodeIter<'de>,
    value: Option<NodeRef<'de>>,
}

impl<'de> MapDeserializer<'de> {
    fn new(node: NodeRef<'de>) -> Self {
        MapDeserializer {
            iter: node.iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next().and_then(|entry| entry.pair().map(|(k, v)| (*k, *v))) {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(NodeDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(NodeDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer<'de> {
    variant: NodeRef<'de>,
    value: Option<NodeRef<'de>>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = VariantDeserializer<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(NodeDeserializer::new(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer<'de> {
    value: Option<NodeRef<'de>>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(value) => de::Deserialize::deserialize(NodeDeserializer::new(value)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(NodeDeserializer::new(value)),
            None => Err(Error::invalid_type(Unexpected::UnitVariant, &"newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(value) => de::Deserializer::deserialize_seq(NodeDeserializer::new(value), visitor),
            None => Err(Error::invalid_type(Unexpected::UnitVariant, &"tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(value) => de::Deserializer::deserialize_map(NodeDeserializer::new(value), visitor),
            None => Err(Error::invalid_type(Unexpected::UnitVariant, &"struct variant")),
        }
    }
}
