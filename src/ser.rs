//! Serde serialization into the node model.
//!
//! [`to_node`] walks any `Serialize` value and builds a [`Document`]:
//!
//! - numbers, bools and strings become scalars in their canonical spelling;
//! - `None` and `()` become Null;
//! - sequences and tuples become sequences;
//! - maps and structs become maps, with keys that may themselves be any
//!   serializable value;
//! - enum variants are externally tagged: a unit variant is its name, every
//!   other variant is a one-entry map `{variant: payload}`;
//! - byte buffers become a base64 scalar tagged `!!binary`.
//!
//! A string whose plain spelling would read back as something else (`"true"`,
//! `"12"`, `"~"`) is tagged `!!str` so that it survives a round trip.
//!
//! ```rust
//! use serde::Serialize;
//! use yaml_node::to_node;
//!
//! #[derive(Serialize)]
//! struct Server { host: String, port: u16 }
//!
//! let doc = to_node(&Server { host: "localhost".into(), port: 8080 }).unwrap();
//! assert_eq!(doc.root().get("port").unwrap().decode::<u16>(), Some(8080));
//! ```

use crate::convert::Encode;
use crate::de::{resolve_plain, Resolved};
use crate::memory::NodeId;
use crate::{Document, Error, Result};
use base64::Engine;
use serde::{ser, Serialize};

pub(crate) const STR_TAG: &str = "!!str";
pub(crate) const BINARY_TAG: &str = "!!binary";

/// Converts `value` into a standalone [`Document`].
///
/// # Errors
///
/// Fails when the value's `Serialize` implementation reports a custom error.
pub fn to_node<T>(value: &T) -> Result<Document>
where
    T: ?Sized + Serialize,
{
    to_document(value)
}

fn to_document<T: ?Sized + Serialize>(value: &T) -> Result<Document> {
    value.serialize(NodeSerializer)
}

/// Wraps `payload` as `{variant: payload}`.
fn tagged_variant(variant: &'static str, payload: Document) -> Document {
    let mut doc = Document::map();
    let key = doc.adopt(Document::scalar(variant));
    let value = doc.adopt(payload);
    let root = doc.root_id();
    doc.set_map(root, vec![(key, value)]);
    doc
}

/// Serializer whose output is a [`Document`].
pub struct NodeSerializer;

pub struct SerializeVec {
    doc: Document,
    children: Vec<NodeId>,
    variant: Option<&'static str>,
}

impl SerializeVec {
    fn new(capacity: Option<usize>, variant: Option<&'static str>) -> Self {
        SerializeVec {
            doc: Document::sequence(),
            children: Vec::with_capacity(capacity.unwrap_or(0)),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let child = to_document(value)?;
        self.children.push(self.doc.adopt(child));
        Ok(())
    }

    fn finish(mut self) -> Document {
        let root = self.doc.root_id();
        self.doc.set_sequence(root, self.children);
        match self.variant {
            Some(variant) => tagged_variant(variant, self.doc),
            None => self.doc,
        }
    }
}

pub struct SerializeMap {
    doc: Document,
    pairs: Vec<(NodeId, NodeId)>,
    current_key: Option<NodeId>,
    variant: Option<&'static str>,
}

impl SerializeMap {
    fn new(capacity: Option<usize>, variant: Option<&'static str>) -> Self {
        SerializeMap {
            doc: Document::map(),
            pairs: Vec::with_capacity(capacity.unwrap_or(0)),
            current_key: None,
            variant,
        }
    }

    fn field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        let key = self.doc.adopt(Document::scalar(key));
        let value = self.doc.adopt(to_document(value)?);
        self.pairs.push((key, value));
        Ok(())
    }

    fn finish(mut self) -> Document {
        let root = self.doc.root_id();
        self.doc.set_map(root, self.pairs);
        match self.variant {
            Some(variant) => tagged_variant(variant, self.doc),
            None => self.doc,
        }
    }
}

impl ser::Serializer for NodeSerializer {
    type Ok = Document;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_i8(self, v: i8) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_i16(self, v: i16) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_i32(self, v: i32) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_i64(self, v: i64) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_i128(self, v: i128) -> Result<Document> {
        Ok(Document::scalar(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_u16(self, v: u16) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_u32(self, v: u32) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_u64(self, v: u64) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_u128(self, v: u128) -> Result<Document> {
        Ok(Document::scalar(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_f64(self, v: f64) -> Result<Document> {
        Ok(v.encode())
    }

    fn serialize_char(self, v: char) -> Result<Document> {
        let mut buf = [0; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<Document> {
        let mut doc = Document::scalar(v);
        if !matches!(resolve_plain(v), Resolved::Str(_)) {
            doc.root_mut().set_tag(STR_TAG);
        }
        Ok(doc)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Document> {
        let mut doc = Document::scalar(base64::engine::general_purpose::STANDARD.encode(v));
        doc.root_mut().set_tag(BINARY_TAG);
        Ok(doc)
    }

    fn serialize_none(self) -> Result<Document> {
        Ok(Document::null())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Document>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Document> {
        Ok(Document::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Document> {
        Ok(Document::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Document> {
        Ok(Document::scalar(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Document>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Document>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged_variant(variant, to_document(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(SerializeVec::new(Some(len), None))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SerializeVec::new(Some(len), None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeVec::new(Some(len), Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(SerializeMap::new(Some(len), None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeMap::new(Some(len), Some(variant)))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Document;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Document> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Document;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Document> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Document;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Document> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Document;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Document> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Document;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = to_document(key)?;
        self.current_key = Some(self.doc.adopt(key));
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        let value = self.doc.adopt(to_document(value)?);
        self.pairs.push((key, value));
        Ok(())
    }

    fn end(self) -> Result<Document> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Document;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Document> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Document;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Document> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;
    use indexmap::IndexMap;
    use serde::Serialize;

    #[derive(Serialize)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        manager: Option<String>,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Point(i32, i32),
        Rect { w: u32, h: u32 },
    }

    #[test]
    fn test_struct_becomes_map() {
        let user = User {
            id: 7,
            name: "Ada".into(),
            active: true,
            tags: vec!["admin".into(), "ops".into()],
            manager: None,
        };
        let doc = to_node(&user).unwrap();
        let root = doc.root();
        assert_eq!(root.kind(), NodeType::Map);
        assert_eq!(root.len(), 5);
        assert_eq!(root.get("id").unwrap().decode::<u32>(), Some(7));
        assert_eq!(root.get("active").unwrap().decode::<bool>(), Some(true));
        assert_eq!(root.get("tags").unwrap().get(1).unwrap().scalar(), Some("ops"));
        assert_eq!(root.get("manager").unwrap().kind(), NodeType::Null);
    }

    #[test]
    fn test_field_order_is_kept() {
        let user = User {
            id: 1,
            name: "x".into(),
            active: false,
            tags: vec![],
            manager: None,
        };
        let doc = to_node(&user).unwrap();
        let keys: Vec<_> = doc
            .root()
            .iter()
            .filter_map(|entry| entry.key().and_then(|k| k.scalar()))
            .collect();
        assert_eq!(keys, vec!["id", "name", "active", "tags", "manager"]);
    }

    #[test]
    fn test_enum_variants_are_externally_tagged() {
        let doc = to_node(&Shape::Empty).unwrap();
        assert_eq!(doc.root().scalar(), Some("Empty"));

        let doc = to_node(&Shape::Circle(1.5)).unwrap();
        assert_eq!(doc.root().get("Circle").unwrap().decode::<f64>(), Some(1.5));

        let doc = to_node(&Shape::Point(3, 4)).unwrap();
        let point = doc.root().get("Point").unwrap();
        assert_eq!(point.kind(), NodeType::Sequence);
        assert_eq!(point.get(1).unwrap().decode::<i32>(), Some(4));

        let doc = to_node(&Shape::Rect { w: 2, h: 5 }).unwrap();
        let rect = doc.root().get("Rect").unwrap();
        assert_eq!(rect.get("h").unwrap().decode::<u32>(), Some(5));
    }

    #[test]
    fn test_ambiguous_strings_are_tagged() {
        for text in ["true", "12", "~", "", "1.5", "null"] {
            let doc = to_node(text).unwrap();
            assert_eq!(doc.root().tag(), Some(STR_TAG), "{text:?}");
        }
        let doc = to_node("hello").unwrap();
        assert_eq!(doc.root().tag(), None);
        // "yes" only reads as a bool through a typed decode
        let doc = to_node("yes").unwrap();
        assert_eq!(doc.root().tag(), None);
    }

    #[test]
    fn test_bytes_are_base64() {
        let doc = to_node(&Bytes(b"hi!")).unwrap();
        assert_eq!(doc.root().scalar(), Some("aGkh"));
        assert_eq!(doc.root().tag(), Some(BINARY_TAG));
    }

    struct Bytes<'a>(&'a [u8]);

    impl Serialize for Bytes<'_> {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: ser::Serializer,
        {
            serializer.serialize_bytes(self.0)
        }
    }

    #[test]
    fn test_non_string_map_keys() {
        let mut map = IndexMap::new();
        map.insert(10, "ten");
        map.insert(20, "twenty");
        let doc = to_node(&map).unwrap();
        assert_eq!(doc.root().get(20).unwrap().scalar(), Some("twenty"));
    }

    #[test]
    fn test_unit_and_none_are_null() {
        assert_eq!(to_node(&()).unwrap().root().kind(), NodeType::Null);
        assert_eq!(to_node(&None::<u8>).unwrap().root().kind(), NodeType::Null);
        assert_eq!(to_node(&Some(3u8)).unwrap().root().scalar(), Some("3"));
    }

    #[test]
    fn test_floats_use_yaml_specials() {
        assert_eq!(to_node(&f64::INFINITY).unwrap().root().scalar(), Some(".inf"));
        assert_eq!(to_node(&f64::NAN).unwrap().root().scalar(), Some(".nan"));
        assert_eq!(to_node(&2.5f32).unwrap().root().scalar(), Some("2.5"));
        assert_eq!(to_node(&0.1f32).unwrap().root().scalar(), Some("0.1"));
    }
}
