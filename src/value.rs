//! Provenance-tagged JSON value tree
//!
//! Scalars are plain. Arrays and objects remember whether they were produced by
//! expanding a string leaf (`embedded`), which tells the encoder to turn them
//! back into a quoted JSON string.

use crate::common::{STACK_GROWTH, STACK_RED_ZONE};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number};
use std::borrow::Cow;
use std::fmt;

/// A JSON value whose arrays and objects carry an origin flag
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Object),
}

/// Ordered sequence of values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    items: Vec<Value>,
    embedded: bool,
}

/// Ordered map with unique string keys, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct Object {
    entries: IndexMap<String, Value>,
    embedded: bool,
}

/// Accessor key: an object member name or an array index.
///
/// Index keys on objects address the decimal name (`0` is `"0"`), and name keys
/// that parse as integers address array slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    Index(usize),
    Name(Cow<'a, str>),
}

impl Array {
    pub fn new(items: Vec<Value>, embedded: bool) -> Self {
        Self { items, embedded }
    }

    /// True if this array was decoded from the contents of a string
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl Object {
    pub fn new(entries: impl IntoIterator<Item = (String, Value)>, embedded: bool) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            embedded,
        }
    }

    /// True if this object was decoded from the contents of a string
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, Value)> {
        self.entries.into_iter()
    }

    /// Key used by `push`: one past the largest integer key, or `"0"`
    fn next_index_key(&self) -> String {
        self.entries
            .keys()
            .filter_map(|k| k.parse::<usize>().ok())
            .max()
            .map_or(0, |max| max + 1)
            .to_string()
    }
}

// Equality is order-sensitive: two objects with the same members in a
// different order are different documents.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.embedded == other.embedded
            && self.entries.len() == other.entries.len()
            && self.entries.iter().eq(other.entries.iter())
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect(), false)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter().map(|(k, v)| (k.into(), v)),
            false,
        )
    }
}

impl<'a> Key<'a> {
    /// Array slot this key addresses, if any
    fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(name) => name.parse().ok(),
        }
    }

    /// Object member name this key addresses
    fn as_name(&self) -> Cow<'_, str> {
        match self {
            Key::Index(i) => Cow::Owned(i.to_string()),
            Key::Name(name) => Cow::Borrowed(&**name),
        }
    }

    pub fn into_owned(self) -> Key<'static> {
        match self {
            Key::Index(i) => Key::Index(i),
            Key::Name(name) => Key::Name(Cow::Owned(name.into_owned())),
        }
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key<'static> {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(Cow::Borrowed(name))
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Key::Name(Cow::Borrowed(name.as_str()))
    }
}

impl From<String> for Key<'static> {
    fn from(name: String) -> Self {
        Key::Name(Cow::Owned(name))
    }
}

impl Value {
    /// Build an array or object from a plain JSON value.
    ///
    /// Every nested array and object receives the same `embedded` flag.
    /// Null and scalars are rejected with [`Error::InvalidConstruction`].
    pub fn from_plain(plain: serde_json::Value, embedded: bool) -> Result<Value> {
        match plain {
            serde_json::Value::Null => Err(Error::InvalidConstruction("null")),
            serde_json::Value::Bool(_) => Err(Error::InvalidConstruction("boolean")),
            serde_json::Value::Number(_) => Err(Error::InvalidConstruction("number")),
            serde_json::Value::String(_) => Err(Error::InvalidConstruction("string")),
            composite => Ok(Self::tag(composite, embedded)),
        }
    }

    fn tag(plain: serde_json::Value, embedded: bool) -> Value {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || match plain {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(Array::new(
                items.into_iter().map(|v| Self::tag(v, embedded)).collect(),
                embedded,
            )),
            serde_json::Value::Object(map) => Value::Object(Object::new(
                map.into_iter().map(|(k, v)| (k, Self::tag(v, embedded))),
                embedded,
            )),
        })
    }

    /// Same node with a different origin flag. Children keep their own flags.
    pub fn with_origin(self, embedded: bool) -> Value {
        match self {
            Value::Array(arr) => Value::Array(Array::new(arr.items, embedded)),
            Value::Object(obj) => Value::Object(Object {
                entries: obj.entries,
                embedded,
            }),
            scalar => scalar,
        }
    }

    /// True for arrays and objects decoded from the contents of a string
    pub fn is_embedded_origin(&self) -> bool {
        match self {
            Value::Array(arr) => arr.embedded,
            Value::Object(obj) => obj.embedded,
            _ => false,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Look up a member or element. Scalars have no children.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Option<&Value> {
        let key = key.into();
        match self {
            Value::Array(arr) => key.as_index().and_then(|i| arr.items.get(i)),
            Value::Object(obj) => {
                let name = key.as_name();
                obj.entries.get(&*name)
            }
            _ => None,
        }
    }

    pub fn get_mut<'k>(&mut self, key: impl Into<Key<'k>>) -> Option<&mut Value> {
        let key = key.into();
        match self {
            Value::Array(arr) => key.as_index().and_then(|i| arr.items.get_mut(i)),
            Value::Object(obj) => {
                let name = key.as_name();
                obj.entries.get_mut(&*name)
            }
            _ => None,
        }
    }

    /// Store `value` under `key`, returning the value it replaced.
    ///
    /// On arrays the index may be at most `len()`; writing at `len()` appends.
    /// On objects a new name is appended after the existing members.
    pub fn set<'k>(
        &mut self,
        key: impl Into<Key<'k>>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let key = key.into();
        let value = value.into();
        match self {
            Value::Array(arr) => {
                let index = key
                    .as_index()
                    .ok_or_else(|| Error::InvalidKey(key.to_string()))?;
                if index < arr.items.len() {
                    Ok(Some(std::mem::replace(&mut arr.items[index], value)))
                } else if index == arr.items.len() {
                    arr.items.push(value);
                    Ok(None)
                } else {
                    Err(Error::InvalidKey(format!(
                        "index {} past the end of an array of length {}",
                        index,
                        arr.items.len()
                    )))
                }
            }
            Value::Object(obj) => Ok(obj.entries.insert(key.as_name().into_owned(), value)),
            _ => Err(Error::InvalidKey(format!("{} on a scalar", key))),
        }
    }

    /// Append without naming a key.
    ///
    /// Objects receive the next integer key after the largest existing one.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match self {
            Value::Array(arr) => {
                arr.items.push(value);
                Ok(())
            }
            Value::Object(obj) => {
                let key = obj.next_index_key();
                obj.entries.insert(key, value);
                Ok(())
            }
            _ => Err(Error::InvalidKey("push on a scalar".to_string())),
        }
    }

    /// Remove a member or element. Later array elements shift down by one;
    /// remaining object members keep their order.
    pub fn remove<'k>(&mut self, key: impl Into<Key<'k>>) -> Option<Value> {
        let key = key.into();
        match self {
            Value::Array(arr) => match key.as_index() {
                Some(i) if i < arr.items.len() => Some(arr.items.remove(i)),
                _ => None,
            },
            Value::Object(obj) => {
                let name = key.as_name();
                obj.entries.shift_remove(&*name)
            }
            _ => None,
        }
    }

    pub fn contains_key<'k>(&self, key: impl Into<Key<'k>>) -> bool {
        self.get(key).is_some()
    }

    /// Number of children; zero for scalars
    pub fn len(&self) -> usize {
        match self {
            Value::Array(arr) => arr.len(),
            Value::Object(obj) => obj.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children in order, paired with their index or member name
    pub fn iter(&self) -> Iter<'_> {
        match self {
            Value::Array(arr) => Iter(IterInner::Array(arr.items.iter().enumerate())),
            Value::Object(obj) => Iter(IterInner::Object(obj.entries.iter())),
            _ => Iter(IterInner::Empty),
        }
    }

    /// Plain JSON with provenance dropped; arrays stay arrays
    pub fn to_plain(&self) -> serde_json::Value {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.items.iter().map(Value::to_plain).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_plain()))
                    .collect(),
            ),
        })
    }

    /// Plain JSON with every array turned into an object keyed by index
    pub fn to_plain_object(&self) -> serde_json::Value {
        match self {
            Value::Array(arr) => serde_json::Value::Object(
                arr.items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v.to_plain_object()))
                    .collect::<Map<_, _>>(),
            ),
            Value::Object(obj) => serde_json::Value::Object(
                obj.entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_plain_object()))
                    .collect(),
            ),
            scalar => scalar.to_plain(),
        }
    }
}

/// Iterator returned by [`Value::iter`]
pub struct Iter<'a>(IterInner<'a>);

enum IterInner<'a> {
    Array(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
    Object(indexmap::map::Iter<'a, String, Value>),
    Empty,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Key<'a>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            IterInner::Array(it) => it.next().map(|(i, v)| (Key::Index(i), v)),
            IterInner::Object(it) => it
                .next()
                .map(|(k, v)| (Key::Name(Cow::Borrowed(k.as_str())), v)),
            IterInner::Empty => None,
        }
    }
}

impl<'a> IntoIterator for &'a Value {
    type Item = (Key<'a>, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Converts without provenance: every array and object is native
impl From<serde_json::Value> for Value {
    fn from(plain: serde_json::Value) -> Self {
        Value::tag(plain, false)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

/// Non-finite floats become `null`, as JSON has no spelling for them
impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    fn from(arr: Array) -> Self {
        Value::Array(arr)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => arr.serialize(serializer),
            Value::Object(obj) => obj.serialize(serializer),
        }
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Compact plain JSON, provenance ignored
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
