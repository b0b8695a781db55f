//! Dynamic instance values.
//!
//! A [`Value`] is the instance representation every model describes. It is a
//! closed tree of scalars and containers; `Null` stands for an absent value.
//!
//! `Value` carries a total structural order so it can key ordered maps and be
//! sorted deterministically. This order is *not* the comparison a model
//! applies to its leaves, which may be customised per value type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// A dynamic instance value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum Value {
    /// The absent value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Named properties in declaration order.
    Bean(IndexMap<String, Value>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Unordered collection; element order carries no meaning.
    Set(Vec<Value>),
    /// Key/value entries; keys are expected to be unique.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Build a bean from `(name, value)` pairs.
    pub fn bean<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Bean(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list from anything convertible into values.
    pub fn list<V: Into<Value>, I: IntoIterator<Item = V>>(items: I) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a set from anything convertible into values.
    pub fn set<V: Into<Value>, I: IntoIterator<Item = V>>(items: I) -> Self {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    /// Build a map from `(key, value)` pairs.
    pub fn map<K: Into<Value>, V: Into<Value>, I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns `true` for the absent value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bean(_) => "bean",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a bean property. Absent beans and missing names yield `None`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Bean(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Mutable access to the property map of a bean.
    ///
    /// Returns `Ok(None)` for the absent value so callers can treat writes
    /// into a null bean as no-ops.
    pub fn fields_mut(&mut self) -> TypeResult<Option<&mut IndexMap<String, Value>>> {
        match self {
            Value::Null => Ok(None),
            Value::Bean(fields) => Ok(Some(fields)),
            other => Err(mismatch("bean", other)),
        }
    }

    /// The elements of a list or set. `Null` yields an empty slice.
    pub fn elements(&self) -> TypeResult<&[Value]> {
        match self {
            Value::Null => Ok(&[]),
            Value::List(items) | Value::Set(items) => Ok(items),
            other => Err(mismatch("list or set", other)),
        }
    }

    /// Mutable access to the elements of a list or set.
    pub fn elements_mut(&mut self) -> TypeResult<Option<&mut Vec<Value>>> {
        match self {
            Value::Null => Ok(None),
            Value::List(items) | Value::Set(items) => Ok(Some(items)),
            other => Err(mismatch("list or set", other)),
        }
    }

    /// The entries of a map. `Null` yields an empty slice.
    pub fn entries(&self) -> TypeResult<&[(Value, Value)]> {
        match self {
            Value::Null => Ok(&[]),
            Value::Map(entries) => Ok(entries),
            other => Err(mismatch("map", other)),
        }
    }

    /// Mutable access to the entries of a map.
    pub fn entries_mut(&mut self) -> TypeResult<Option<&mut Vec<(Value, Value)>>> {
        match self {
            Value::Null => Ok(None),
            Value::Map(entries) => Ok(Some(entries)),
            other => Err(mismatch("map", other)),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::String(_) => 4,
            Value::Bean(_) => 5,
            Value::List(_) => 6,
            Value::Set(_) => 7,
            Value::Map(_) => 8,
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> TypeError {
    TypeError::Mismatch {
        expected,
        found: found.kind_name(),
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bean(a), Value::Bean(b)) => a.iter().cmp(b.iter()),
            (Value::List(a), Value::List(b)) | (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            // Bit equality coincides with `total_cmp` equality.
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Bean(fields) => {
                fields.len().hash(state);
                for (name, value) in fields {
                    name.hash(state);
                    value.hash(state);
                }
            }
            Value::List(items) | Value::Set(items) => items.hash(state),
            Value::Map(entries) => entries.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T>(
            f: &mut fmt::Formatter<'_>,
            items: impl IntoIterator<Item = T>,
            mut each: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
        ) -> fmt::Result {
            for (i, item) in items.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                each(f, item)?;
            }
            Ok(())
        }

        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bean(fields) => {
                f.write_str("{")?;
                join(f, fields, |f, (k, v)| write!(f, "{k}: {v}"))?;
                f.write_str("}")
            }
            Value::List(items) => {
                f.write_str("[")?;
                join(f, items, |f, v| write!(f, "{v}"))?;
                f.write_str("]")
            }
            Value::Set(items) => {
                f.write_str("#{")?;
                join(f, items, |f, v| write!(f, "{v}"))?;
                f.write_str("}")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                join(f, entries, |f, (k, v)| write!(f, "{k} => {v}"))?;
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
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

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// JSON objects become beans and arrays become lists.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Bean(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
