//! The model sum type and its building blocks.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use shapediff_types::{TypeResult, Value};

use crate::error::{ModelError, ModelResult};

/// Total order over leaf values.
///
/// A comparator drives matching and sorting; it is not required to agree
/// with structural equality of [`Value`].
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Closed description of an instance's shape.
#[derive(Clone, Debug)]
pub enum Model {
    Value(ValueModel),
    Bean(BeanModel),
    List(ListModel),
    Set(SetModel),
    Map(MapModel),
}

impl Model {
    /// A leaf value ordered by the structural order of [`Value`].
    pub fn value(type_name: impl Into<String>) -> Model {
        Model::value_with(type_name, |a: &Value, b: &Value| a.cmp(b))
    }

    /// A leaf value ordered by a custom comparator.
    pub fn value_with<F>(type_name: impl Into<String>, comparator: F) -> Model
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        Model::Value(ValueModel {
            type_name: type_name.into(),
            comparator: Arc::new(comparator),
        })
    }

    /// A bean with properties in declaration order.
    ///
    /// Fails with [`ModelError::DuplicateKey`] if two properties share a name.
    pub fn bean<I>(type_name: impl Into<String>, properties: I) -> ModelResult<Model>
    where
        I: IntoIterator<Item = Property>,
    {
        let type_name = type_name.into();
        let mut by_name = IndexMap::new();
        for property in properties {
            if by_name.contains_key(&property.name) {
                return Err(ModelError::DuplicateKey {
                    bean: type_name,
                    name: property.name,
                });
            }
            by_name.insert(property.name.clone(), property);
        }
        Ok(Model::Bean(BeanModel {
            type_name,
            properties: by_name,
        }))
    }

    /// An ordered sequence of `element`.
    pub fn list(element: Model) -> Model {
        Model::List(ListModel {
            element: Arc::new(element),
        })
    }

    /// An unordered collection of `element`.
    pub fn set(element: Model) -> Model {
        Model::Set(SetModel {
            element: Arc::new(element),
        })
    }

    /// A mapping from `key` to `value`.
    pub fn map(key: Model, value: Model) -> Model {
        Model::Map(MapModel {
            key: Arc::new(key),
            value: Arc::new(value),
        })
    }

    /// Short name of the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Model::Value(_) => "value",
            Model::Bean(_) => "bean",
            Model::List(_) => "list",
            Model::Set(_) => "set",
            Model::Map(_) => "map",
        }
    }

    /// Human-readable type name, e.g. `Person` or `List<String>`.
    pub fn type_name(&self) -> String {
        match self {
            Model::Value(v) => v.type_name.clone(),
            Model::Bean(b) => b.type_name.clone(),
            Model::List(l) => format!("List<{}>", l.element.type_name()),
            Model::Set(s) => format!("Set<{}>", s.element.type_name()),
            Model::Map(m) => format!("Map<{}, {}>", m.key.type_name(), m.value.type_name()),
        }
    }
}

/// Terminal model: compared as a whole through its comparator.
#[derive(Clone)]
pub struct ValueModel {
    type_name: String,
    comparator: Comparator,
}

impl ValueModel {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Compare two leaf values.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        (self.comparator)(a, b)
    }
}

impl fmt::Debug for ValueModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueModel")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A record of named properties.
#[derive(Clone, Debug)]
pub struct BeanModel {
    type_name: String,
    properties: IndexMap<String, Property>,
}

impl BeanModel {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> ModelResult<&Property> {
        self.properties
            .get(name)
            .ok_or_else(|| ModelError::UnknownProperty {
                bean: self.type_name.clone(),
                name: name.to_string(),
            })
    }

    /// All properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// A named, typed accessor on a bean. Properties are equal iff their names
/// are equal.
#[derive(Clone, Debug)]
pub struct Property {
    name: String,
    model: Arc<Model>,
}

impl Property {
    pub fn new(name: impl Into<String>, model: Model) -> Self {
        Self {
            name: name.into(),
            model: Arc::new(model),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Read this property from `bean`. A null bean or a missing property
    /// reads as null.
    pub fn get<'a>(&self, bean: &'a Value) -> TypeResult<&'a Value> {
        static NULL: Value = Value::Null;
        match bean {
            Value::Null => Ok(&NULL),
            Value::Bean(fields) => Ok(fields.get(&self.name).unwrap_or(&NULL)),
            other => Err(shapediff_types::TypeError::Mismatch {
                expected: "bean",
                found: other.kind_name(),
            }),
        }
    }

    /// Write this property on `bean`. Writing into a null bean is a no-op.
    pub fn set(&self, bean: &mut Value, value: Value) -> TypeResult<()> {
        if let Some(fields) = bean.fields_mut()? {
            fields.insert(self.name.clone(), value);
        }
        Ok(())
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Property {}

/// Ordered sequence model.
#[derive(Clone, Debug)]
pub struct ListModel {
    element: Arc<Model>,
}

impl ListModel {
    pub fn element(&self) -> &Model {
        &self.element
    }

    /// Extract the elements of `container`; null yields an empty sequence.
    pub fn apply<'a>(&self, container: &'a Value) -> TypeResult<&'a [Value]> {
        container.elements()
    }
}

/// Unordered collection model.
#[derive(Clone, Debug)]
pub struct SetModel {
    element: Arc<Model>,
}

impl SetModel {
    pub fn element(&self) -> &Model {
        &self.element
    }

    /// Extract the elements of `container`; null yields an empty set.
    pub fn apply<'a>(&self, container: &'a Value) -> TypeResult<&'a [Value]> {
        container.elements()
    }
}

/// Key/value mapping model.
#[derive(Clone, Debug)]
pub struct MapModel {
    key: Arc<Model>,
    value: Arc<Model>,
}

impl MapModel {
    pub fn key(&self) -> &Model {
        &self.key
    }

    pub fn value(&self) -> &Model {
        &self.value
    }

    /// Extract the entries of `container`; null yields an empty mapping.
    pub fn apply<'a>(&self, container: &'a Value) -> TypeResult<&'a [(Value, Value)]> {
        container.entries()
    }
}
