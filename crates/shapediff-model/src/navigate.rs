//! Path navigation through a model and its instances.
//!
//! Every step must address the node kind it is applied to: an index steps
//! into a list or set, a key into a map, a property into a bean. Leaf values
//! cannot be navigated into. Reads are null-safe (stepping through an absent
//! value yields the absent value) and so are writes (writing below an absent
//! value does nothing).

use std::cmp::Ordering;

use shapediff_types::{Path, PathElement, Value};

use crate::error::{ModelError, ModelResult};
use crate::model::Model;

static NULL: Value = Value::Null;

fn unsupported(step: &PathElement, model: &Model) -> ModelError {
    ModelError::UnsupportedNavigation {
        step: format!("{} {step}", step.kind_name()),
        node: model.kind_name(),
    }
}

impl Model {
    /// The sub-model addressed by `path`.
    pub fn at(&self, path: &Path) -> ModelResult<&Model> {
        path.iter().try_fold(self, |model, step| model.step(step))
    }

    fn step(&self, step: &PathElement) -> ModelResult<&Model> {
        match (step, self) {
            (PathElement::Property(name), Model::Bean(bean)) => Ok(bean.property(name)?.model()),
            (PathElement::Index(_), Model::List(list)) => Ok(list.element()),
            (PathElement::Index(_), Model::Set(set)) => Ok(set.element()),
            (PathElement::Key(_), Model::Map(map)) => Ok(map.value()),
            _ => Err(unsupported(step, self)),
        }
    }

    /// Read the value addressed by `path` inside `instance`.
    pub fn get<'a>(&self, instance: &'a Value, path: &Path) -> ModelResult<&'a Value> {
        let mut model = self;
        let mut current = instance;
        for step in path {
            current = match (step, model) {
                (PathElement::Property(name), Model::Bean(bean)) => bean.property(name)?.get(current)?,
                (PathElement::Index(i), Model::List(list)) => list.apply(current)?.get(*i).unwrap_or(&NULL),
                (PathElement::Index(i), Model::Set(set)) => set.apply(current)?.get(*i).unwrap_or(&NULL),
                (PathElement::Key(key), Model::Map(map)) => map
                    .apply(current)?
                    .iter()
                    .find(|(k, _)| map.key().compare(k, key) == Ordering::Equal)
                    .map_or(&NULL, |(_, v)| v),
                _ => return Err(unsupported(step, model)),
            };
            model = model.step(step)?;
        }
        Ok(current)
    }

    /// Write `value` at `path` inside `instance`.
    ///
    /// An index equal to the sequence length appends; an unknown map key
    /// inserts a new entry. The empty path replaces the whole instance.
    pub fn set_at(&self, instance: &mut Value, path: &Path, value: Value) -> ModelResult<()> {
        match path.elements().split_first() {
            None => {
                *instance = value;
                Ok(())
            }
            Some((step, rest)) => self.set_step(instance, step, rest, value),
        }
    }

    fn set_step(
        &self,
        instance: &mut Value,
        step: &PathElement,
        rest: &[PathElement],
        value: Value,
    ) -> ModelResult<()> {
        let child_model = self.step(step)?;
        let last = rest.is_empty();

        match step {
            PathElement::Property(name) => {
                let Some(fields) = instance.fields_mut()? else {
                    return Ok(());
                };
                if last {
                    fields.insert(name.clone(), value);
                    return Ok(());
                }
                match fields.get_mut(name) {
                    Some(child) => child_model.set_rest(child, rest, value),
                    None => Ok(()),
                }
            }
            PathElement::Index(i) => {
                let Some(items) = instance.elements_mut()? else {
                    return Ok(());
                };
                let len = items.len();
                match items.get_mut(*i) {
                    Some(slot) if last => {
                        *slot = value;
                        Ok(())
                    }
                    Some(slot) => child_model.set_rest(slot, rest, value),
                    None if last && *i == len => {
                        items.push(value);
                        Ok(())
                    }
                    None if last => Err(ModelError::IndexOutOfBounds { index: *i, len }),
                    None => Ok(()),
                }
            }
            PathElement::Key(key) => {
                let Model::Map(map) = self else {
                    return Err(unsupported(step, self));
                };
                let Some(entries) = instance.entries_mut()? else {
                    return Ok(());
                };
                let slot = entries
                    .iter_mut()
                    .find(|(k, _)| map.key().compare(k, key) == Ordering::Equal)
                    .map(|(_, v)| v);
                match slot {
                    Some(slot) if last => {
                        *slot = value;
                        Ok(())
                    }
                    Some(slot) => child_model.set_rest(slot, rest, value),
                    None if last => {
                        entries.push((key.clone(), value));
                        Ok(())
                    }
                    None => Ok(()),
                }
            }
        }
    }

    fn set_rest(&self, instance: &mut Value, rest: &[PathElement], value: Value) -> ModelResult<()> {
        match rest.split_first() {
            None => {
                *instance = value;
                Ok(())
            }
            Some((step, tail)) => self.set_step(instance, step, tail, value),
        }
    }
}
