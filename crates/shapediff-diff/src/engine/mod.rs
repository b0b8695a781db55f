//! The recursive diff algorithm.
//!
//! [`DiffEngine::diff`] walks a model over a left and a right instance:
//!
//! - Values are compared through the model's leaf comparator.
//! - Beans are compared property by property. When exactly one side is
//!   absent, the present side is walked alone and its whole subtree is
//!   reported as added or removed.
//! - Maps are compared entry by entry over the union of their keys.
//! - Lists are aligned in order, matching elements whose diff scores at
//!   least the threshold (see [`list`]).
//! - Sets are reconciled by exact matching followed by score-maximising
//!   assignment (see [`set`]).
//!
//! Each call allocates its own result tree; the engine itself holds no
//! mutable state and can be shared across threads.

mod list;
mod set;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use indexmap::IndexMap;
use shapediff_model::{BeanModel, MapModel, Model, ValueModel};
use shapediff_optimizer::ScoreOptimizer;
use shapediff_types::{Status, Value};
use tracing::debug;

use crate::config::validate_threshold;
use crate::error::{DiffError, DiffResult};
use crate::tree::{Diff, DiffKind};

static NULL: Value = Value::Null;

/// Computes diff trees for a fixed threshold and optimizer.
#[derive(Clone, Copy)]
pub struct DiffEngine<'o> {
    threshold: f64,
    optimizer: &'o dyn ScoreOptimizer,
}

impl<'o> DiffEngine<'o> {
    /// Create an engine. Fails if `threshold` lies outside `(0, 1]`.
    pub fn new(threshold: f64, optimizer: &'o dyn ScoreOptimizer) -> DiffResult<Self> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            optimizer,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Diff `left` against `right` under `model`.
    pub fn diff(&self, model: &Model, left: &Value, right: &Value) -> DiffResult<Diff> {
        debug!(
            model = %model.type_name(),
            threshold = self.threshold,
            optimizer = self.optimizer.name(),
            "computing diff"
        );
        let diff = self.node(model, left, right)?;
        debug!(status = %diff.status(), score = diff.score(), "diff computed");
        Ok(diff)
    }

    /// Whether a candidate pairing is close enough to count as one item.
    fn accepts(&self, diff: &Diff) -> bool {
        diff.score() >= self.threshold
    }

    fn node(&self, model: &Model, left: &Value, right: &Value) -> DiffResult<Diff> {
        match model {
            Model::Value(leaf) => Ok(diff_value(leaf, left, right)),
            Model::Bean(bean) => self.diff_bean(model, bean, left, right),
            Model::List(list) => self.diff_list(list, left, right),
            Model::Set(set) => self.diff_set(set, left, right),
            Model::Map(map) => self.diff_map(map, left, right),
        }
    }

    fn diff_bean(&self, model: &Model, bean: &BeanModel, left: &Value, right: &Value) -> DiffResult<Diff> {
        match (left.is_null(), right.is_null()) {
            (true, false) => return one_sided(model, right, Status::Added),
            (false, true) => return one_sided(model, left, Status::Removed),
            _ => {}
        }

        let mut properties = IndexMap::with_capacity(bean.len());
        for property in bean.properties() {
            let child = self.node(property.model(), property.get(left)?, property.get(right)?)?;
            properties.insert(property.name().to_string(), child);
        }
        Ok(Diff::bean(left.clone(), right.clone(), properties))
    }

    fn diff_map(&self, map: &MapModel, left: &Value, right: &Value) -> DiffResult<Diff> {
        let left_entries = index_entries(map.apply(left)?)?;
        let right_entries = index_entries(map.apply(right)?)?;

        let mut entries = BTreeMap::new();
        for key in left_entries.keys().chain(right_entries.keys()) {
            if entries.contains_key(*key) {
                continue;
            }
            let l = left_entries.get(key).copied().unwrap_or(&NULL);
            let r = right_entries.get(key).copied().unwrap_or(&NULL);
            entries.insert((*key).clone(), self.node(map.value(), l, r)?);
        }
        Ok(Diff::map(left.clone(), right.clone(), entries))
    }
}

fn diff_value(leaf: &ValueModel, left: &Value, right: &Value) -> Diff {
    let status = match (left.is_null(), right.is_null()) {
        (true, true) => Status::Unchanged,
        (true, false) => Status::Added,
        (false, true) => Status::Removed,
        (false, false) => match leaf.compare(left, right) {
            Ordering::Equal => Status::Unchanged,
            _ => Status::Modified,
        },
    };
    Diff::simple(left.clone(), right.clone(), status)
}

/// Index map entries by key, rejecting repeated keys.
fn index_entries(entries: &[(Value, Value)]) -> DiffResult<BTreeMap<&Value, &Value>> {
    let mut by_key = BTreeMap::new();
    for (key, value) in entries {
        if by_key.insert(key, value).is_some() {
            return Err(DiffError::DuplicateKey(format!("map key {key}")));
        }
    }
    Ok(by_key)
}

/// Walk `value` alone and tag every node of the result with `status`.
///
/// `status` is `Added` when `value` is the right side and `Removed` when it
/// is the left side.
fn one_sided(model: &Model, value: &Value, status: Status) -> DiffResult<Diff> {
    let (left, right) = match status {
        Status::Added => (Value::Null, value.clone()),
        _ => (value.clone(), Value::Null),
    };

    let kind = match model {
        Model::Value(_) => return Ok(Diff::simple(left, right, status)),
        Model::Bean(bean) => {
            let mut properties = IndexMap::with_capacity(bean.len());
            for property in bean.properties() {
                let child = one_sided(property.model(), property.get(value)?, status)?;
                properties.insert(property.name().to_string(), child);
            }
            DiffKind::Bean(properties)
        }
        Model::List(list) => DiffKind::List(
            list.apply(value)?
                .iter()
                .map(|item| one_sided(list.element(), item, status))
                .collect::<DiffResult<_>>()?,
        ),
        Model::Set(set) => {
            let element = set.element();
            let mut items: Vec<&Value> = set.apply(value)?.iter().collect();
            items.sort_by(|a, b| element.compare(a, b));
            DiffKind::List(
                items
                    .into_iter()
                    .map(|item| one_sided(element, item, status))
                    .collect::<DiffResult<_>>()?,
            )
        }
        Model::Map(map) => {
            let mut entries = BTreeMap::new();
            for (key, item) in index_entries(map.apply(value)?)? {
                entries.insert(key.clone(), one_sided(map.value(), item, status)?);
            }
            DiffKind::Map(entries)
        }
    };
    Ok(Diff::composite(left, right, status, kind))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use shapediff_model::Property;
    use shapediff_optimizer::{ExactOptimizer, GreedyOptimizer};
    use shapediff_types::Path;

    pub(crate) fn string() -> Model {
        Model::value("String")
    }

    pub(crate) fn address_model() -> Model {
        Model::bean(
            "Address",
            [
                Property::new("street", string()),
                Property::new("city", string()),
            ],
        )
        .unwrap()
    }

    pub(crate) fn person_model() -> Model {
        Model::bean(
            "Person",
            [
                Property::new("firstName", string()),
                Property::new("lastName", string()),
                Property::new("currentAddress", address_model()),
                Property::new("nicknames", Model::list(string())),
                Property::new("emails", Model::set(string())),
                Property::new("phones", Model::map(string(), string())),
            ],
        )
        .unwrap()
    }

    pub(crate) fn person(first: &str, last: &str) -> Value {
        Value::bean([("firstName", Value::from(first)), ("lastName", Value::from(last))])
    }

    pub(crate) fn diff(model: &Model, left: &Value, right: &Value) -> Diff {
        DiffEngine::new(0.5, &ExactOptimizer::default())
            .unwrap()
            .diff(model, left, right)
            .unwrap()
    }

    #[test]
    fn rejects_invalid_threshold() {
        let opt = GreedyOptimizer;
        for bad in [0.0, 1.01, -1.0] {
            assert!(matches!(
                DiffEngine::new(bad, &opt),
                Err(DiffError::InvalidThreshold(_))
            ));
        }
        assert_eq!(DiffEngine::new(1.0, &opt).unwrap().threshold(), 1.0);
    }

    #[test]
    fn value_statuses() {
        let m = string();
        let a = Value::from("a");
        let b = Value::from("b");
        assert_eq!(diff(&m, &a, &a).status(), Status::Unchanged);
        assert_eq!(diff(&m, &a, &b).status(), Status::Modified);
        assert_eq!(diff(&m, &Value::Null, &a).status(), Status::Added);
        assert_eq!(diff(&m, &a, &Value::Null).status(), Status::Removed);
        assert_eq!(diff(&m, &Value::Null, &Value::Null).status(), Status::Unchanged);
        assert_eq!(diff(&m, &a, &b).score(), 0.0);
    }

    #[test]
    fn value_uses_model_comparator() {
        let ci = Model::value_with("CiString", |a: &Value, b: &Value| {
            let a = a.as_str().unwrap_or_default().to_lowercase();
            let b = b.as_str().unwrap_or_default().to_lowercase();
            a.cmp(&b)
        });
        let d = diff(&ci, &Value::from("DOE"), &Value::from("doe"));
        assert!(d.is_unchanged());
        assert_eq!(d.left(), &Value::from("DOE"));
    }

    #[test]
    fn scenario_a_one_property_changed() {
        let m = person_model();
        let d = diff(&m, &person("John", "Doe"), &person("Jack", "Doe"));
        assert_eq!(d.status(), Status::Modified);

        let first = d.extract(&Path::root().property("firstName")).unwrap();
        assert_eq!(first.status(), Status::Modified);
        assert_eq!(first.score(), 0.0);

        let last = d.extract(&Path::root().property("lastName")).unwrap();
        assert_eq!(last.status(), Status::Unchanged);
        assert_eq!(last.score(), 1.0);
    }

    #[test]
    fn scenario_d_null_bean_is_removed_throughout() {
        let m = person_model();
        let mut left = person("John", "Doe");
        m.set_at(
            &mut left,
            &Path::root().property("currentAddress"),
            Value::bean([("street", Value::from("1 Main St")), ("city", Value::from("Springfield"))]),
        )
        .unwrap();
        let right = person("John", "Doe");

        let d = diff(&m, &left, &right);
        let address = d.extract(&Path::root().property("currentAddress")).unwrap();
        let mut statuses = Vec::new();
        address.traverse(|_, node| {
            statuses.push(node.status());
            true
        });
        assert_eq!(statuses, [Status::Removed; 3]);
        assert_eq!(address.score(), 0.0);

        let mirrored = diff(&m, &right, &left);
        let address = mirrored
            .extract(&Path::root().property("currentAddress"))
            .unwrap();
        let mut statuses = Vec::new();
        address.traverse(|_, node| {
            statuses.push(node.status());
            true
        });
        assert_eq!(statuses, [Status::Added; 3]);
    }

    #[test]
    fn one_sided_bean_keeps_absent_properties_tagged() {
        let m = person_model();
        let d = diff(&m, &Value::Null, &person("Jane", "Roe"));
        assert_eq!(d.status(), Status::Added);
        let summary = d.summary();
        assert_eq!(summary.changes(), summary.total());
        assert_eq!(summary.added, summary.total());
        let phones = d.extract(&Path::root().property("phones")).unwrap();
        assert_eq!(phones.status(), Status::Added);
        assert_eq!(phones.right(), &Value::Null);
    }

    #[test]
    fn map_entries_over_key_union() {
        let m = Model::map(string(), string());
        let left = Value::map([("home", "111"), ("work", "222")]);
        let right = Value::map([("work", "333"), ("cell", "444")]);
        let d = diff(&m, &left, &right);
        assert_eq!(d.status(), Status::Modified);

        let entry = |k: &str| d.extract(&Path::root().key(k)).unwrap().status();
        assert_eq!(entry("home"), Status::Removed);
        assert_eq!(entry("work"), Status::Modified);
        assert_eq!(entry("cell"), Status::Added);
        assert_eq!(d.children().len(), 3);
    }

    #[test]
    fn map_from_nothing_is_added() {
        let m = Model::map(string(), Model::value("Int"));
        let d = diff(&m, &Value::Null, &Value::map([("a", 1), ("b", 2)]));
        assert_eq!(d.status(), Status::Added);
        assert_eq!(d.score(), 0.0);
    }

    #[test]
    fn duplicate_map_keys_are_rejected() {
        let m = Model::map(string(), string());
        let bad = Value::Map(vec![
            (Value::from("k"), Value::from("1")),
            (Value::from("k"), Value::from("2")),
        ]);
        let err = DiffEngine::new(0.5, &GreedyOptimizer)
            .unwrap()
            .diff(&m, &bad, &Value::Null)
            .unwrap_err();
        assert!(matches!(err, DiffError::DuplicateKey(_)));
    }

    #[test]
    fn wrong_shape_is_a_type_error() {
        let m = person_model();
        let err = DiffEngine::new(0.5, &GreedyOptimizer)
            .unwrap()
            .diff(&m, &Value::from("not a bean"), &person("a", "b"))
            .unwrap_err();
        assert!(matches!(err, DiffError::Type(_)));
    }

    #[test]
    fn bean_score_is_mean_of_properties() {
        let m = Model::bean(
            "Pair",
            [Property::new("a", string()), Property::new("b", string())],
        )
        .unwrap();
        let left = Value::bean([("a", Value::from("x")), ("b", Value::from("y"))]);
        let right = Value::bean([("a", Value::from("x")), ("b", Value::from("z"))]);
        let d = diff(&m, &left, &right);
        assert_eq!(d.status(), Status::Modified);
        assert!((d.score() - 0.5).abs() < 1e-12);
    }

    fn leaf_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            "[a-c]{0,2}".prop_map(Value::from),
        ]
    }

    pub(crate) fn person_value() -> impl Strategy<Value = Value> {
        (
            leaf_value(),
            leaf_value(),
            prop::option::of((leaf_value(), leaf_value())),
            prop::collection::vec("[a-d]", 0..4),
            prop::collection::btree_set("[a-e]", 0..4),
            prop::collection::btree_map("[a-c]", "[x-z]", 0..3),
        )
            .prop_map(|(first, last, address, nicknames, emails, phones)| {
                Value::bean([
                    ("firstName", first),
                    ("lastName", last),
                    (
                        "currentAddress",
                        address.map_or(Value::Null, |(street, city)| {
                            Value::bean([("street", street), ("city", city)])
                        }),
                    ),
                    ("nicknames", Value::list(nicknames)),
                    ("emails", Value::set(emails)),
                    ("phones", Value::map(phones)),
                ])
            })
    }

    proptest! {
        #[test]
        fn identical_instances_are_unchanged_everywhere(value in person_value()) {
            let d = diff(&person_model(), &value, &value);
            let mut all_unchanged = true;
            d.traverse(|_, node| {
                all_unchanged &= node.is_unchanged() && node.score() == 1.0;
                true
            });
            prop_assert!(all_unchanged);
        }

        #[test]
        fn swapping_sides_mirrors_statuses(left in person_value(), right in person_value()) {
            let m = person_model();
            let forward = diff(&m, &left, &right);
            let backward = diff(&m, &right, &left);
            prop_assert_eq!(forward.status(), backward.status().mirror());
        }
    }
}
