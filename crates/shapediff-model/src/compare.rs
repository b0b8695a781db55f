//! The model-derived total order.
//!
//! Two instances are compared by walking the model over both of them at
//! once, down to the leaf comparators. Nulls sort after every present value.
//! Sets and maps are compared after sorting their elements (entries by key)
//! so the order never depends on iteration order.
//!
//! Instances that do not match the model's shape compare as empty
//! containers; shape errors are reported by diffing, not by ordering.

use std::cmp::Ordering;

use shapediff_types::Value;

use crate::model::Model;

static NULL: Value = Value::Null;

impl Model {
    /// Compare two instances of this model.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        match self {
            Model::Value(leaf) => leaf.compare(a, b),
            Model::Bean(bean) => {
                for property in bean.properties() {
                    let left = property.get(a).unwrap_or(&NULL);
                    let right = property.get(b).unwrap_or(&NULL);
                    let ord = property.model().compare(left, right);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            }
            Model::List(list) => compare_sequences(
                list.element(),
                list.apply(a).unwrap_or_default(),
                list.apply(b).unwrap_or_default(),
            ),
            Model::Set(set) => {
                let element = set.element();
                let left = sorted(element, set.apply(a).unwrap_or_default());
                let right = sorted(element, set.apply(b).unwrap_or_default());
                compare_sequences_by(&left, &right, |x, y| element.compare(x, y))
            }
            Model::Map(map) => {
                let (key, value) = (map.key(), map.value());
                let mut left: Vec<&(Value, Value)> = map.apply(a).unwrap_or_default().iter().collect();
                let mut right: Vec<&(Value, Value)> = map.apply(b).unwrap_or_default().iter().collect();
                left.sort_by(|x, y| key.compare(&x.0, &y.0));
                right.sort_by(|x, y| key.compare(&x.0, &y.0));
                compare_sequences_by(&left, &right, |x, y| {
                    key.compare(&x.0, &y.0)
                        .then_with(|| value.compare(&x.1, &y.1))
                })
            }
        }
    }
}

fn sorted<'a>(model: &Model, items: &'a [Value]) -> Vec<&'a Value> {
    let mut refs: Vec<&Value> = items.iter().collect();
    refs.sort_by(|x, y| model.compare(x, y));
    refs
}

fn compare_sequences(element: &Model, left: &[Value], right: &[Value]) -> Ordering {
    let left: Vec<&Value> = left.iter().collect();
    let right: Vec<&Value> = right.iter().collect();
    compare_sequences_by(&left, &right, |x, y| element.compare(x, y))
}

fn compare_sequences_by<T>(left: &[&T], right: &[&T], cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    for (x, y) in left.iter().zip(right) {
        let ord = cmp(*x, *y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Property;

    fn string() -> Model {
        Model::value("String")
    }

    #[test]
    fn nulls_sort_last() {
        let m = string();
        assert_eq!(m.compare(&Value::Null, &Value::from("a")), Ordering::Greater);
        assert_eq!(m.compare(&Value::from("a"), &Value::Null), Ordering::Less);
        assert_eq!(m.compare(&Value::Null, &Value::Null), Ordering::Equal);
    }

    #[test]
    fn beans_compare_property_by_property() {
        let m = Model::bean(
            "Person",
            [
                Property::new("last", string()),
                Property::new("first", string()),
            ],
        )
        .unwrap();
        let doe_john = Value::bean([("last", Value::from("Doe")), ("first", Value::from("John"))]);
        let doe_jack = Value::bean([("last", Value::from("Doe")), ("first", Value::from("Jack"))]);
        let abe = Value::bean([("last", Value::from("Abe")), ("first", Value::from("Zed"))]);
        assert_eq!(m.compare(&doe_jack, &doe_john), Ordering::Less);
        assert_eq!(m.compare(&abe, &doe_jack), Ordering::Less);
        assert_eq!(m.compare(&doe_john, &doe_john), Ordering::Equal);
    }

    #[test]
    fn lists_compare_lexicographically() {
        let m = Model::list(Model::value("Int"));
        assert_eq!(
            m.compare(&Value::list([1, 2]), &Value::list([1, 2, 0])),
            Ordering::Less
        );
        assert_eq!(
            m.compare(&Value::list([2]), &Value::list([1, 9])),
            Ordering::Greater
        );
    }

    #[test]
    fn sets_ignore_element_order() {
        let m = Model::set(Model::value("Int"));
        assert_eq!(
            m.compare(&Value::set([3, 1, 2]), &Value::set([2, 3, 1])),
            Ordering::Equal
        );
    }

    #[test]
    fn maps_ignore_entry_order() {
        let m = Model::map(string(), Model::value("Int"));
        let a = Value::map([("x", 1), ("y", 2)]);
        let b = Value::map([("y", 2), ("x", 1)]);
        assert_eq!(m.compare(&a, &b), Ordering::Equal);
        let c = Value::map([("x", 1), ("y", 3)]);
        assert_eq!(m.compare(&a, &c), Ordering::Less);
    }

    #[test]
    fn leaf_comparator_flows_through_containers() {
        let ci = Model::value_with("CiString", |a: &Value, b: &Value| {
            let a = a.as_str().unwrap_or_default().to_lowercase();
            let b = b.as_str().unwrap_or_default().to_lowercase();
            a.cmp(&b)
        });
        let m = Model::list(ci);
        assert_eq!(
            m.compare(&Value::list(["A", "b"]), &Value::list(["a", "B"])),
            Ordering::Equal
        );
    }
}
