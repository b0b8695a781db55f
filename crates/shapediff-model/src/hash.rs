//! Order-independent content hashing.
//!
//! Leaves are hashed with domain-separated BLAKE3 over a canonical byte
//! encoding. Composite hashes are folded with wrapping addition, so the hash
//! of a bean, set or map never depends on the order in which its children
//! were visited. Lists fold the same way: element order is left to the
//! recursive diff to judge.
//!
//! Equal hashes only nominate candidates for an exact comparison. They never
//! prove equality: custom leaf comparators may equate values with different
//! encodings, and distinct values may collide.

use shapediff_types::Value;

use crate::model::Model;

/// Domain-separated BLAKE3 hasher for instance contents.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for leaf values.
    pub const LEAF: Self = Self {
        domain: "shapediff-leaf-v1",
    };
    /// Hasher for bean property names.
    pub const PROPERTY: Self = Self {
        domain: "shapediff-property-v1",
    };

    /// Hash raw bytes with domain separation, truncated to 64 bits.
    pub fn hash(&self, data: &[u8]) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// Hash the canonical encoding of a value.
    pub fn hash_value(&self, value: &Value) -> u64 {
        let mut buf = Vec::new();
        encode(value, &mut buf);
        self.hash(&buf)
    }
}

/// Canonical, self-delimiting byte encoding of a value.
fn encode(value: &Value, buf: &mut Vec<u8>) {
    fn len(n: usize, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(n as u64).to_le_bytes());
    }

    match value {
        Value::Null => buf.push(0),
        Value::Bool(b) => {
            buf.push(1);
            buf.push(u8::from(*b));
        }
        Value::Int(i) => {
            buf.push(2);
            buf.extend_from_slice(&i.to_le_bytes());
        }
        Value::Float(f) => {
            buf.push(3);
            buf.extend_from_slice(&f.to_bits().to_le_bytes());
        }
        Value::String(s) => {
            buf.push(4);
            len(s.len(), buf);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Bean(fields) => {
            buf.push(5);
            len(fields.len(), buf);
            for (name, field) in fields {
                len(name.len(), buf);
                buf.extend_from_slice(name.as_bytes());
                encode(field, buf);
            }
        }
        Value::List(items) | Value::Set(items) => {
            buf.push(if matches!(value, Value::List(_)) { 6 } else { 7 });
            len(items.len(), buf);
            for item in items {
                encode(item, buf);
            }
        }
        Value::Map(entries) => {
            buf.push(8);
            len(entries.len(), buf);
            for (k, v) in entries {
                encode(k, buf);
                encode(v, buf);
            }
        }
    }
}

const NULL_HASH: u64 = 0x9e37_79b9_7f4a_7c15;
const LIST_SALT: u64 = 0x6c62_272e_07bb_0142;
const SET_SALT: u64 = 0x2545_f491_4f6c_dd1d;
const MAP_SALT: u64 = 0x5851_f42d_4c95_7f2d;

fn mix(a: u64, b: u64) -> u64 {
    a.rotate_left(23).wrapping_mul(0x9e37_79b9_7f4a_7c15) ^ b
}

impl Model {
    /// Order-independent hash of an instance of this model.
    ///
    /// Shape mismatches hash as empty containers.
    pub fn content_hash(&self, value: &Value) -> u64 {
        if value.is_null() {
            return NULL_HASH;
        }
        match self {
            Model::Value(_) => ContentHasher::LEAF.hash_value(value),
            Model::Bean(bean) => bean.properties().fold(0u64, |acc, property| {
                let child = property.get(value).map_or(NULL_HASH, |v| property.model().content_hash(v));
                let name = ContentHasher::PROPERTY.hash(property.name().as_bytes());
                acc.wrapping_add(mix(name, child))
            }),
            Model::List(list) => list
                .apply(value)
                .unwrap_or_default()
                .iter()
                .fold(LIST_SALT, |acc, item| {
                    acc.wrapping_add(list.element().content_hash(item))
                }),
            Model::Set(set) => set
                .apply(value)
                .unwrap_or_default()
                .iter()
                .fold(SET_SALT, |acc, item| {
                    acc.wrapping_add(set.element().content_hash(item))
                }),
            Model::Map(map) => map
                .apply(value)
                .unwrap_or_default()
                .iter()
                .fold(MAP_SALT, |acc, (k, v)| {
                    acc.wrapping_add(mix(map.key().content_hash(k), map.value().content_hash(v)))
                }),
        }
    }
}
