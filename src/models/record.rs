//! Field order of JSON records as they were read.

use serde::de::{self, DeserializeOwned};
use serde::ser;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Keys of a record in the order they appeared in the document.
///
/// Records built in code have an empty order and serialize in declaration
/// order. Records read from a document are written back with their keys
/// in the same order, so untouched records keep their bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOrder(Vec<String>);

impl KeyOrder {
    /// Captures the key order of `fields`.
    fn of(fields: &Map<String, Value>) -> Self {
        Self(fields.keys().cloned().collect())
    }

    /// Returns `true` if no order was captured.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `key` was present when the record was read.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|known| known == key)
    }

    /// Reorders `fields`: remembered keys first, then keys added since.
    fn arrange(&self, fields: Map<String, Value>) -> Map<String, Value> {
        if self.is_empty() {
            return fields;
        }
        let mut arranged = Map::with_capacity(fields.len());
        for key in &self.0 {
            if let Some(value) = fields.get(key) {
                let _previous = arranged.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in fields {
            if !arranged.contains_key(&key) {
                let _previous = arranged.insert(key, value);
            }
        }
        arranged
    }
}

/// Deserializes a record through a JSON object, capturing its key order.
pub(super) fn deserialize_ordered<'de, T, D>(deserializer: D) -> Result<(T, KeyOrder), D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let fields = Map::<String, Value>::deserialize(deserializer)?;
    let order = KeyOrder::of(&fields);
    let record = serde_json::from_value(Value::Object(fields))
        .map_err(<D::Error as de::Error>::custom)?;
    Ok((record, order))
}

/// Serializes a record with its keys arranged by `order`.
pub(super) fn serialize_ordered<T, S>(
    record: &T,
    order: &KeyOrder,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let value = serde_json::to_value(record).map_err(<S::Error as ser::Error>::custom)?;
    if let Value::Object(fields) = value {
        order.arrange(fields).serialize(serializer)
    } else {
        value.serialize(serializer)
    }
}
