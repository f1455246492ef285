//! JSON encoding that keeps key order under control.
//!
//! Decoded documents already keep their source key order (serde_json is built
//! with `preserve_order`). Callers that need a specific order for an object
//! register it with [`SafeJsonEncoder::with_key_order`]; anything the encoder
//! cannot honour is returned as a warning instead of failing the encode.

use crate::error::{JsonFormsError, JsonFormsResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const INDENT: &[u8] = b"    ";

/// Encoded text plus the ordering problems met on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedJson {
    pub text: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SafeJsonEncoder {
    /// JSON pointer -> keys that must come first, in this order
    key_orders: BTreeMap<String, Vec<String>>,
}

impl Default for SafeJsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SafeJsonEncoder {
    /// Pretty encoder with four-space indentation.
    pub fn new() -> Self {
        Self {
            key_orders: BTreeMap::new(),
        }
    }

    /// Put `keys` first, in order, in the object at `pointer` ("" is the root).
    /// Keys not listed keep their relative order after them.
    pub fn with_key_order<I, S>(mut self, pointer: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_orders
            .insert(pointer.to_string(), keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn encode(&self, value: &Value) -> JsonFormsResult<EncodedJson> {
        let mut warnings = Vec::new();

        let text = if self.key_orders.is_empty() {
            self.write(value)?
        } else {
            let mut ordered = value.clone();
            for (pointer, keys) in &self.key_orders {
                self.apply_key_order(&mut ordered, pointer, keys, &mut warnings);
            }
            self.write(&ordered)?
        };

        Ok(EncodedJson { text, warnings })
    }

    fn apply_key_order(
        &self,
        root: &mut Value,
        pointer: &str,
        keys: &[String],
        warnings: &mut Vec<String>,
    ) {
        let map = match root.pointer_mut(pointer) {
            Some(Value::Object(map)) => map,
            Some(_) => {
                warnings.push(format!("key order for '{}' ignored: not an object", pointer));
                return;
            }
            None => {
                warnings.push(format!("key order for '{}' ignored: no such node", pointer));
                return;
            }
        };

        let mut reordered = Map::with_capacity(map.len());
        for key in keys {
            match map.get(key) {
                Some(value) => {
                    reordered.insert(key.clone(), value.clone());
                }
                None => warnings.push(format!(
                    "key order for '{}' names missing key '{}'",
                    pointer, key
                )),
            }
        }
        for (key, value) in map.iter() {
            if !reordered.contains_key(key) {
                reordered.insert(key.clone(), value.clone());
            }
        }
        *map = reordered;
    }

    fn write(&self, value: &Value) -> JsonFormsResult<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| JsonFormsError::Serialization(e.to_string()))
    }
}
