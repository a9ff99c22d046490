//! Lenient field access over persisted block payloads.
//!
//! Authored data is loosely typed. Every accessor here returns the documented
//! default for a missing or wrongly-typed field instead of failing, so one bad
//! field never takes its block down with it.

use serde_json::{Map, Value};

use crate::services::{DocumentId, ImageId, PageId};

/// Read-only view over one payload mapping.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    /// View over `value`; anything but a mapping behaves as an empty one.
    pub fn new(value: &'a Value) -> Self {
        Self {
            map: value.as_object(),
        }
    }

    /// View over `value` only if it is a mapping.
    pub fn of(value: &'a Value) -> Option<Self> {
        value.as_object().map(|map| Self { map: Some(map) })
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(key))
    }

    /// Non-blank string value.
    pub fn text(&self, key: &str) -> Option<&'a str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// String value as stored (possibly empty), or `default` when the field is
    /// missing or not a string.
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Integer stored as a number or as free text.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(coerce_int).unwrap_or(default)
    }

    pub fn image(&self, key: &str) -> Option<ImageId> {
        self.get(key).and_then(reference_id).map(ImageId)
    }

    pub fn page(&self, key: &str) -> Option<PageId> {
        self.get(key).and_then(reference_id).map(PageId)
    }

    pub fn document(&self, key: &str) -> Option<DocumentId> {
        self.get(key).and_then(reference_id).map(DocumentId)
    }

    /// Nested mapping.
    pub fn object(&self, key: &str) -> Option<Fields<'a>> {
        self.get(key).and_then(Fields::of)
    }

    /// Raw list value; anything but a list is empty.
    pub fn list(&self, key: &str) -> &'a [Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Struct items of a list field.
    ///
    /// List items may be stored bare or wrapped as `{"type": "item", "value":
    /// {...}}`; both are unwrapped. Items that are not mappings come back as
    /// empty views so positions are kept.
    pub fn items(&self, key: &str) -> Vec<Fields<'a>> {
        self.list(key).iter().map(unwrap_list_item).collect()
    }
}

fn unwrap_list_item(item: &Value) -> Fields<'_> {
    match item.get("type").and_then(Value::as_str) {
        Some("item") => match item.get("value") {
            Some(inner) => Fields::new(inner),
            None => Fields { map: None },
        },
        _ => Fields::new(item),
    }
}

/// Parse an integer from a JSON number or a numeric string.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reference handles are stored as ids, numeric strings, or `{"id": n}`.
fn reference_id(value: &Value) -> Option<i64> {
    match value {
        Value::Object(map) => map.get("id").and_then(coerce_int),
        other => coerce_int(other),
    }
}
