// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use serde_json::{Map, Value};

/// Deep merge of `overlay` onto `base`, returning the result.
///
/// Objects merge key by key and arrays merge index by index. Any other
/// overlay value replaces the base value, so an array overlay replaces an
/// object and vice versa.
pub fn merged(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut target), Value::Object(source)) => {
            for (key, value) in source {
                let slot = target.remove(&key).unwrap_or(Value::Null);
                target.insert(key, merge_slot(slot, value));
            }
            Value::Object(target)
        }
        (Value::Array(mut target), Value::Array(source)) => {
            for (index, value) in source.into_iter().enumerate() {
                if index < target.len() {
                    let slot = std::mem::take(&mut target[index]);
                    target[index] = merge_slot(slot, value);
                } else {
                    target.push(merge_slot(Value::Null, value));
                }
            }
            Value::Array(target)
        }
        (_, overlay) => overlay,
    }
}

/// Containers landing on a scalar start from an empty container so the
/// result never aliases the overlay's shape by accident.
fn merge_slot(slot: Value, value: Value) -> Value {
    match (&slot, &value) {
        (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_)) => merged(slot, value),
        (_, Value::Object(_)) => merged(Value::Object(Map::new()), value),
        (_, Value::Array(_)) => merged(Value::Array(Vec::new()), value),
        _ => value,
    }
}

/// Folds every layer onto an empty object, left to right.
pub fn merge_all<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers
        .into_iter()
        .fold(Value::Object(Map::new()), merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_objects_merge_recursively() {
        let base = json!({ "chart": { "type": "line", "zoomType": "x" }, "legend": { "enabled": true } });
        let overlay = json!({ "chart": { "type": "area" }, "legend": { "enabled": false } });
        assert_eq!(
            merged(base, overlay),
            json!({ "chart": { "type": "area", "zoomType": "x" }, "legend": { "enabled": false } })
        );
    }

    #[test]
    fn test_arrays_merge_by_index() {
        let base = json!({ "series": [{ "name": "a", "visible": false }, { "name": "b" }] });
        let overlay = json!({ "series": [{ "name": "x" }, {}, { "name": "c" }] });
        assert_eq!(
            merged(base, overlay),
            json!({ "series": [{ "name": "x", "visible": false }, { "name": "b" }, { "name": "c" }] })
        );
    }

    #[test]
    fn test_array_replaces_object() {
        let base = json!({ "yAxis": { "title": { "text": "Amount" } } });
        let overlay = json!({ "yAxis": [{ "opposite": false }, { "opposite": true }] });
        assert_eq!(
            merged(base, overlay),
            json!({ "yAxis": [{ "opposite": false }, { "opposite": true }] })
        );
    }

    #[test]
    fn test_merge_all_starts_empty() {
        let tree = merge_all([json!({ "a": 1 }), json!({ "b": { "c": 2 } }), json!({ "b": { "d": 3 } })]);
        assert_eq!(tree, json!({ "a": 1, "b": { "c": 2, "d": 3 } }));
        assert_eq!(merge_all(Vec::new()), json!({}));
    }
}
