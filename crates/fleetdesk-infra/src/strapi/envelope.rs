//! Decoding of `{ data, meta }` response envelopes
//!
//! `data` may be an array, a single object, or, when a wrapping layer has
//! already enveloped the body once more, another `{ data, meta }` object.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use fleetdesk_domain::model::Pagination;
use fleetdesk_types::ApiError;

/// Split a body into its payload and `meta` block
fn unwrap_envelope(body: Value) -> (Value, Option<Value>) {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            let data = map.remove("data").unwrap_or(Value::Null);
            let meta = map.remove("meta");
            if is_nested_envelope(&data) {
                let (inner_data, inner_meta) = unwrap_envelope(data);
                (inner_data, inner_meta.or(meta))
            } else {
                (data, meta)
            }
        }
        other => (other, None),
    }
}

fn is_nested_envelope(data: &Value) -> bool {
    match data {
        Value::Object(map) => {
            map.contains_key("data")
                && (map.contains_key("meta") || map.get("data").is_some_and(Value::is_array))
        }
        _ => false,
    }
}

fn pagination_from_meta(meta: Option<&Value>) -> Option<Pagination> {
    let pagination = meta?.get("pagination")?;
    serde_json::from_value(pagination.clone()).ok()
}

/// Decode a list body into records and optional pagination.
///
/// Records that do not decode are logged and skipped.
pub fn decode_list<T: DeserializeOwned>(
    body: Value,
) -> Result<(Vec<T>, Option<Pagination>), ApiError> {
    let (data, meta) = unwrap_envelope(body);
    let pagination = pagination_from_meta(meta.as_ref());
    let items = match data {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single @ Value::Object(_) => vec![single],
        other => {
            return Err(ApiError::Decode(format!(
                "expected a list of records, got {}",
                type_name(&other)
            )))
        }
    };
    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let id = record_label(&item);
            match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, id = %id, "Skipping undecodable record: {}", e);
                    None
                }
            }
        })
        .collect();
    if records.len() < total {
        warn!(skipped = total - records.len(), total, "Some records could not be decoded");
    }
    Ok((records, pagination))
}

/// Decode a single-record body. `data: null` yields `None`.
pub fn decode_one<T: DeserializeOwned>(body: Value) -> Result<Option<T>, ApiError> {
    let (data, _) = unwrap_envelope(body);
    match data {
        Value::Null => Ok(None),
        Value::Array(mut items) => match items.len() {
            0 => Ok(None),
            1 => serde_json::from_value(items.remove(0))
                .map(Some)
                .map_err(|e| ApiError::Decode(e.to_string())),
            n => Err(ApiError::Decode(format!("expected one record, got {}", n))),
        },
        other => serde_json::from_value(other)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string())),
    }
}

fn record_label(item: &Value) -> String {
    item.get("documentId")
        .or_else(|| item.get("id"))
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
