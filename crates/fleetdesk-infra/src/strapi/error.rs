//! Reducing error bodies to one human-readable message
//!
//! Order: Strapi nested error, validation arrays, plain message, HTTP status,
//! catch-all.

use serde_json::Value;

/// Best-effort message for a failed response
pub fn extract_error_message(status: u16, body: Option<&Value>) -> String {
    if let Some(body) = body {
        if let Some(message) = strapi_error(body) {
            return message;
        }
        if let Some(message) = validation_errors(body) {
            return message;
        }
        if let Some(message) = plain_message(body) {
            return message;
        }
    }
    status_message(status)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unexpected error (HTTP {})", status))
}

/// Generic message for common HTTP statuses
pub fn status_message(status: u16) -> Option<&'static str> {
    let message = match status {
        400 => "Bad request. Please check the submitted data",
        401 => "Unauthorized. Please log in again",
        403 => "Forbidden. You do not have permission for this action",
        404 => "The requested record was not found",
        409 => "Conflict. The record was changed or already exists",
        413 => "Request too large",
        422 => "Validation failed",
        429 => "Too many requests. Please try again later",
        500 => "Internal server error",
        502 => "Bad gateway. The server is unreachable",
        503 => "Service unavailable. Please try again later",
        504 => "Gateway timeout. The server took too long to respond",
        _ => return None,
    };
    Some(message)
}

/// `{ "error": { "status", "name", "message", "details": { "errors": [...] } } }`
fn strapi_error(body: &Value) -> Option<String> {
    let error = body.get("error")?.as_object()?;
    let message = error.get("message")?.as_str()?.trim();
    if message.is_empty() {
        return None;
    }
    let details: Vec<String> = error
        .get("details")
        .and_then(|d| d.get("errors"))
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(describe_entry).collect())
        .unwrap_or_default();

    if details.is_empty() || (details.len() == 1 && details[0] == message) {
        Some(message.to_string())
    } else {
        Some(format!("{}: {}", message, details.join("; ")))
    }
}

/// `{ "errors": [...] }` or `{ "message": [ { "messages": [...] } ] }`
fn validation_errors(body: &Value) -> Option<String> {
    let entries = body
        .get("errors")
        .and_then(Value::as_array)
        .or_else(|| body.get("message").and_then(Value::as_array))?;
    let messages: Vec<String> = entries.iter().filter_map(describe_entry).collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

fn plain_message(body: &Value) -> Option<String> {
    let text = match body {
        Value::String(s) => Some(s.as_str()),
        _ => body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("error").and_then(Value::as_str)),
    }?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn describe_entry(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => {
            if let Some(nested) = obj.get("messages").and_then(Value::as_array) {
                let inner: Vec<String> = nested.iter().filter_map(describe_entry).collect();
                return if inner.is_empty() {
                    None
                } else {
                    Some(inner.join("; "))
                };
            }
            let message = obj.get("message")?.as_str()?;
            match obj.get("path").and_then(path_string) {
                Some(path) if !path.is_empty() => Some(format!("{} ({})", message, path)),
                _ => Some(message.to_string()),
            }
        }
        _ => None,
    }
}

fn path_string(path: &Value) -> Option<String> {
    match path {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => Some(
            parts
                .iter()
                .map(|p| match p {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("."),
        ),
        _ => None,
    }
}
