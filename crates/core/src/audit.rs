//! Activity-log constants and payload redaction.
//!
//! Every mutation writes one activity-log row carrying a copy of its payload.
//! Before storage the payload passes through [`redact_payload`] so credential
//! material never lands in the audit table.

// ---------------------------------------------------------------------------
// Action constants
// ---------------------------------------------------------------------------

/// Known action names for activity-log rows.
pub mod actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const RESTORE: &str = "restore";
    pub const IMPORT: &str = "import";
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
}

/// Known entity-type names used in activity-log rows and error messages.
pub mod entity_types {
    pub const PRODUCTION_RECORD: &str = "production_record";
    pub const BIOSECURITY_CASE: &str = "biosecurity_case";
    pub const RETAIL_PRICE: &str = "retail_price";
    pub const LIVESTOCK_STOCK: &str = "livestock_stock";
    pub const PRODUCT: &str = "product";
    pub const USER: &str = "user";
}

// ---------------------------------------------------------------------------
// Payload redaction
// ---------------------------------------------------------------------------

/// JSON keys stripped from audit payloads before storage.
const REDACTED_KEYS: &[&str] = &["password", "password_hash", "token", "refresh_token"];

/// Replacement value written in place of redacted fields.
const REDACTION_MARKER: &str = "[REDACTED]";

/// Recursively redact sensitive keys from an audit payload.
///
/// Object keys matching [`REDACTED_KEYS`] (case-insensitive) have their
/// values replaced with a marker string; nested objects and arrays are
/// walked. Non-container values pass through unchanged.
pub fn redact_payload(mut payload: serde_json::Value) -> serde_json::Value {
    redact_in_place(&mut payload);
    payload
}

fn redact_in_place(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = serde_json::Value::String(REDACTION_MARKER.to_string());
                } else {
                    redact_in_place(val);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                redact_in_place(item);
            }
        }
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    REDACTED_KEYS.contains(&lower.as_str())
}
