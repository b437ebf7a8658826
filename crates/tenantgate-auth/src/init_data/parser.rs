//! Form decoding and check-string construction.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

use tenantgate_core::error::AppError;

/// Field holding the payload MAC.
pub const HASH_FIELD: &str = "hash";

/// Field holding the signing time (seconds since epoch).
pub const AUTH_DATE_FIELD: &str = "auth_date";

/// Field holding the embedded user object.
pub const USER_FIELD: &str = "user";

/// A decoded payload with its `hash` split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInitData {
    /// Every field except `hash`, sorted by key.
    pub fields: BTreeMap<String, String>,
    /// The hex MAC as sent.
    pub hash: String,
    /// The `auth_date` field, parsed.
    pub auth_date: i64,
}

impl ParsedInitData {
    /// Builds the canonical check-string: `key=value` lines sorted by key and
    /// joined with `\n`. Values are used verbatim, so an embedded JSON object
    /// must arrive in exactly the form the host signed.
    pub fn check_string(&self) -> String {
        check_string(&self.fields)
    }

    /// Returns a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Joins sorted fields into the check-string.
pub fn check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decodes an `application/x-www-form-urlencoded` payload.
///
/// Fails with `MalformedPayload` on missing `hash`/`auth_date`, duplicate keys,
/// invalid escapes, or a non-integer `auth_date`.
pub fn parse(raw: &str) -> Result<ParsedInitData, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::malformed_payload("Init data is empty"));
    }

    let mut fields = BTreeMap::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| AppError::malformed_payload("Init data field without '='"))?;
        let key = decode_component(key)?;
        let value = decode_component(value)?;

        if key.is_empty() {
            return Err(AppError::malformed_payload("Init data field with empty key"));
        }
        if fields.insert(key.clone(), value).is_some() {
            return Err(AppError::malformed_payload(format!(
                "Duplicate init data field '{key}'"
            )));
        }
    }

    let hash = fields
        .remove(HASH_FIELD)
        .ok_or_else(|| AppError::malformed_payload("Init data is missing 'hash'"))?;

    let auth_date = fields
        .get(AUTH_DATE_FIELD)
        .ok_or_else(|| AppError::malformed_payload("Init data is missing 'auth_date'"))?
        .parse::<i64>()
        .map_err(|_| AppError::malformed_payload("Init data 'auth_date' is not an integer"))?;

    Ok(ParsedInitData {
        fields,
        hash,
        auth_date,
    })
}

/// Form-decodes one key or value (`+` is a space).
fn decode_component(component: &str) -> Result<String, AppError> {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| AppError::malformed_payload("Init data is not valid UTF-8"))
}
