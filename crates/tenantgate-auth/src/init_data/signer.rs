//! Produces signed init-data payloads.
//!
//! The chat host signs payloads in production; this exists for local
//! development against a test bot token and for tests.

use std::collections::BTreeMap;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use tenantgate_core::error::AppError;

use super::parser::{HASH_FIELD, check_string};
use super::verifier::compute_hash;

/// Signs `fields` with `secret` and returns the form-encoded payload with
/// `hash` appended.
pub fn sign_init_data<'a>(
    fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    secret: &[u8],
) -> Result<String, AppError> {
    let fields: BTreeMap<String, String> = fields
        .into_iter()
        .filter(|(key, _)| *key != HASH_FIELD)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    let hash = compute_hash(&check_string(&fields), secret)?;

    let mut encoded: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect();
    encoded.push(format!("{HASH_FIELD}={hash}"));

    Ok(encoded.join("&"))
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_data::parser::parse;

    #[test]
    fn test_signed_payload_parses_back() {
        let raw = sign_init_data(
            [("auth_date", "1700000000"), ("user", r#"{"id":1,"first_name":"A B"}"#)],
            b"token",
        )
        .expect("sign");

        let parsed = parse(&raw).expect("parse");
        assert_eq!(parsed.get("user"), Some(r#"{"id":1,"first_name":"A B"}"#));
        assert_eq!(parsed.hash.len(), 64);
    }

    #[test]
    fn test_caller_supplied_hash_is_replaced() {
        let raw = sign_init_data([("auth_date", "1"), ("hash", "forged")], b"token").expect("sign");
        assert!(!raw.contains("forged"));
    }
}
