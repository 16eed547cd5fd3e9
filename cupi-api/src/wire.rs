//! Serialization helpers for the server's string-typed fields.
//!
//! Flags travel as `"true"` / `"false"` and numbers as decimal strings.
//! Request payloads keep native types and use these with
//! `#[serde(serialize_with = ...)]`.

use std::fmt::Display;

use serde::Serializer;

/// The wire token for a flag.
pub fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn bool_token<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(flag(*value))
}

/// For `Option<bool>` fields that are skipped when `None`.
pub fn opt_bool_token<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(flag(*v)),
        None => serializer.serialize_none(),
    }
}

pub fn num_token<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// For `Option<T>` numeric fields that are skipped when `None`.
pub fn opt_num_token<T: Display, S: Serializer>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}

/// Percent-encode a value for use as a single path segment.
///
/// Greeting names contain spaces ("Off Hours") and menu keys include `#`.
pub fn path_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'*' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Sample {
        #[serde(serialize_with = "bool_token")]
        active: bool,
        #[serde(serialize_with = "num_token")]
        start: u16,
        #[serde(skip_serializing_if = "Option::is_none", serialize_with = "opt_bool_token")]
        locked: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", serialize_with = "opt_num_token")]
        rings: Option<u32>,
    }

    #[test]
    fn test_tokens_serialize_as_strings() {
        let json = serde_json::to_value(Sample {
            active: true,
            start: 510,
            locked: Some(false),
            rings: None,
        })
        .unwrap();
        assert_eq!(json["active"], "true");
        assert_eq!(json["start"], "510");
        assert_eq!(json["locked"], "false");
        assert!(json.get("rings").is_none());
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("Off Hours"), "Off%20Hours");
        assert_eq!(path_segment("#"), "%23");
        assert_eq!(path_segment("*"), "*");
        assert_eq!(path_segment("Standard"), "Standard");
    }
}
