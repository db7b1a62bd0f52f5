//! Response envelope handling.
//!
//! Every WSAPI response wraps its payload in one of two envelopes:
//!
//! ```text
//! { "Result":          { "Errors": [...], "Warnings": [...], ... } }
//! { "OperationResult": { "Errors": [...], "Warnings": [...], "SecurityToken": "...", ... } }
//! ```
//!
//! A non-empty `Errors` list is a failure regardless of the HTTP status.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, ErrorKind, Result};

/// Status line and headers of a transport response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMeta {
    pub status: u16,
    /// Header names are lowercase.
    pub headers: BTreeMap<String, String>,
}

impl ResponseMeta {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
        }
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// What a transport hands back after a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub meta: ResponseMeta,
    /// Decoded JSON body. A body that failed to decode is kept as a string.
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            meta: ResponseMeta::new(status),
            body,
        }
    }
}

/// The content of a `Result` or `OperationResult` envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "Errors", default)]
    pub errors: Vec<String>,
    #[serde(rename = "Warnings", default)]
    pub warnings: Vec<String>,
    /// Everything else in the envelope, untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Payload {
    /// Look up a payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `SecurityToken` field of an authorize response.
    pub fn security_token(&self) -> Option<&str> {
        self.get("SecurityToken").and_then(Value::as_str)
    }

    /// The `Object` field of a create/read/update response.
    pub fn object(&self) -> Option<&Value> {
        self.get("Object")
    }

    /// Deserialize the `Object` field.
    pub fn object_as<T: DeserializeOwned>(&self) -> Result<T> {
        let object = self
            .object()
            .ok_or_else(|| Error::new(ErrorKind::Json("payload has no Object field".into())))?;
        serde_json::from_value(object.clone()).map_err(Into::into)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The payload in its wire shape.
    pub fn into_value(self) -> Value {
        let mut map = self.fields;
        map.insert(
            "Errors".to_string(),
            Value::Array(self.errors.into_iter().map(Value::String).collect()),
        );
        map.insert(
            "Warnings".to_string(),
            Value::Array(self.warnings.into_iter().map(Value::String).collect()),
        );
        Value::Object(map)
    }
}

/// The two envelope shapes the service returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Envelope {
    Result(Payload),
    OperationResult(Payload),
}

impl Envelope {
    pub fn into_payload(self) -> Payload {
        match self {
            Envelope::Result(payload) | Envelope::OperationResult(payload) => payload,
        }
    }
}

/// Locate the payload in a response and turn envelope errors into failures.
///
/// `url` is only used to describe unusable bodies.
pub fn unwrap_envelope(url: &str, response: TransportResponse) -> Result<Payload> {
    let status = response.meta.status;
    let mut body = match response.body {
        Value::Object(body) => body,
        other => {
            let text = match other {
                Value::String(text) => text,
                other => other.to_string(),
            };
            return Err(Error::new(ErrorKind::InvalidResponse {
                url: url.to_string(),
                status,
                body: sanitize_error_message(&text),
            }));
        }
    };

    let envelope = if let Some(inner) = body.remove("Result") {
        Envelope::Result(serde_json::from_value(inner)?)
    } else if let Some(inner) = body.remove("OperationResult") {
        Envelope::OperationResult(serde_json::from_value(inner)?)
    } else {
        return Err(Error::new(ErrorKind::UnrecognizedEnvelope {
            status,
            keys: body.keys().cloned().collect(),
        }));
    };

    let payload = envelope.into_payload();
    if !payload.errors.is_empty() {
        return Err(Error::wsapi(payload.errors, payload.warnings));
    }
    Ok(payload)
}

/// Sanitize a response-derived message before it ends up in an error.
///
/// - Redacts WSAPI API keys (`_` followed by 30+ alphanumerics)
/// - Redacts session ids and `key=` security tokens in echoed URLs
/// - Truncates messages longer than 500 characters
pub(crate) fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = message.to_string();

    let patterns = [
        (r"_[A-Za-z0-9]{30,}", "[REDACTED_KEY]"),
        (r"(?i)(zsessionid|jsessionid)=[A-Za-z0-9_.\-]+", "$1=[REDACTED]"),
        (r"([?&])key=[A-Za-z0-9_.\-]+", "${1}key=[REDACTED]"),
    ];
    for (pattern, replacement) in patterns {
        if let Ok(re) = regex_lite::Regex::new(pattern) {
            sanitized = re.replace_all(&sanitized, replacement).to_string();
        }
    }

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
