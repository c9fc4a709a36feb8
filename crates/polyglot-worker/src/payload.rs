//! Temporal payload helpers.
//!
//! Workers written with the other Temporal SDKs exchange arguments and results
//! as `json/plain` payloads: the `encoding` metadata key names the format and
//! the body is a JSON document. Encoding and decoding go through the SDK's
//! JSON payload converters; this module adds the handler error mapping, the
//! Go SDK's `binary/null` and positional argument lookup.

use serde::{de::DeserializeOwned, Serialize};
use temporalio_common::protos::coresdk::{AsJsonPayloadExt, FromJsonPayloadExt};

pub use temporalio_common::protos::temporal::api::common::v1::Payload;

use crate::error::HandlerError;

/// Metadata key carrying the payload encoding
pub const ENCODING_KEY: &str = "encoding";

/// Encoding used for JSON-serialized values
pub const JSON_PLAIN: &str = "json/plain";

/// Encoding the Go SDK uses for nil values
pub const BINARY_NULL: &str = "binary/null";

/// Handler-facing operations on [`Payload`]
pub trait PayloadExt: Sized {
    /// Encode a value as a `json/plain` payload
    fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError>;

    /// The declared encoding, if any
    fn encoding(&self) -> Option<&str>;

    /// Decode the payload body.
    ///
    /// `binary/null` decodes as JSON `null`, so it only succeeds for
    /// `Option` targets.
    fn decode<T: DeserializeOwned>(&self) -> Result<T, HandlerError>;
}

impl PayloadExt for Payload {
    fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError> {
        AsJsonPayloadExt::as_json_payload(&value)
            .map_err(|e| HandlerError::Encode(e.to_string()))
    }

    fn encoding(&self) -> Option<&str> {
        self.metadata
            .get(ENCODING_KEY)
            .and_then(|raw| std::str::from_utf8(raw).ok())
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        match self.encoding() {
            Some(JSON_PLAIN) => {
                T::from_json_payload(self).map_err(|e| HandlerError::Decode(e.to_string()))
            }
            Some(BINARY_NULL) => serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| HandlerError::Decode(e.to_string())),
            Some(other) => Err(HandlerError::UnsupportedEncoding(other.to_string())),
            None => Err(HandlerError::UnsupportedEncoding("none".to_string())),
        }
    }
}

/// Decode the required positional argument at `index`
pub fn required_arg<T: DeserializeOwned>(
    args: &[Payload],
    index: usize,
    name: &'static str,
) -> Result<T, HandlerError> {
    args.get(index)
        .ok_or(HandlerError::MissingArgument { index, name })?
        .decode()
}

/// Decode an optional positional argument at `index`
pub fn optional_arg<T: DeserializeOwned>(
    args: &[Payload],
    index: usize,
) -> Result<Option<T>, HandlerError> {
    match args.get(index) {
        Some(payload) => payload.decode::<Option<T>>(),
        None => Ok(None),
    }
}
