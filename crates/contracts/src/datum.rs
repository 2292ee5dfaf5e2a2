//! Datum - one unit of data flowing through a path

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One unit of data produced by a source module on a path.
///
/// The payload is opaque to the router; producing and consuming modules
/// agree on its encoding out of band. `attributes` carries module-defined
/// metadata such as a content type or the peer the datum arrived from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Datum {
    /// Path the datum was produced on
    pub path: String,

    /// Raw payload bytes
    pub payload: Bytes,

    /// Module-defined metadata
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Datum {
    /// Create a datum with an empty attribute set
    pub fn new(path: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            payload: payload.into(),
            attributes: Map::new(),
        }
    }

    /// Attach an attribute (builder style)
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datum_builder() {
        let datum = Datum::new("/timer/tick", "payload".as_bytes())
            .with_attribute("content_type", "text/plain");

        assert_eq!(datum.path, "/timer/tick");
        assert_eq!(&datum.payload[..], b"payload");
        assert_eq!(
            datum.attributes.get("content_type").and_then(Value::as_str),
            Some("text/plain")
        );
    }
}
