//! Encoding of serde types through the engine

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::decode::{Decode, Decoder};
use crate::encode::{Encode, Encoder};
use crate::error::Result;

/// Adapter that encodes and decodes `T` with serde.
///
/// The value is converted to a [`serde_json::Value`] first so the engine's
/// string escaping applies. Decoding hands serde the value's raw span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Serde<T>(pub T);

impl<T> Deref for Serde<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Serde<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Serialize> Encode for Serde<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        let value = serde_json::to_value(&self.0)?;
        enc.encode_value(&value)
    }
}

impl<T: DeserializeOwned> Decode for Serde<T> {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let raw = dec.raw_value()?;
        self.0 = serde_json::from_slice(raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, from_slice, Error};
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        label: String,
    }

    #[test]
    fn test_round_trip_through_serde() {
        let point = Serde(Point {
            x: 3,
            label: "<p>".to_string(),
        });
        let bytes = encode(&point).unwrap();
        assert_eq!(bytes, br#"{"label":"\u003cp\u003e","x":3}"#);

        let back: Serde<Point> = from_slice(&bytes).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_serde_errors_surface() {
        let err = from_slice::<Serde<Point>>(br#"{"x": "no"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
