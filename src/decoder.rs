//! Value decoders.
//!
//! A decoder turns the raw bytes of a matched cell into a [`DecodedValue`].
//! The set of kinds is open: [`DecoderRegistry::register`] adds new ones
//! next to the built-ins.

use std::{collections::HashMap, fmt, str::Utf8Error, sync::Arc};

use serde::Serialize;
use thiserror::Error;

/// Decoded cell value handed to the row accumulator.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    /// UTF-8 text.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Signed 64-bit integer.
    Long(i64),
    /// 64-bit float.
    Double(f64),
    /// Boolean.
    Bool(bool),
}

/// Failures raised by a decoder for a single cell value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The value is not valid UTF-8.
    #[error("value is not valid utf-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
    /// The value text does not parse as the expected number type.
    #[error("'{text}' is not a valid {kind}")]
    InvalidNumber {
        /// Target kind.
        kind: &'static str,
        /// Offending text.
        text: String,
    },
    /// The value text is neither `true` nor `false`.
    #[error("'{0}' is not a valid boolean")]
    InvalidBool(String),
}

/// Converts raw value bytes into a decoded value.
pub trait ValueDecoder: fmt::Debug + Send + Sync {
    /// Decode one cell value.
    fn decode(&self, value: &[u8]) -> Result<DecodedValue, DecodeError>;
}

/// UTF-8 text.
#[derive(Debug, Default)]
pub struct StringDecoder;

impl ValueDecoder for StringDecoder {
    fn decode(&self, value: &[u8]) -> Result<DecodedValue, DecodeError> {
        Ok(DecodedValue::Str(std::str::from_utf8(value)?.to_owned()))
    }
}

/// Value bytes passed through untouched.
#[derive(Debug, Default)]
pub struct BytesDecoder;

impl ValueDecoder for BytesDecoder {
    fn decode(&self, value: &[u8]) -> Result<DecodedValue, DecodeError> {
        Ok(DecodedValue::Bytes(value.to_vec()))
    }
}

/// Decimal integer text.
#[derive(Debug, Default)]
pub struct LongDecoder;

impl ValueDecoder for LongDecoder {
    fn decode(&self, value: &[u8]) -> Result<DecodedValue, DecodeError> {
        let text = std::str::from_utf8(value)?;
        text.parse()
            .map(DecodedValue::Long)
            .map_err(|_| DecodeError::InvalidNumber {
                kind: "long",
                text: text.to_owned(),
            })
    }
}

/// Floating point text.
#[derive(Debug, Default)]
pub struct DoubleDecoder;

impl ValueDecoder for DoubleDecoder {
    fn decode(&self, value: &[u8]) -> Result<DecodedValue, DecodeError> {
        let text = std::str::from_utf8(value)?;
        text.parse()
            .map(DecodedValue::Double)
            .map_err(|_| DecodeError::InvalidNumber {
                kind: "double",
                text: text.to_owned(),
            })
    }
}

/// `true` / `false`, case-insensitive.
#[derive(Debug, Default)]
pub struct BoolDecoder;

impl ValueDecoder for BoolDecoder {
    fn decode(&self, value: &[u8]) -> Result<DecodedValue, DecodeError> {
        let text = std::str::from_utf8(value)?;
        if text.eq_ignore_ascii_case("true") {
            Ok(DecodedValue::Bool(true))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(DecodedValue::Bool(false))
        } else {
            Err(DecodeError::InvalidBool(text.to_owned()))
        }
    }
}

/// Decoder kinds available when building a schema index.
///
/// Kind names are matched case-insensitively.
#[derive(Clone, Debug)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn ValueDecoder>>,
}

impl DecoderRegistry {
    /// Registry without any kinds.
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register (or replace) the decoder used for `kind`.
    pub fn register(&mut self, kind: &str, decoder: Arc<dyn ValueDecoder>) -> &mut Self {
        self.decoders.insert(kind.to_ascii_lowercase(), decoder);
        self
    }

    /// Look up the decoder registered for `kind`.
    pub fn resolve(&self, kind: &str) -> Option<Arc<dyn ValueDecoder>> {
        self.decoders.get(&kind.to_ascii_lowercase()).cloned()
    }
}

impl Default for DecoderRegistry {
    /// Registry holding the built-in kinds: `string`, `bytes`, `long`,
    /// `double` and `boolean`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("string", Arc::new(StringDecoder))
            .register("bytes", Arc::new(BytesDecoder))
            .register("long", Arc::new(LongDecoder))
            .register("double", Arc::new(DoubleDecoder))
            .register("boolean", Arc::new(BoolDecoder));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_decoder_rejects_invalid_utf8() {
        let decoder = StringDecoder;
        assert_eq!(
            decoder.decode(b"hello").expect("decode"),
            DecodedValue::Str("hello".into())
        );
        assert!(matches!(
            decoder.decode(&[0xff, 0xfe]),
            Err(DecodeError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn numeric_decoders_parse_text() {
        assert_eq!(
            LongDecoder.decode(b"-42").expect("long"),
            DecodedValue::Long(-42)
        );
        assert_eq!(
            DoubleDecoder.decode(b"2.5").expect("double"),
            DecodedValue::Double(2.5)
        );
        assert_eq!(
            LongDecoder.decode(b"4.2"),
            Err(DecodeError::InvalidNumber {
                kind: "long",
                text: "4.2".into(),
            })
        );
    }

    #[test]
    fn bool_decoder_is_case_insensitive() {
        assert_eq!(
            BoolDecoder.decode(b"TRUE").expect("bool"),
            DecodedValue::Bool(true)
        );
        assert_eq!(
            BoolDecoder.decode(b"false").expect("bool"),
            DecodedValue::Bool(false)
        );
        assert_eq!(
            BoolDecoder.decode(b"yes"),
            Err(DecodeError::InvalidBool("yes".into()))
        );
    }

    #[test]
    fn registry_resolves_kinds_case_insensitively() {
        let registry = DecoderRegistry::default();
        let decoder = registry.resolve("String").expect("string kind");
        assert_eq!(
            decoder.decode(b"x").expect("decode"),
            DecodedValue::Str("x".into())
        );
        assert!(registry.resolve("avro").is_none());
        assert!(DecoderRegistry::empty().resolve("string").is_none());
    }

    #[test]
    fn registry_accepts_custom_kinds() {
        #[derive(Debug)]
        struct Upper;

        impl ValueDecoder for Upper {
            fn decode(&self, value: &[u8]) -> Result<DecodedValue, DecodeError> {
                Ok(DecodedValue::Str(
                    std::str::from_utf8(value)?.to_ascii_uppercase(),
                ))
            }
        }

        let mut registry = DecoderRegistry::default();
        registry.register("UPPER", Arc::new(Upper));
        let decoder = registry.resolve("upper").expect("custom kind");
        assert_eq!(
            decoder.decode(b"abc").expect("decode"),
            DecodedValue::Str("ABC".into())
        );
    }

    #[test]
    fn decoded_values_serialize_untagged() {
        let values = vec![
            DecodedValue::Str("s".into()),
            DecodedValue::Long(7),
            DecodedValue::Bool(true),
        ];
        assert_eq!(
            serde_json::to_string(&values).expect("json"),
            r#"["s",7,true]"#
        );
    }
}
