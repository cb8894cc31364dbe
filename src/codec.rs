//! Reversible masking of the numeric and text fields the API stores in obfuscated form.
//!
//! This is obfuscation and nothing more. Anyone who knows the marker strings and the offset can
//! recover every value, so nothing in here should be treated as a security boundary.
//!
//! Numbers are stored as `value - offset` with three marker strings spliced into the digits. Text
//! is stored with its characters reversed.

use crate::model::{Transaction, TransactionRecord};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Formatter};

/// The first fixed marker spliced into encoded numbers.
pub const NAME_MARKER: &str = "THisis";

/// The second fixed marker spliced into encoded numbers.
pub const AGE_MARKER: &str = "MyAge";

/// The deployment-wide secret marker used when none is configured.
pub const DEFAULT_SECRET_MARKER: &str = "KeonExpr07th78";

/// The deployment-wide offset used when none is configured.
pub const DEFAULT_OFFSET: i64 = 112407;

/// Holds the two deployment constants needed to encode and decode numbers.
///
/// # Examples
///
/// ```
/// # use angadia_ledger::codec::Codec;
/// let codec = Codec::default();
/// assert_eq!(codec.decode_number("THisis-112KeonExpr07th78207MyAge"), Some(200));
/// assert_eq!(codec.decode_number(&codec.encode_number(5_000)), Some(5_000));
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Codec {
    secret_marker: String,
    offset: i64,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            secret_marker: DEFAULT_SECRET_MARKER.to_string(),
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Codec {
    pub fn new(secret_marker: impl Into<String>, offset: i64) -> Self {
        Self {
            secret_marker: secret_marker.into(),
            offset,
        }
    }

    pub fn secret_marker(&self) -> &str {
        &self.secret_marker
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Recovers a number from its encoded form.
    ///
    /// - Empty input decodes to `Some(0)`; an absent value is not an error.
    /// - Returns `None` when the remainder, after the markers are removed, does not start with an
    ///   integer or when adding the offset overflows. Callers fold `None` as zero.
    pub fn decode_number(&self, encoded: &str) -> Option<i64> {
        if encoded.is_empty() {
            return Some(0);
        }
        let mut remainder = encoded.to_string();
        if !self.secret_marker.is_empty() {
            remainder = remainder.replace(&self.secret_marker, "");
        }
        let remainder = remainder.replace(NAME_MARKER, "").replace(AGE_MARKER, "");
        let shifted = parse_integer_prefix(&remainder)?;
        i64::try_from(shifted + i128::from(self.offset)).ok()
    }

    /// Encodes `n` so that `decode_number` recovers it exactly.
    ///
    /// The shifted digits are split at their midpoint and the secret marker is placed between the
    /// two halves.
    pub fn encode_number(&self, n: i64) -> String {
        let shifted = (i128::from(n) - i128::from(self.offset)).to_string();
        let (head, tail) = shifted.split_at(shifted.len() / 2);
        format!(
            "{NAME_MARKER}{head}{}{tail}{AGE_MARKER}",
            self.secret_marker
        )
    }

    /// Decodes an `Encoded` number field. See `decode_number`.
    pub fn decode(&self, encoded: &Encoded) -> Option<i64> {
        self.decode_number(encoded.as_str())
    }

    /// Decodes the points, names and mobiles of `record` in one pass.
    pub fn decode_transaction(&self, record: &TransactionRecord) -> Transaction {
        record.decode(self)
    }
}

/// Recovers text from its encoded form by reversing its characters.
///
/// This is its own inverse: `decode_text(&decode_text(s)) == s`.
pub fn decode_text(encoded: &str) -> String {
    encoded.chars().rev().collect()
}

/// Encodes text. Identical to `decode_text`.
pub fn encode_text(text: &str) -> String {
    decode_text(text)
}

/// Parses the leading integer of `s` the way a lenient `parseInt` does: leading whitespace is
/// skipped, an optional sign is accepted and parsing stops at the first non-digit.
fn parse_integer_prefix(s: &str) -> Option<i128> {
    let s = s.trim_start();
    let (negative, rest) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i128 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// A field value as it arrives from the API, before decoding. It carries no meaning until it is
/// passed through `Codec::decode` or `decode_text`.
///
/// Deserialization accepts a string, a number, `null` or a missing key. `null` and missing become
/// the empty value. Anything else is kept as its JSON text so that it fails to decode later
/// instead of failing the whole record.
#[derive(Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Encoded(String);

impl Encoded {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for Encoded {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Encoded({:?})", self.0)
    }
}

impl From<String> for Encoded {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Encoded {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for Encoded {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Encoded {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
            Other(serde_json::Value),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Encoded::default(),
            Some(Raw::Text(s)) => Encoded(s),
            Some(Raw::Number(n)) => Encoded(n.to_string()),
            Some(Raw::Other(v)) => Encoded(v.to_string()),
        })
    }
}
