use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Returned when a runtime string cannot be parsed back into a minute count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid runtime format")]
pub struct RuntimeFormatError;

/// A movie's runtime in whole minutes.
///
/// Stored as a plain integer column, but exposed externally as the string
/// `"<minutes> mins"`. The conversion is a pure value transformation handled
/// by [`Runtime::encode`] and [`Runtime::decode`]; the `serde` impls below
/// just route through those two functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct Runtime(pub i32);

impl Runtime {
    /// Returns the raw minute count.
    pub fn minutes(self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Encodes the minute count into its external textual form.
    ///
    /// Encoding is total: any stored integer value produces a string.
    pub fn encode(self) -> String {
        format!("{} mins", self.0)
    }

    /// Decodes the external textual form back into a minute count.
    ///
    /// The input must split on a single space into exactly two tokens, the
    /// second literally `mins` and the first a base-10 32-bit integer. Any
    /// deviation fails with [`RuntimeFormatError`].
    pub fn decode(value: &str) -> Result<Runtime, RuntimeFormatError> {
        let parts: Vec<&str> = value.split(' ').collect();
        if parts.len() != 2 || parts[1] != "mins" {
            return Err(RuntimeFormatError);
        }
        let minutes: i32 = parts[0].parse().map_err(|_| RuntimeFormatError)?;
        Ok(Runtime(minutes))
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl Serialize for Runtime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuntimeVisitor;

        impl Visitor<'_> for RuntimeVisitor {
            type Value = Runtime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string in the format \"<minutes> mins\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<Runtime, E>
            where
                E: de::Error,
            {
                Runtime::decode(value).map_err(E::custom)
            }
        }

        // Anything other than a JSON string (i.e. unparsable quoting) is
        // rejected by the visitor before decode() ever runs.
        deserializer.deserialize_str(RuntimeVisitor)
    }
}
