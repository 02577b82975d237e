//! Network identifier shared by the node, edge, ranking and parameter tables.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque network identifier, compared by normalized text.
///
/// The tables were written by different tools, so the same network can show
/// up as `3`, `3.0` or ` 3 `. Normalization trims whitespace and renders any
/// integral number as plain integer text; everything else keeps its trimmed
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as an integer, when its normalized text is one.
    pub fn as_int(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Whether a raw cell from some table names this network.
    pub fn matches(&self, raw: &str) -> bool {
        normalize(raw) == self.0
    }
}

/// Canonical text for an id-like cell.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return i.to_string();
    }
    match trimmed.parse::<f64>() {
        // Beyond 2^53 floats stop representing every integer.
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => (f as i64).to_string(),
        _ => trimmed.to_owned(),
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for NetworkId {
    fn from(v: i64) -> Self {
        Self(v.to_string())
    }
}

impl From<&str> for NetworkId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for NetworkId {
    fn from(v: String) -> Self {
        Self::new(&v)
    }
}

impl FromStr for NetworkId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ============================================================================
// Serde: integral ids as JSON numbers, the rest as strings
// ============================================================================

impl Serialize for NetworkId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_int() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = NetworkId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a network id as integer, float or string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NetworkId, E> {
                Ok(NetworkId::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NetworkId, E> {
                Ok(NetworkId::new(&v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<NetworkId, E> {
                Ok(NetworkId::new(&v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NetworkId, E> {
                Ok(NetworkId::new(v))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_spellings_match() {
        let id = NetworkId::from(3);
        assert!(id.matches("3"));
        assert!(id.matches(" 3 "));
        assert!(id.matches("3.0"));
        assert!(id.matches("03"));
        assert!(!id.matches("30"));
        assert!(!id.matches("3.5"));
    }

    #[test]
    fn test_non_numeric_ids_keep_text() {
        let id = NetworkId::new(" net-a ");
        assert_eq!(id.as_str(), "net-a");
        assert_eq!(id.as_int(), None);
        assert!(id.matches("net-a"));
        assert!(!id.matches("NET-A"));
    }

    #[test]
    fn test_fractional_ids_are_not_truncated() {
        assert_eq!(NetworkId::new("2.50").as_str(), "2.50");
        assert!(!NetworkId::from(2).matches("2.5"));
    }

    #[test]
    fn test_serde_shape() {
        assert_eq!(serde_json::to_string(&NetworkId::new("7.0")).unwrap(), "7");
        assert_eq!(serde_json::to_string(&NetworkId::new("x1")).unwrap(), "\"x1\"");
        let back: NetworkId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(back, NetworkId::from(7));
    }
}
