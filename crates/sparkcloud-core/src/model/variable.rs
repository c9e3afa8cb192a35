use std::fmt;

use serde::{Serialize, Serializer};
use strum::EnumString;

/// Declared type of a device variable, as reported by the detail endpoint.
///
/// Firmware may declare types this crate does not know about; those are
/// preserved verbatim in [`VariableType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum VariableType {
    #[strum(serialize = "int32", serialize = "int")]
    Int32,
    #[strum(serialize = "double")]
    Double,
    #[strum(serialize = "string")]
    String,
    #[strum(serialize = "bool")]
    Bool,
    #[strum(default)]
    Other(String),
}

impl VariableType {
    /// Parse a declared type string. Never fails.
    pub fn from_declared(declared: &str) -> Self {
        declared
            .parse()
            .unwrap_or_else(|_| Self::Other(declared.to_owned()))
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32 => f.write_str("int32"),
            Self::Double => f.write_str("double"),
            Self::String => f.write_str("string"),
            Self::Bool => f.write_str("bool"),
            Self::Other(declared) => f.write_str(declared),
        }
    }
}

impl Serialize for VariableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_parse() {
        assert_eq!(VariableType::from_declared("int32"), VariableType::Int32);
        assert_eq!(VariableType::from_declared("int"), VariableType::Int32);
        assert_eq!(VariableType::from_declared("double"), VariableType::Double);
        assert_eq!(VariableType::from_declared("string"), VariableType::String);
    }

    #[test]
    fn unknown_types_are_preserved() {
        let kind = VariableType::from_declared("uint64");
        assert_eq!(kind, VariableType::Other("uint64".into()));
        assert_eq!(kind.to_string(), "uint64");
    }
}
