use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("Unknown type tag: {0}")]
pub struct UnknownTypeTag(pub String);

/// Scalar kinds a coding-question parameter can take. The string tags
/// ("int", "boolean", ...) are the storage and wire contract and must
/// round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    String,
}

impl ScalarKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Char => "char",
            ScalarKind::String => "string",
        }
    }

    pub fn default_value(&self) -> JsonValue {
        match self {
            ScalarKind::Int | ScalarKind::Long => json!(0),
            ScalarKind::Float | ScalarKind::Double => json!(0.0),
            ScalarKind::Boolean => json!(false),
            ScalarKind::Char => json!("a"),
            ScalarKind::String => json!(""),
        }
    }

    /// Coerce raw text into a value of this kind. Total: unparsable numeric
    /// text collapses to the zero value, unparsable boolean text to `false`,
    /// and textual kinds pass through unchanged.
    pub fn coerce(&self, raw: &str) -> JsonValue {
        match self {
            ScalarKind::Int | ScalarKind::Long => {
                json!(raw.trim().parse::<i64>().unwrap_or(0))
            }
            ScalarKind::Float | ScalarKind::Double => {
                json!(raw.trim().parse::<f64>().unwrap_or(0.0))
            }
            ScalarKind::Boolean => json!(raw.trim().eq_ignore_ascii_case("true")),
            ScalarKind::Char | ScalarKind::String => json!(raw),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ScalarKind {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(ScalarKind::Int),
            "long" => Ok(ScalarKind::Long),
            "float" => Ok(ScalarKind::Float),
            "double" => Ok(ScalarKind::Double),
            "boolean" => Ok(ScalarKind::Boolean),
            "char" => Ok(ScalarKind::Char),
            "string" => Ok(ScalarKind::String),
            other => Err(UnknownTypeTag(other.to_string())),
        }
    }
}

/// Declared type of a parameter: a scalar kind or the array form of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParamType {
    Scalar(ScalarKind),
    Array(ScalarKind),
}

impl ParamType {
    /// Type-appropriate default used when a new test case is seeded from the
    /// current parameter list.
    pub fn default_value(&self) -> JsonValue {
        match self {
            ParamType::Scalar(kind) => kind.default_value(),
            ParamType::Array(ScalarKind::Int) | ParamType::Array(ScalarKind::Long) => {
                json!([0, 0])
            }
            ParamType::Array(ScalarKind::Float) | ParamType::Array(ScalarKind::Double) => {
                json!([0.0, 0.0])
            }
            ParamType::Array(ScalarKind::Boolean) => json!([false, false]),
            ParamType::Array(ScalarKind::Char) => json!(["a", "b"]),
            ParamType::Array(ScalarKind::String) => json!(["", ""]),
        }
    }

    /// Coerce raw text into a value of this declared type.
    ///
    /// Arrays accept either a comma-separated list (each segment trimmed and
    /// coerced per the element kind) or a JSON array literal; anything else
    /// collapses to a single-element array holding the element kind's default.
    pub fn coerce(&self, raw: &str) -> JsonValue {
        match self {
            ParamType::Scalar(kind) => kind.coerce(raw),
            ParamType::Array(kind) => {
                if raw.contains(',') {
                    let items: Vec<JsonValue> =
                        raw.split(',').map(|part| kind.coerce(part.trim())).collect();
                    JsonValue::Array(items)
                } else {
                    match serde_json::from_str::<JsonValue>(raw) {
                        Ok(JsonValue::Array(items)) => JsonValue::Array(items),
                        _ => json!([kind.default_value()]),
                    }
                }
            }
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Scalar(kind) => f.write_str(kind.tag()),
            ParamType::Array(kind) => write!(f, "{}[]", kind.tag()),
        }
    }
}

impl FromStr for ParamType {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix("[]") {
            Some(base) => base
                .parse()
                .map(ParamType::Array)
                .map_err(|_| UnknownTypeTag(s.to_string())),
            None => s.parse().map(ParamType::Scalar),
        }
    }
}

impl TryFrom<String> for ParamType {
    type Error = UnknownTypeTag;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ParamType> for String {
    fn from(ty: ParamType) -> String {
        ty.to_string()
    }
}

/// Declared return type of a coding question's solution function. `void` is
/// legal only here, never as a parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReturnType {
    Void,
    Value(ParamType),
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("void"),
            ReturnType::Value(ty) => ty.fmt(f),
        }
    }
}

impl FromStr for ReturnType {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "void" {
            Ok(ReturnType::Void)
        } else {
            s.parse().map(ReturnType::Value)
        }
    }
}

impl TryFrom<String> for ReturnType {
    type Error = UnknownTypeTag;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ReturnType> for String {
    fn from(ty: ReturnType) -> String {
        ty.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TAGS: &[&str] = &[
        "int", "long", "float", "double", "boolean", "char", "string", "int[]", "long[]",
        "float[]", "double[]", "boolean[]", "char[]", "string[]",
    ];

    #[test]
    fn tags_round_trip() {
        for tag in ALL_TAGS {
            let ty: ParamType = tag.parse().unwrap();
            assert_eq!(&ty.to_string(), tag);
        }
        for tag in ALL_TAGS.iter().chain(["void"].iter()) {
            let ty: ReturnType = tag.parse().unwrap();
            assert_eq!(&ty.to_string(), tag);
        }
    }

    #[test]
    fn void_is_not_a_parameter_type() {
        assert!("void".parse::<ParamType>().is_err());
        assert!("void[]".parse::<ParamType>().is_err());
        assert!("void[]".parse::<ReturnType>().is_err());
    }

    #[test]
    fn unknown_tags_rejected() {
        assert!("uint".parse::<ParamType>().is_err());
        assert!("".parse::<ReturnType>().is_err());
    }

    #[test]
    fn numeric_coercion_falls_back_to_zero() {
        let int = ParamType::Scalar(ScalarKind::Int);
        assert_eq!(int.coerce("42"), json!(42));
        assert_eq!(int.coerce("  -7 "), json!(-7));
        assert_eq!(int.coerce("not a number"), json!(0));
        assert_eq!(int.coerce("4.5"), json!(0));

        let double = ParamType::Scalar(ScalarKind::Double);
        assert_eq!(double.coerce("2.5"), json!(2.5));
        assert_eq!(double.coerce("garbage"), json!(0.0));
    }

    #[test]
    fn boolean_coercion_is_case_insensitive_true() {
        let b = ParamType::Scalar(ScalarKind::Boolean);
        assert_eq!(b.coerce("true"), json!(true));
        assert_eq!(b.coerce(" TRUE "), json!(true));
        assert_eq!(b.coerce("false"), json!(false));
        assert_eq!(b.coerce("yes"), json!(false));
        assert_eq!(b.coerce(""), json!(false));
    }

    #[test]
    fn textual_kinds_pass_through() {
        assert_eq!(ParamType::Scalar(ScalarKind::String).coerce(" hi "), json!(" hi "));
        assert_eq!(ParamType::Scalar(ScalarKind::Char).coerce("x"), json!("x"));
    }

    #[test]
    fn comma_lists_coerce_per_element() {
        let ints = ParamType::Array(ScalarKind::Int);
        assert_eq!(ints.coerce("1, 2, 3"), json!([1, 2, 3]));
        assert_eq!(ints.coerce("1, x, 3"), json!([1, 0, 3]));

        let bools = ParamType::Array(ScalarKind::Boolean);
        assert_eq!(bools.coerce("true, false, TRUE"), json!([true, false, true]));

        let strings = ParamType::Array(ScalarKind::String);
        assert_eq!(strings.coerce(" a , b "), json!(["a", "b"]));
    }

    #[test]
    fn array_literals_and_fallbacks() {
        let ints = ParamType::Array(ScalarKind::Int);
        assert_eq!(ints.coerce("[4]"), json!([4]));
        assert_eq!(ints.coerce("nonsense"), json!([0]));
        // A bare scalar is not an array literal.
        assert_eq!(ints.coerce("5"), json!([0]));

        let chars = ParamType::Array(ScalarKind::Char);
        assert_eq!(chars.coerce("zzz"), json!(["a"]));
    }

    #[test]
    fn defaults_match_declared_types() {
        assert_eq!(ParamType::Scalar(ScalarKind::Long).default_value(), json!(0));
        assert_eq!(ParamType::Scalar(ScalarKind::Char).default_value(), json!("a"));
        assert_eq!(ParamType::Array(ScalarKind::Double).default_value(), json!([0.0, 0.0]));
        assert_eq!(ParamType::Array(ScalarKind::Char).default_value(), json!(["a", "b"]));
        assert_eq!(ParamType::Array(ScalarKind::String).default_value(), json!(["", ""]));
    }
}
