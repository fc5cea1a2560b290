//! Literal values carried by argument slots and produced by computations.

use serde::{Deserialize, Serialize};

/// A literal argument or a computed result.
///
/// Serializes to plain JSON: `null`, booleans, numbers, strings and arrays.
/// Integers that fit `i64` stay integers; any other number is a float.
/// JSON has no non-finite numbers, so NaN and the infinities are written as
/// `{"$float": "nan" | "inf" | "-inf"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(#[serde(with = "float_repr")] f64),
    Str(String),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
        }
    }

    // ─── Arithmetic ────────────────────────────────────────────────

    /// `+`: numeric addition, string and tuple concatenation.
    pub fn add(&self, other: &Value) -> Result<Value, String> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(*b)
                .map(Value::Int)
                .ok_or_else(|| format!("integer overflow in {} + {}", a, b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
            (Value::Tuple(a), Value::Tuple(b)) => {
                Ok(Value::Tuple(a.iter().chain(b.iter()).cloned().collect()))
            }
            _ => self.float_op(other, "+", |a, b| a + b),
        }
    }

    /// `-`: numeric subtraction.
    pub fn sub(&self, other: &Value) -> Result<Value, String> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_sub(*b)
                .map(Value::Int)
                .ok_or_else(|| format!("integer overflow in {} - {}", a, b)),
            _ => self.float_op(other, "-", |a, b| a - b),
        }
    }

    /// `*`: numeric multiplication.
    pub fn mul(&self, other: &Value) -> Result<Value, String> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_mul(*b)
                .map(Value::Int)
                .ok_or_else(|| format!("integer overflow in {} * {}", a, b)),
            _ => self.float_op(other, "*", |a, b| a * b),
        }
    }

    fn float_op(&self, other: &Value, op: &str, f: fn(f64, f64) -> f64) -> Result<Value, String> {
        match (self.as_float(), other.as_float()) {
            (Some(a), Some(b)) => Ok(Value::Float(f(a, b))),
            _ => Err(format!(
                "unsupported operands for {}: {} and {}",
                op,
                self.kind(),
                other.kind()
            )),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }
}

mod float_repr {
    use std::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    const KEY: &str = "$float";

    pub fn serialize<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            return serializer.serialize_f64(*v);
        }
        let tag = if v.is_nan() {
            "nan"
        } else if *v > 0.0 {
            "inf"
        } else {
            "-inf"
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(KEY, tag)?;
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }

    struct FloatVisitor;

    impl<'de> Visitor<'de> for FloatVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a number or {{\"{}\": \"nan\" | \"inf\" | \"-inf\"}}", KEY)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<f64, A::Error> {
            let (key, tag) = match map.next_entry::<String, String>()? {
                Some(entry) => entry,
                None => return Err(de::Error::invalid_length(0, &self)),
            };
            if key != KEY {
                return Err(de::Error::unknown_field(&key, &[KEY]));
            }
            if map.next_key::<String>()?.is_some() {
                return Err(de::Error::invalid_length(2, &self));
            }
            match tag.as_str() {
                "nan" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(de::Error::unknown_variant(other, &["nan", "inf", "-inf"])),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(Value::Int(2).add(&Value::Int(3)), Ok(Value::Int(5)));
        assert_eq!(Value::Int(2).sub(&Value::Int(3)), Ok(Value::Int(-1)));
        assert_eq!(Value::Int(2).mul(&Value::Int(3)), Ok(Value::Int(6)));
    }

    #[test]
    fn test_mixed_arithmetic_promotes_to_float() {
        assert_eq!(Value::Int(2).mul(&Value::Float(1.5)), Ok(Value::Float(3.0)));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(Value::Int(i64::MAX).add(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_unsupported_operands() {
        let err = Value::Str("a".into()).mul(&Value::Int(2)).unwrap_err();
        assert!(err.contains("str and int"), "{}", err);
    }

    #[test]
    fn test_json_is_plain() {
        let v = Value::Tuple(vec![
            Value::Unit,
            Value::Bool(true),
            Value::Int(5),
            Value::Float(2.5),
            Value::Str("s".into()),
        ]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"[null,true,5,2.5,"s"]"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_non_finite_floats_survive_json() {
        let v = Value::Tuple(vec![
            Value::Float(f64::INFINITY),
            Value::Float(f64::NEG_INFINITY),
            Value::Str("inf".into()),
        ]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"[{"$float":"inf"},{"$float":"-inf"},"inf"]"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        let json = serde_json::to_string(&Value::Float(f64::NAN)).unwrap();
        let nan: Value = serde_json::from_str(&json).unwrap();
        assert!(nan.as_float().is_some_and(f64::is_nan), "{:?}", nan);
    }

    #[test]
    fn test_unknown_float_tag_is_rejected() {
        assert!(serde_json::from_str::<Value>(r#"{"$float": "huge"}"#).is_err());
        assert!(serde_json::from_str::<Value>(r#"{"other": "inf"}"#).is_err());
    }

    #[test]
    fn test_display() {
        let v = Value::Tuple(vec![Value::Int(2), Value::Float(4.0), Value::Str("x".into())]);
        assert_eq!(v.to_string(), r#"(2, 4.0, "x")"#);
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).to_string(), "(1,)");
    }
}
