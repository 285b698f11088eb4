//! Condition and assignment values.
//!
//! [`Scalar`] is a single bindable value; [`Value`] is what a condition
//! carries: either one scalar or an ordered sequence of scalars. The variant is
//! chosen where the condition is built, so the clause engine never has to
//! guess at a value's shape.

use crate::error::{QbError, QbResult};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType, to_sql_checked};

/// A single scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Render the value as inline SQL text.
    ///
    /// Strings are single-quoted as-is; no escaping is performed, so literal
    /// mode must only ever see caller-trusted input.
    pub fn to_literal(&self) -> String {
        match self {
            Scalar::Text(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Value attached to a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// One scalar, rendered as one placeholder or literal.
    Scalar(Scalar),
    /// Ordered scalars for `IN`, `NOT IN`, `BETWEEN` and similar operators.
    Sequence(Vec<Scalar>),
}

impl Value {
    /// Number of placeholders this value consumes in placeholder mode.
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Sequence(items) => items.len(),
        }
    }

    /// True for an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a sequence from anything convertible into scalars.
    pub fn sequence<T, I>(items: I) -> Self
    where
        T: Into<Scalar>,
        I: IntoIterator<Item = T>,
    {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<Scalar>> for Value {
    fn from(items: Vec<Scalar>) -> Self {
        Value::Sequence(items)
    }
}

macro_rules! impl_scalar_from {
    ($variant:ident => $($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::$variant(v.into())
                }
            }

            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }

            impl From<Vec<$t>> for Value {
                fn from(items: Vec<$t>) -> Self {
                    Value::sequence(items)
                }
            }
        )+
    };
}

impl_scalar_from!(Text => String, &str, &String);
impl_scalar_from!(Int => i8, i16, i32, i64, u8, u16, u32);
impl_scalar_from!(Float => f64);
impl_scalar_from!(Bool => bool);

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        // Widen through the shortest decimal form so 0.1f32 stays 0.1.
        Scalar::Float(v.to_string().parse().unwrap_or(f64::from(v)))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(Scalar::from(v))
    }
}

impl From<Vec<f32>> for Value {
    fn from(items: Vec<f32>) -> Self {
        Value::sequence(items)
    }
}

impl TryFrom<serde_json::Value> for Scalar {
    type Error = QbError;

    fn try_from(value: serde_json::Value) -> QbResult<Self> {
        use serde_json::Value as Json;

        match value {
            Json::String(s) => Ok(Scalar::Text(s)),
            Json::Bool(b) => Ok(Scalar::Bool(b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Scalar::Float(f))
                } else {
                    Err(QbError::invalid_argument(format!(
                        "number {n} is not representable as int or float"
                    )))
                }
            }
            Json::Null => Err(QbError::invalid_argument(
                "null is not a scalar value; use a unary operator such as IS NULL",
            )),
            Json::Array(_) => Err(QbError::invalid_argument(
                "nested sequences are not supported",
            )),
            Json::Object(_) => Err(QbError::invalid_argument(
                "objects are not supported as condition values",
            )),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = QbError;

    fn try_from(value: serde_json::Value) -> QbResult<Self> {
        match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Scalar::try_from)
                .collect::<QbResult<Vec<_>>>()
                .map(Value::Sequence),
            other => Scalar::try_from(other).map(Value::Scalar),
        }
    }
}

impl ToSql for Scalar {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Scalar::Text(v) => {
                if !<String as ToSql>::accepts(ty) {
                    return Err(Box::new(WrongType::new::<String>(ty.clone())));
                }
                v.to_sql(ty, out)
            }
            Scalar::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                Type::INT8 => v.to_sql(ty, out),
                _ => Err(Box::new(WrongType::new::<i64>(ty.clone()))),
            },
            Scalar::Float(v) => match *ty {
                Type::FLOAT4 => {
                    if v.is_finite() && v.abs() > f32::MAX as f64 {
                        return Err(format!("float {v} out of range for FLOAT4").into());
                    }
                    (*v as f32).to_sql(ty, out)
                }
                Type::FLOAT8 => v.to_sql(ty, out),
                _ => Err(Box::new(WrongType::new::<f64>(ty.clone()))),
            },
            Scalar::Bool(v) => match *ty {
                Type::BOOL => v.to_sql(ty, out),
                _ => Err(Box::new(WrongType::new::<bool>(ty.clone()))),
            },
        }
    }

    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
            || matches!(
                *ty,
                Type::INT2 | Type::INT4 | Type::INT8 | Type::FLOAT4 | Type::FLOAT8 | Type::BOOL
            )
    }

    to_sql_checked!();
}
