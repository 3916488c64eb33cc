//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON → `Value` is total. The other way fails for non-string map keys,
//! raw ext items and extension objects; bytes become an array of numbers
//! and non-finite floats become `null`.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::{ToJsonError, Value};

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Nil,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(int) = n.as_i64() {
                    Value::Integer(int)
                } else if let Some(uint) = n.as_u64() {
                    Value::UInteger(uint)
                } else {
                    n.as_f64().map_or(Value::Nil, Value::Float)
                }
            }
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    pub fn to_json(&self) -> Result<JsonValue, ToJsonError> {
        Ok(match self {
            Value::Nil => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Integer(int) => JsonValue::from(*int),
            Value::UInteger(uint) => JsonValue::from(*uint),
            Value::Float(float) => {
                Number::from_f64(*float).map_or(JsonValue::Null, JsonValue::Number)
            }
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Bytes(buf) => {
                JsonValue::Array(buf.iter().map(|&b| JsonValue::from(b)).collect())
            }
            Value::Array(items) => JsonValue::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(pairs) => {
                let mut map = JsonMap::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let Value::Str(key) = key else {
                        return Err(ToJsonError::NonStringKey(key.kind_name()));
                    };
                    map.insert(key.clone(), value.to_json()?);
                }
                JsonValue::Object(map)
            }
            Value::Extension(_) => return Err(ToJsonError::Unsupported("ext")),
            Value::Object(obj) => return Err(ToJsonError::Unsupported(obj.type_name())),
        })
    }
}
