//! [`Fields`]: the ordered field mapping an extension type packs into.

use crate::{FieldError, Value};

/// Ordered `name -> value` pairs produced by an encode function and
/// consumed by the matching decode function.
///
/// ```
/// use fastpack::{Fields, Value};
///
/// let mut fields = Fields::new().with("amount", 1000).with("currency", "USD");
/// assert_eq!(fields.take_i64("amount"), Ok(1000));
/// assert_eq!(fields.take_str("currency").as_deref(), Ok("USD"));
/// assert!(fields.take("amount").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Removes and returns the field called `name`.
    pub fn take(&mut self, name: &str) -> Result<Value, FieldError> {
        let pos = self
            .0
            .iter()
            .position(|(k, _)| k == name)
            .ok_or_else(|| FieldError::Missing(name.to_owned()))?;
        Ok(self.0.remove(pos).1)
    }

    pub fn take_str(&mut self, name: &str) -> Result<String, FieldError> {
        match self.take(name)? {
            Value::Str(s) => Ok(s),
            other => Err(wrong_type(name, "str", &other)),
        }
    }

    pub fn take_i64(&mut self, name: &str) -> Result<i64, FieldError> {
        let value = self.take(name)?;
        value.as_i64().ok_or_else(|| wrong_type(name, "int", &value))
    }

    pub fn take_f64(&mut self, name: &str) -> Result<f64, FieldError> {
        match self.take(name)? {
            Value::Float(f) => Ok(f),
            other => Err(wrong_type(name, "float", &other)),
        }
    }

    pub fn take_bool(&mut self, name: &str) -> Result<bool, FieldError> {
        match self.take(name)? {
            Value::Bool(b) => Ok(b),
            other => Err(wrong_type(name, "bool", &other)),
        }
    }

    pub fn take_bytes(&mut self, name: &str) -> Result<Vec<u8>, FieldError> {
        match self.take(name)? {
            Value::Bytes(b) => Ok(b),
            other => Err(wrong_type(name, "bytes", &other)),
        }
    }

    pub fn take_array(&mut self, name: &str) -> Result<Vec<Value>, FieldError> {
        match self.take(name)? {
            Value::Array(items) => Ok(items),
            other => Err(wrong_type(name, "array", &other)),
        }
    }

    pub fn into_vec(self) -> Vec<(String, Value)> {
        self.0
    }
}

fn wrong_type(field: &str, expected: &'static str, found: &Value) -> FieldError {
    FieldError::WrongType {
        field: field.to_owned(),
        expected,
        found: found.kind_name(),
    }
}

impl From<Vec<(String, Value)>> for Fields {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Self(pairs)
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
