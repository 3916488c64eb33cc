//! Sets and tuples, which have no native MessagePack form.

use crate::registry::Builtin;
use crate::{FieldError, Fields, Registrable, Value};

/// An unordered collection of distinct values.
///
/// Uniqueness uses [`Value`] equality, so `1` and `1u64` are the same
/// element. Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct Set(Vec<Value>);

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value`; returns `false` if an equal element was present.
    pub fn insert(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<V: Into<Value>> FromIterator<V> for Set {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut set = Set::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl Registrable for Set {
    fn encode(&self) -> Fields {
        Fields::new().with("items", self.0.clone())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        Ok(fields.take_array("items")?.into_iter().collect())
    }
}

impl Builtin for Set {
    const TAG: &'static str = "set";
}

/// A fixed, ordered group of values, kept distinct from an array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tuple(pub Vec<Value>);

impl<V: Into<Value>> FromIterator<V> for Tuple {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Tuple(iter.into_iter().map(Into::into).collect())
    }
}

impl Registrable for Tuple {
    fn encode(&self) -> Fields {
        Fields::new().with("items", self.0.clone())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        fields.take_array("items").map(Tuple)
    }
}

impl Builtin for Tuple {
    const TAG: &'static str = "tuple";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_deduplicates_and_ignores_order() {
        let a: Set = [1i64, 2, 2, 3].into_iter().collect();
        let b: Set = [3i64, 1, 2].into_iter().collect();
        assert_eq!(a.len(), 3);
        assert_eq!(a, b);
        let mut c = b.clone();
        assert!(!c.insert(Value::UInteger(1)));
        assert!(c.insert("x"));
        assert_ne!(a, c);
    }

    #[test]
    fn set_decode_collapses_duplicates() {
        let fields = Fields::new().with("items", vec![Value::from(1), Value::from(1)]);
        assert_eq!(Set::decode(fields).map(|s| s.len()), Ok(1));
    }

    #[test]
    fn tuple_keeps_order() {
        let t: Tuple = ["a", "b"].into_iter().collect();
        assert_eq!(Tuple::decode(t.encode()), Ok(t.clone()));
        assert_ne!(t, Tuple(vec!["b".into(), "a".into()]));
    }
}
