//! Capabilities a type implements to take part in registration.

use std::any::Any;
use std::fmt::Debug;

use crate::{FieldError, Fields, Value};

/// A user type with its own field mapping, packed under the `__class__`
/// marker.
///
/// ```
/// use fastpack::{FieldError, Fields, Registrable};
///
/// #[derive(Debug, PartialEq)]
/// struct Money {
///     amount: i64,
///     currency: String,
/// }
///
/// impl Registrable for Money {
///     fn encode(&self) -> Fields {
///         Fields::new()
///             .with("amount", self.amount)
///             .with("currency", self.currency.as_str())
///     }
///
///     fn decode(mut fields: Fields) -> Result<Self, FieldError> {
///         Ok(Money {
///             amount: fields.take_i64("amount")?,
///             currency: fields.take_str("currency")?,
///         })
///     }
/// }
///
/// fastpack::register::<Money>(None).unwrap();
/// let money = Money { amount: 1000, currency: "USD".into() };
/// let bytes = fastpack::pack(&fastpack::Value::object(money)).unwrap();
/// let back = fastpack::unpack(&bytes).unwrap();
/// assert_eq!(back.downcast_ref::<Money>().map(|m| m.amount), Some(1000));
/// ```
pub trait Registrable: Any + Debug + PartialEq + Send + Sync + Sized {
    fn encode(&self) -> Fields;
    fn decode(fields: Fields) -> Result<Self, FieldError>;
}

/// Envelope flavor of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordStyle {
    /// `__dataclass__` marker.
    #[default]
    Dataclass,
    /// `__namedtuple__` marker.
    NamedTuple,
}

/// A record-like type described by an explicit, ordered field list.
///
/// `values` must yield one value per entry of `FIELDS`, in the same order.
/// On decode every listed field is required; unlisted fields are ignored.
pub trait Record: Any + Debug + PartialEq + Send + Sync + Sized {
    const FIELDS: &'static [&'static str];
    const STYLE: RecordStyle = RecordStyle::Dataclass;

    fn values(&self) -> Vec<Value>;
    fn from_values(values: Vec<Value>) -> Result<Self, FieldError>;
}

/// An enumeration packed as its underlying value under the `__enum__`
/// marker.
pub trait EnumType: Any + Debug + PartialEq + Send + Sync + Sized {
    fn to_value(&self) -> Value;
    fn from_value(value: &Value) -> Option<Self>;
}

/// Types shipped with the codec, installed into every registry built with
/// [`Registry::with_builtins`](super::Registry::with_builtins).
pub(crate) trait Builtin: Registrable {
    const TAG: &'static str;
}
