//! Schema-less binary serialization, MessagePack on the wire.
//!
//! [`pack`] turns a [`Value`] tree into the smallest MessagePack encoding;
//! [`unpack`] reads it back, rejecting truncated, malformed or padded input.
//! Types beyond the MessagePack data model travel as ordinary maps tagged
//! with a reserved marker key (see [`envelope`]) and are rebuilt through the
//! [`Registry`].
//!
//! ```
//! use fastpack::Value;
//!
//! let user = Value::map([("name", Value::from("Ana")), ("age", 30.into())]);
//! let bytes = fastpack::pack(&user).unwrap();
//! assert_eq!(fastpack::unpack(&bytes).unwrap(), user);
//! ```

mod builtins;
mod convert;
mod error;
mod extension;
mod fields;
mod object;
mod options;
mod pack;
mod registry;
mod unpack;
mod value;

pub mod envelope;
pub mod msgpack;

pub use builtins::{Decimal, ParseDecimalError, Set, Tuple};
pub use envelope::Kind;
pub use error::{DecodeError, EncodeError, FieldError, RegistrationError, ToJsonError};
pub use extension::MsgPackExtension;
pub use fields::Fields;
pub use object::{Object, ObjectValue};
pub use options::{Options, DEFAULT_MAX_DEPTH};
pub use pack::Packer;
pub use registry::{
    register, register_enum, register_record, registry, DecodeFn, EncodeFn, EnumType, Record,
    RecordStyle, Registrable, Registry, TypeEntry,
};
pub use unpack::Unpacker;
pub use value::Value;

/// Packs `value` with the process-wide registry and default options.
pub fn pack(value: &Value) -> Result<Vec<u8>, EncodeError> {
    pack_with(value, Options::default())
}

/// Packs `value` with the process-wide registry and the given options.
///
/// ```
/// use fastpack::{pack_with, EncodeError, Options, Value};
///
/// let nested = Value::Array(vec![Value::Array(vec![])]);
/// let err = pack_with(&nested, Options::new().with_max_depth(1)).unwrap_err();
/// assert_eq!(err, EncodeError::RecursionLimit { limit: 1 });
/// ```
pub fn pack_with(value: &Value, options: Options) -> Result<Vec<u8>, EncodeError> {
    let registry = registry();
    Packer::with_options(&registry, options).pack(value)
}

/// Unpacks exactly one value from `data` with the process-wide registry
/// and default options.
pub fn unpack(data: &[u8]) -> Result<Value, DecodeError> {
    unpack_with(data, Options::default())
}

/// Unpacks exactly one value from `data` with the process-wide registry
/// and the given options.
///
/// ```
/// use fastpack::{unpack_with, Options, Value};
///
/// // {"__ext__": "date", "iso": "2024-01-02"}
/// let mut data = vec![0x82, 0xa7];
/// data.extend_from_slice(b"__ext__");
/// data.push(0xa4);
/// data.extend_from_slice(b"date");
/// data.push(0xa3);
/// data.extend_from_slice(b"iso");
/// data.push(0xaa);
/// data.extend_from_slice(b"2024-01-02");
///
/// let raw = unpack_with(&data, Options::new().resolve_extensions(false)).unwrap();
/// assert_eq!(raw.get("iso"), Some(&Value::from("2024-01-02")));
/// ```
pub fn unpack_with(data: &[u8], options: Options) -> Result<Value, DecodeError> {
    let registry = registry();
    Unpacker::with_options(&registry, options).unpack(data)
}
