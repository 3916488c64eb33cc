//! Type registry: maps a Rust type to a tag plus the pair of functions that
//! turn an instance into [`Fields`] and back.
//!
//! A [`Registry`] owns one table indexed both by [`TypeId`] (for the packer)
//! and by tag (for the unpacker). Tags form a single namespace across all
//! kinds. Entries are only ever appended.
//!
//! Registration policy:
//! - a tag already held by another type is rejected with
//!   [`RegistrationError::DuplicateTag`];
//! - registering a type again under the tag and kind it already has is a
//!   no-op returning the existing entry;
//! - registering a type again under anything else is rejected with
//!   [`RegistrationError::DuplicateType`].

mod global;
mod traits;

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::envelope::Kind;
use crate::{FieldError, Fields, Object, RegistrationError, Value};

pub(crate) use traits::Builtin;
pub use global::{register, register_enum, register_record, registry};
pub use traits::{EnumType, Record, RecordStyle, Registrable};

/// Turns a type-erased instance into its field mapping; `None` when the
/// instance is not of the entry's type.
pub type EncodeFn = fn(&dyn Any) -> Option<Fields>;

/// Rebuilds an instance from its field mapping.
pub type DecodeFn = fn(Fields) -> Result<Object, FieldError>;

/// One registered type.
pub struct TypeEntry {
    type_id: TypeId,
    type_name: &'static str,
    tag: String,
    kind: Kind,
    module: Option<String>,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl TypeEntry {
    fn new<T: Any>(kind: Kind, tag: Option<&str>, encode: EncodeFn, decode: DecodeFn) -> Self {
        let type_name = type_name::<T>();
        let (default_tag, module) = split_type_name(type_name);
        let module = match kind {
            Kind::Builtin => None,
            _ => module.map(str::to_owned),
        };
        Self {
            type_id: TypeId::of::<T>(),
            type_name,
            tag: tag.unwrap_or(default_tag).to_owned(),
            kind,
            module,
            encode,
            decode,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Namespace hint written as `__module__`; absent for built-ins.
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn encode(&self, instance: &dyn Any) -> Option<Fields> {
        (self.encode)(instance)
    }

    pub fn decode(&self, fields: Fields) -> Result<Object, FieldError> {
        (self.decode)(fields)
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("module", &self.module)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Splits `a::b::Name<c::D>` into (`Name`, `Some("a::b")`).
fn split_type_name(full: &'static str) -> (&'static str, Option<&'static str>) {
    let path = full.split('<').next().unwrap_or(full);
    match path.rsplit_once("::") {
        Some((module, name)) => (name, Some(module)),
        None => (path, None),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Arc<TypeEntry>>,
    by_type: HashMap<TypeId, usize>,
    by_tag: HashMap<String, usize>,
}

impl Registry {
    /// Empty registry, without the built-in types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in extension types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::install(&mut registry);
        registry
    }

    pub fn register<T: Registrable>(
        &mut self,
        tag: Option<&str>,
    ) -> Result<Arc<TypeEntry>, RegistrationError> {
        self.insert(TypeEntry::new::<T>(
            Kind::Class,
            tag,
            encode_registrable::<T>,
            decode_registrable::<T>,
        ))
    }

    pub fn register_record<T: Record>(
        &mut self,
        tag: Option<&str>,
    ) -> Result<Arc<TypeEntry>, RegistrationError> {
        let kind = match T::STYLE {
            RecordStyle::Dataclass => Kind::Dataclass,
            RecordStyle::NamedTuple => Kind::NamedTuple,
        };
        self.insert(TypeEntry::new::<T>(
            kind,
            tag,
            encode_record::<T>,
            decode_record::<T>,
        ))
    }

    pub fn register_enum<T: EnumType>(
        &mut self,
        tag: Option<&str>,
    ) -> Result<Arc<TypeEntry>, RegistrationError> {
        self.insert(TypeEntry::new::<T>(
            Kind::Enum,
            tag,
            encode_enum::<T>,
            decode_enum::<T>,
        ))
    }

    pub(crate) fn register_builtin<T: Builtin>(&mut self) {
        let entry = TypeEntry::new::<T>(
            Kind::Builtin,
            Some(T::TAG),
            encode_registrable::<T>,
            decode_registrable::<T>,
        );
        if let Err(err) = self.insert(entry) {
            error!(tag = T::TAG, %err, "built-in type not installed");
        }
    }

    fn insert(&mut self, entry: TypeEntry) -> Result<Arc<TypeEntry>, RegistrationError> {
        if entry.tag.is_empty() {
            return Err(RegistrationError::InvalidTag(entry.tag));
        }
        if let Some(existing) = self.resolve_by_type(entry.type_id) {
            if existing.tag == entry.tag && existing.kind == entry.kind {
                debug!(tag = %entry.tag, type_name = entry.type_name, "already registered");
                return Ok(Arc::clone(existing));
            }
            let err = RegistrationError::DuplicateType {
                type_name: entry.type_name,
                existing: existing.tag.clone(),
            };
            debug!(%err, "registration rejected");
            return Err(err);
        }
        if let Some(existing) = self.resolve_by_tag(&entry.tag) {
            let err = RegistrationError::DuplicateTag {
                tag: entry.tag,
                existing: existing.type_name,
            };
            debug!(%err, "registration rejected");
            return Err(err);
        }

        debug!(
            tag = %entry.tag,
            kind = ?entry.kind,
            type_name = entry.type_name,
            "registered type"
        );
        let index = self.entries.len();
        self.by_type.insert(entry.type_id, index);
        self.by_tag.insert(entry.tag.clone(), index);
        let entry = Arc::new(entry);
        self.entries.push(Arc::clone(&entry));
        Ok(entry)
    }

    pub fn resolve_by_type(&self, type_id: TypeId) -> Option<&Arc<TypeEntry>> {
        let entry = self.by_type.get(&type_id).and_then(|&i| self.entries.get(i));
        trace!(?type_id, found = entry.is_some(), "resolve by type");
        entry
    }

    pub fn resolve_by_tag(&self, tag: &str) -> Option<&Arc<TypeEntry>> {
        let entry = self.by_tag.get(tag).and_then(|&i| self.entries.get(i));
        trace!(tag, found = entry.is_some(), "resolve by tag");
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.iter().map(|entry| &**entry)
    }
}

fn encode_registrable<T: Registrable>(instance: &dyn Any) -> Option<Fields> {
    instance.downcast_ref::<T>().map(|value| value.encode())
}

fn decode_registrable<T: Registrable>(fields: Fields) -> Result<Object, FieldError> {
    T::decode(fields).map(Object::new)
}

/// Pairs `FIELDS` with `values()`. A short `values()` is padded with nil so
/// every declared field reaches the wire; extra values are dropped.
fn encode_record<T: Record>(instance: &dyn Any) -> Option<Fields> {
    let record = instance.downcast_ref::<T>()?;
    let values = record.values();
    debug_assert_eq!(
        values.len(),
        T::FIELDS.len(),
        "`{}::values` must return one value per declared field",
        type_name::<T>()
    );
    let mut values = values.into_iter();
    Some(
        T::FIELDS
            .iter()
            .map(|name| ((*name).to_owned(), values.next().unwrap_or(Value::Nil)))
            .collect(),
    )
}

fn decode_record<T: Record>(mut fields: Fields) -> Result<Object, FieldError> {
    let values = T::FIELDS
        .iter()
        .map(|name| fields.take(name))
        .collect::<Result<Vec<_>, _>>()?;
    T::from_values(values).map(Object::new)
}

fn encode_enum<T: EnumType>(instance: &dyn Any) -> Option<Fields> {
    instance
        .downcast_ref::<T>()
        .map(|value| Fields::new().with("value", value.to_value()))
}

fn decode_enum<T: EnumType>(mut fields: Fields) -> Result<Object, FieldError> {
    let value = fields.take("value")?;
    T::from_value(&value).map(Object::new).ok_or_else(|| {
        FieldError::invalid(
            "value",
            format!("no variant of `{}` matches {value:?}", type_name::<T>()),
        )
    })
}
