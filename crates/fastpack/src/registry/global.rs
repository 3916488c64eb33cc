//! Process-wide registry.
//!
//! Readers take an `Arc` snapshot and never hold the lock while packing;
//! writers clone-on-write under the lock, so a concurrent `pack`/`unpack`
//! sees the registry either before or after a registration, never halfway.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use super::{EnumType, Record, Registrable, Registry, TypeEntry};
use crate::RegistrationError;

static GLOBAL: LazyLock<RwLock<Arc<Registry>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Registry::with_builtins())));

/// Current snapshot of the process-wide registry.
pub fn registry() -> Arc<Registry> {
    GLOBAL.read().clone()
}

fn update<F>(f: F) -> Result<Arc<TypeEntry>, RegistrationError>
where
    F: FnOnce(&mut Registry) -> Result<Arc<TypeEntry>, RegistrationError>,
{
    let mut guard = GLOBAL.write();
    f(Arc::make_mut(&mut guard))
}

/// Registers a [`Registrable`] type in the process-wide registry.
///
/// `tag` defaults to the type's name without its module path.
pub fn register<T: Registrable>(tag: Option<&str>) -> Result<Arc<TypeEntry>, RegistrationError> {
    update(|registry| registry.register::<T>(tag))
}

/// Registers a [`Record`] type in the process-wide registry.
pub fn register_record<T: Record>(
    tag: Option<&str>,
) -> Result<Arc<TypeEntry>, RegistrationError> {
    update(|registry| registry.register_record::<T>(tag))
}

/// Registers an [`EnumType`] in the process-wide registry.
pub fn register_enum<T: EnumType>(tag: Option<&str>) -> Result<Arc<TypeEntry>, RegistrationError> {
    update(|registry| registry.register_enum::<T>(tag))
}
