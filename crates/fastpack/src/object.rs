//! Type-erased instances of registered extension types.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Object-safe view of a value that can live inside [`Value::Object`].
///
/// Implemented for every `'static` type that is `Debug + PartialEq + Send +
/// Sync`; whether the type can actually be packed is decided by the
/// [`Registry`](crate::Registry) at encode time.
///
/// [`Value::Object`]: crate::Value::Object
pub trait ObjectValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_object(&self, other: &dyn ObjectValue) -> bool;
    fn type_name(&self) -> &'static str;
}

impl<T> ObjectValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_object(&self, other: &dyn ObjectValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A shared, immutable instance of some extension type.
///
/// Cloning is cheap. Two objects are equal when they hold the same
/// concrete type and that type's `PartialEq` says so.
#[derive(Clone)]
pub struct Object(Arc<dyn ObjectValue>);

impl Object {
    pub fn new<T: ObjectValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Identity used to look the instance up in the registry.
    pub fn type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_object(&*other.0)
    }
}
