use core::cell::RefCell;

use serde_core::ser::Error;

use crate::info::TypeInfo;
use crate::registry::TypeRegistry;
use crate::serde::{IdentityRegistry, PropertyPath, TypeStack, describe};
use crate::{MapError, MapperConfig};

/// Scratch state of one serialization call.
///
/// `Serialize::serialize` takes `&self`, so everything mutable lives in
/// cells.
pub(super) struct SerializeState<'a> {
    pub registry: &'a TypeRegistry,
    pub config: &'a MapperConfig,
    pub identities: RefCell<IdentityRegistry>,
    pub path: RefCell<PropertyPath>,
    stack: RefCell<TypeStack>,
    error: RefCell<Option<MapError>>,
}

impl<'a> SerializeState<'a> {
    pub fn new(registry: &'a TypeRegistry, config: &'a MapperConfig) -> Self {
        Self {
            registry,
            config,
            identities: RefCell::new(IdentityRegistry::new()),
            path: RefCell::new(PropertyPath::root()),
            stack: RefCell::new(TypeStack::new()),
            error: RefCell::new(None),
        }
    }

    /// Clears everything left by a previous call.
    pub fn reset(&self) {
        self.identities.borrow_mut().clear();
        self.path.borrow_mut().clear();
        self.stack.borrow_mut().clear();
        self.error.borrow_mut().take();
    }

    #[inline]
    pub fn path(&self) -> PropertyPath {
        self.path.borrow().clone()
    }

    /// Stashes `error` and returns the serde error carrying its message.
    ///
    /// The first error wins; outer frames only propagate it.
    pub fn fail<E: Error>(&self, error: MapError) -> E {
        let message = describe(&error, &self.stack.borrow());
        let mut slot = self.error.borrow_mut();
        if slot.is_none() {
            *slot = Some(error);
        }
        E::custom(message)
    }

    #[inline]
    pub fn take_error(&self) -> Option<MapError> {
        self.error.borrow_mut().take()
    }

    pub fn info<E: Error>(&self, type_name: &'static str) -> Result<&'a TypeInfo, E> {
        self.registry.get(type_name).ok_or_else(|| {
            self.fail(MapError::UnknownType {
                type_name: type_name.to_owned(),
                path: self.path(),
            })
        })
    }

    /// Pushes a type onto the stack, failing past the depth limit.
    pub fn enter<E: Error>(&self, type_name: &'static str) -> Result<(), E> {
        let depth = self.stack.borrow().depth();
        if depth >= self.config.max_depth {
            return Err(self.fail(MapError::CyclicReference {
                type_name,
                depth: self.config.max_depth,
                path: self.path(),
            }));
        }
        self.stack.borrow_mut().push(type_name);
        Ok(())
    }

    #[inline]
    pub fn leave(&self) {
        self.stack.borrow_mut().pop();
    }
}
