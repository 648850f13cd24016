use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::Value;

// -----------------------------------------------------------------------------
// Object

/// A described object: the name of its registered type plus the values of its
/// declared fields.
///
/// Fields keep insertion order. Missing fields read as absent, equality treats
/// a missing field and a null field as the same.
#[derive(Clone)]
pub struct Object {
    type_name: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl Object {
    #[inline]
    pub const fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Builder-style [`Object::set`].
    #[inline]
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(field, value)| (*field == name).then_some(value))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find_map(|(field, value)| (*field == name).then_some(value))
    }

    /// Inserts or replaces a field, returning the previous value.
    pub fn set(&mut self, name: &'static str, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        match self.get_mut(name) {
            Some(slot) => Some(core::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(field, _)| *field == name)?;
        Some(self.fields.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.type_name);
        for (name, value) in &self.fields {
            out.field(name, value);
        }
        out.finish()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        const NULL: &Value = &Value::Null;

        if self.type_name != other.type_name {
            return false;
        }
        let forward = self
            .iter()
            .all(|(name, value)| other.get(name).unwrap_or(NULL) == value);
        forward
            && other
                .iter()
                .filter(|(name, _)| self.get(name).is_none())
                .all(|(_, value)| value.is_null())
    }
}

// -----------------------------------------------------------------------------
// ObjectRef

std::thread_local! {
    static DEBUG_GUARD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
    static EQ_GUARD: RefCell<Vec<(usize, usize)>> = const { RefCell::new(Vec::new()) };
}

/// A shared, mutable handle to an [`Object`].
///
/// Cloning the handle does not clone the object: identity-preserving
/// conversions hand out clones of one handle to every site that refers to the
/// same instance, use [`ObjectRef::ptr_eq`] to observe it.
///
/// Graphs with cycles (owner and item pointing at each other) are
/// reference-counting cycles and stay alive until one edge is cleared.
///
/// `Debug` and `PartialEq` are cycle-safe: a revisited handle is printed as
/// `<cycle Type>` and assumed equal while it is being compared.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    #[inline]
    pub fn new(object: Object) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    /// Immutably borrows the object.
    ///
    /// # Panics
    /// Panics if the object is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// Mutably borrows the object.
    ///
    /// # Panics
    /// Panics if the object is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point at the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The address of the instance, stable while any handle is alive.
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.0.borrow().type_name
    }

    /// Clones one field value out of the object.
    #[inline]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    /// Replaces the whole object in place; every handle observes the new
    /// content.
    #[inline]
    pub fn replace(&self, object: Object) -> Object {
        self.0.replace(object)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = self.addr();
        let entered = DEBUG_GUARD.with_borrow_mut(|stack| {
            if stack.contains(&addr) {
                false
            } else {
                stack.push(addr);
                true
            }
        });

        let Ok(object) = self.0.try_borrow() else {
            if entered {
                DEBUG_GUARD.with_borrow_mut(|stack| stack.pop());
            }
            return f.write_str("<borrowed>");
        };

        if !entered {
            return write!(f, "<cycle {}>", object.type_name);
        }

        let result = fmt::Debug::fmt(&*object, f);
        DEBUG_GUARD.with_borrow_mut(|stack| stack.pop());
        result
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        let pair = (self.addr(), other.addr());
        let fresh = EQ_GUARD.with_borrow_mut(|stack| {
            if stack.contains(&pair) {
                false
            } else {
                stack.push(pair);
                true
            }
        });
        if !fresh {
            return true;
        }

        let equal = *self.0.borrow() == *other.0.borrow();
        EQ_GUARD.with_borrow_mut(|stack| stack.pop());
        equal
    }
}

#[cfg(test)]
mod tests {
    use super::{Object, ObjectRef};
    use crate::value::Value;

    #[test]
    fn set_replaces_in_place() {
        let mut object = Object::new("User").with("id", 1).with("name", "John");
        assert_eq!(object.set("id", 2), Some(Value::Int(1)));
        assert_eq!(object.len(), 2);
        assert_eq!(object.iter().next(), Some(("id", &Value::Int(2))));
    }

    #[test]
    fn missing_field_equals_null() {
        let a = Object::new("User").with("id", 1).with("name", Value::Null);
        let b = Object::new("User").with("id", 1);
        assert_eq!(a, b);
        assert_ne!(a, Object::new("Item").with("id", 1));
    }

    #[test]
    fn replace_is_shared() {
        let a = ObjectRef::new(Object::new("User"));
        let b = a.clone();
        a.replace(Object::new("User").with("id", 7));
        assert!(a.ptr_eq(&b));
        assert_eq!(b.get("id"), Some(Value::Int(7)));
    }

    #[test]
    fn cyclic_debug_and_eq() {
        let owner = ObjectRef::new(Object::new("User").with("id", 1));
        let item = ObjectRef::new(Object::new("Item").with("owner", owner.clone()));
        owner.borrow_mut().set("items", Value::List(vec![item.clone().into()]));

        let text = format!("{owner:?}");
        assert!(text.contains("<cycle User>"));

        let other_owner = ObjectRef::new(Object::new("User").with("id", 1));
        let other_item = ObjectRef::new(Object::new("Item").with("owner", other_owner.clone()));
        other_owner
            .borrow_mut()
            .set("items", Value::List(vec![other_item.into()]));

        assert_eq!(owner, other_owner);
        owner.borrow_mut().set("items", Value::Null);
        other_owner.borrow_mut().set("items", Value::Null);
    }
}
