use jm_utils::hash::{AddressMap, HashMap};

use crate::value::{IdentityKey, ObjectRef};

/// Per-call scratch state for object identity.
///
/// On output it remembers which instances were already written and under
/// which key; on input it maps keys to the instances materialized for them.
/// A registry lives for exactly one top-level conversion.
#[derive(Default)]
pub struct IdentityRegistry {
    // Holds a handle so the address stays unique for the whole call.
    emitted: AddressMap<(ObjectRef, IdentityKey)>,
    objects: HashMap<IdentityKey, ObjectRef>,
    sequence: i64,
}

impl IdentityRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The key an instance was written under, if it was written already.
    #[inline]
    pub fn emitted(&self, object: &ObjectRef) -> Option<&IdentityKey> {
        self.emitted.get(&object.addr()).map(|(_, key)| key)
    }

    #[inline]
    pub fn mark_emitted(&mut self, object: &ObjectRef, key: IdentityKey) {
        self.emitted.insert(object.addr(), (object.clone(), key));
    }

    /// The next generated key: 1, 2, 3, ...
    #[inline]
    pub fn next_sequence(&mut self) -> IdentityKey {
        self.sequence += 1;
        IdentityKey::Int(self.sequence)
    }

    #[inline]
    pub fn seen(&self, key: &IdentityKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Records the instance for `key`, returning the one recorded before.
    #[inline]
    pub fn record(&mut self, key: IdentityKey, object: ObjectRef) -> Option<ObjectRef> {
        self.objects.insert(key, object)
    }

    #[inline]
    pub fn lookup(&self, key: &IdentityKey) -> Option<&ObjectRef> {
        self.objects.get(key)
    }

    pub fn clear(&mut self) {
        self.emitted.clear();
        self.objects.clear();
        self.sequence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::IdentityRegistry;
    use crate::value::{IdentityKey, Object, ObjectRef};

    #[test]
    fn emitted_by_instance() {
        let mut registry = IdentityRegistry::new();
        let a = ObjectRef::new(Object::new("User"));
        let b = ObjectRef::new(Object::new("User"));

        let key = registry.next_sequence();
        assert_eq!(key, IdentityKey::Int(1));
        registry.mark_emitted(&a, key.clone());

        assert_eq!(registry.emitted(&a.clone()), Some(&key));
        assert_eq!(registry.emitted(&b), None);
        assert_eq!(registry.next_sequence(), IdentityKey::Int(2));
    }

    #[test]
    fn recorded_by_key() {
        let mut registry = IdentityRegistry::new();
        let key = IdentityKey::Int(2);
        let object = ObjectRef::new(Object::new("User"));

        assert!(!registry.seen(&key));
        assert!(registry.record(key.clone(), object.clone()).is_none());
        assert!(registry.seen(&key));
        assert!(registry.lookup(&key).is_some_and(|found| found.ptr_eq(&object)));

        registry.clear();
        assert!(!registry.seen(&key));
    }
}
