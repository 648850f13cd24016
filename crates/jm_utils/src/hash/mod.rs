//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! Containers built on [`FixedHashState`] iterate in a stable order for a given
//! insertion sequence, which keeps diagnostics reproducible between runs.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
///
/// `hashbrown` is built without its default hasher, so construct it through
/// [`Default`] or the `*_and_hasher` constructors.
///
/// # Examples
///
/// ```
/// use jm_utils::hash::HashMap;
///
/// let mut map: HashMap<&str, u32> = HashMap::default();
/// map.insert("id", 1);
/// assert_eq!(map.get("id"), Some(&1));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// A map keyed by an object address, hashed with [`NoOpHashState`].
///
/// Addresses of live heap allocations are already well distributed,
/// so hashing them again is wasted work.
///
/// # Examples
///
/// ```
/// use jm_utils::hash::AddressMap;
///
/// let value = 5_u32;
/// let mut map: AddressMap<&str> = AddressMap::default();
/// map.insert(&value as *const u32 as usize, "five");
/// assert_eq!(map.len(), 1);
/// ```
pub type AddressMap<V> = hashbrown::HashMap<usize, V, NoOpHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
