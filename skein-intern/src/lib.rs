//! Thread-safe value interning.
//!
//! A [`Pool`] stores one shared instance per distinct value. Interning a
//! value that is already pooled returns the existing instance, so equal
//! values collapse to one allocation and equality checks collapse to a
//! pointer compare — which also makes [`Interned`] values very fast hash-map
//! keys.
//!
//! The pool holds no entry beyond its last user: every [`Interned`] is
//! counted, and when the last one for a value drops, the entry is evicted.
//!
//! # Design
//!
//! ```text
//! Pool<T>       - cheaply clonable handle to SHARD_COUNT sharded maps
//! shard         - CachePadded<Mutex<HashMap<Arc<T>, usize>>> (count = users)
//! Interned<T>   - Arc<T> + pool handle; Clone/Drop maintain the count
//! ```
//!
//! Sharding keeps unrelated values off each other's lock; the padding keeps
//! the shard locks off each other's cache line.
//!
//! # Example
//!
//! ```
//! use skein_intern::Pool;
//!
//! let pool: Pool<String> = Pool::new();
//!
//! let a = pool.intern("query".to_string());
//! let b = pool.intern("query".to_string());
//! let c = pool.intern("other".to_string());
//!
//! // Equal values share one instance; equality is a pointer compare.
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(pool.len(), 2);
//!
//! drop((a, b, c));
//! assert!(pool.is_empty());
//! ```

#![warn(missing_docs)]

use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, Mutex};

use crossbeam_utils::CachePadded;
use hashbrown::HashMap;

/// Number of shards. Power of two so shard selection is a mask.
const SHARD_COUNT: usize = 16;

type Shard<T> = CachePadded<Mutex<HashMap<Arc<T>, usize>>>;

/// A shared interning pool for values of type `T`.
///
/// Cloning a pool is cheap and yields a handle to the same shared state;
/// interned values keep their pool alive on their own.
pub struct Pool<T> {
    shards: Arc<[Shard<T>]>,
}

impl<T> Clone for Pool<T> {
    fn clone(&self) -> Self {
        Self {
            shards: Arc::clone(&self.shards),
        }
    }
}

impl<T: Hash + Eq> Pool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        let shards: Arc<[Shard<T>]> = (0..SHARD_COUNT)
            .map(|_| CachePadded::new(Mutex::new(HashMap::new())))
            .collect();
        Self { shards }
    }

    #[inline]
    fn shard_for(&self, value: &T) -> &Shard<T> {
        // Shard choice must be stable per value so Clone and Drop find the
        // entry where intern put it. DefaultHasher::new() hashes the same
        // value identically for the life of the process.
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        &self.shards[hasher.finish() as usize & (SHARD_COUNT - 1)]
    }

    /// Interns `value`, returning the pool's shared instance.
    ///
    /// If an equal value is already pooled, `value` is discarded and the
    /// existing instance's user count goes up; otherwise `value` moves into
    /// the pool with a count of one.
    pub fn intern(&self, value: T) -> Interned<T> {
        let mut map = self
            .shard_for(&value)
            .lock()
            .expect("intern pool mutex poisoned");

        let pooled = map.get_key_value(&value).map(|(key, _)| Arc::clone(key));
        let shared = match pooled {
            Some(shared) => {
                *map.get_mut(&value).expect("entry vanished under the lock") += 1;
                shared
            }
            None => {
                let shared = Arc::new(value);
                map.insert(Arc::clone(&shared), 1);
                shared
            }
        };
        drop(map);

        Interned {
            value: shared,
            pool: self.clone(),
        }
    }

    /// Returns `true` if an equal value is currently pooled.
    pub fn contains(&self, value: &T) -> bool {
        self.shard_for(value)
            .lock()
            .expect("intern pool mutex poisoned")
            .contains_key(value)
    }

    /// Returns the number of distinct pooled values.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().expect("intern pool mutex poisoned").len())
            .sum()
    }

    /// Returns `true` if nothing is pooled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Hash + Eq> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool<String> {
    /// Interns a string slice.
    ///
    /// The slice is materialized as a `String` first (interning consumes a
    /// value); if an equal string is already pooled the fresh allocation is
    /// dropped immediately and the pooled instance is returned.
    pub fn intern_str(&self, value: &str) -> Interned<String> {
        self.intern(value.to_owned())
    }
}

/// A pool of shared strings.
///
/// String keys are the dominant use for interning, so they get an alias:
///
/// ```
/// use skein_intern::StrPool;
///
/// let names: StrPool = StrPool::new();
/// let a = names.intern_str("position.x");
/// let b = names.intern_str("position.x");
/// assert_eq!(a, b);
/// ```
pub type StrPool = Pool<String>;

/// A value interned in a [`Pool`].
///
/// Dereferences to `&T`. The shared instance is immutable — it is shared
/// with every other equal value, so handing out `&mut T` would let one user
/// edit everyone's value.
///
/// Equality and hashing go through the instance pointer, not the value:
/// two `Interned`s from the same pool are equal iff they intern the same
/// value, and the hash is a pointer hash. Values from different pools never
/// compare equal.
pub struct Interned<T: Hash + Eq> {
    value: Arc<T>,
    pool: Pool<T>,
}

impl<T: Hash + Eq> Interned<T> {
    /// The number of `Interned` users of this value, including `self`.
    ///
    /// Primarily useful in tests and diagnostics; the count can change the
    /// moment the lock is released.
    pub fn use_count(&self) -> usize {
        *self
            .pool
            .shard_for(&self.value)
            .lock()
            .expect("intern pool mutex poisoned")
            .get(&*self.value)
            .expect("interned value missing from its pool")
    }
}

impl<T: Hash + Eq> Deref for Interned<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Hash + Eq> AsRef<T> for Interned<T> {
    #[inline]
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: Hash + Eq> Clone for Interned<T> {
    fn clone(&self) -> Self {
        let mut map = self
            .pool
            .shard_for(&self.value)
            .lock()
            .expect("intern pool mutex poisoned");
        *map.get_mut(&*self.value)
            .expect("interned value missing from its pool") += 1;
        drop(map);

        Self {
            value: Arc::clone(&self.value),
            pool: self.pool.clone(),
        }
    }
}

impl<T: Hash + Eq> Drop for Interned<T> {
    fn drop(&mut self) {
        // A poisoned shard means some user panicked mid-update; skipping
        // eviction is the only safe option left.
        let Ok(mut map) = self.pool.shard_for(&self.value).lock() else {
            return;
        };
        if let Some(count) = map.get_mut(&*self.value) {
            *count -= 1;
            if *count == 0 {
                map.remove(&*self.value);
            }
        }
    }
}

impl<T: Hash + Eq> PartialEq for Interned<T> {
    /// Pointer equality: shared instances are unique per pool.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl<T: Hash + Eq> Eq for Interned<T> {}

impl<T: Hash + Eq> Hash for Interned<T> {
    /// Pointer hash: no need to walk the value.
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.value) as usize).hash(state);
    }
}

impl<T: Hash + Eq + core::fmt::Debug> core::fmt::Debug for Interned<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&*self.value, f)
    }
}

impl<T: Hash + Eq + core::fmt::Display> core::fmt::Display for Interned<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&*self.value, f)
    }
}
