//! Intrusive-style doubly-linked rings over arena storage.
//!
//! The classic intrusive list embeds two neighbor pointers in every element
//! and lets containers relink them in place. This crate keeps that shape —
//! O(1) insert, remove, and whole-range splice without moving element
//! storage — but swaps the aliased pointers for handles into a
//! [`RingArena`], so every stale reference is caught by a generation check
//! instead of becoming memory corruption.
//!
//! # Design
//!
//! ```text
//! RingArena<T>  - owns elements and their link fields; liveness authority
//! Ring<T>       - one sentinel handle; the membership is the closed ring
//!                 reachable from it
//! Cursor        - a position; Iter/IterMut/Handles are the Iterator views
//! ```
//!
//! The sentinel is a dedicated node that is both the predecessor of the
//! first member and the successor of the last, so the ring has no
//! null-handle edge cases and detaching a member is a purely local stitch
//! of its two neighbors. That locality is what makes the strongest
//! guarantee here cheap: destroying an element through
//! [`RingArena::remove`] always detaches it first, leaving its ring closed,
//! no matter which ring it was in.
//!
//! # Example
//!
//! ```
//! use skein_ring::{Ring, RingArena};
//!
//! let mut arena: RingArena<u64> = RingArena::new();
//! let mut ring = Ring::new(&mut arena);
//!
//! let a = ring.insert_back(&mut arena, 1);
//! let b = ring.insert_back(&mut arena, 2);
//! ring.insert_back(&mut arena, 3);
//!
//! assert_eq!(ring.len(&arena), 3);
//!
//! // Re-pushing a member moves it; nothing is duplicated.
//! ring.push_front(&mut arena, b);
//! let values: Vec<u64> = ring.iter(&arena).copied().collect();
//! assert_eq!(values, vec![2, 1, 3]);
//!
//! // Destroying a linked element detaches it on the way out.
//! arena.remove(a);
//! let values: Vec<u64> = ring.iter(&arena).copied().collect();
//! assert_eq!(values, vec![2, 3]);
//! ```
//!
//! # Splicing
//!
//! Sub-ranges move between rings (or within one) in O(1), independent of
//! range length:
//!
//! ```
//! use skein_ring::{Ring, RingArena};
//!
//! let mut arena: RingArena<char> = RingArena::new();
//! let mut source = Ring::new(&mut arena);
//! let mut target = Ring::new(&mut arena);
//!
//! let a = source.insert_back(&mut arena, 'a');
//! source.insert_back(&mut arena, 'b');
//! source.insert_back(&mut arena, 'c');
//!
//! // Move everything; the source is left empty.
//! target.splice_before(&mut arena, target.end_handle(), a, source.end_handle());
//!
//! assert!(source.is_empty(&arena));
//! let moved: Vec<char> = target.iter(&arena).copied().collect();
//! assert_eq!(moved, vec!['a', 'b', 'c']);
//! ```
//!
//! # Membership in several rings
//!
//! A node belongs to at most one ring at a time. When one logical entity
//! must sit in several lists, register the entity once in a
//! [`skein_registry::Registry`] and thread its [`Handle`] through one
//! arena per list — the arena-world equivalent of embedding one link field
//! per list.
//!
//! # Concurrency
//!
//! None. Rings and arenas are single-threaded values; callers who share
//! them across threads bring their own synchronization, the same contract
//! as any `&mut`-based container.

#![warn(missing_docs)]

mod arena;
mod cursor;
mod ring;

pub use arena::RingArena;
pub use cursor::{Cursor, Handles, Iter, IterMut};
pub use ring::Ring;
pub use skein_registry::Handle;
