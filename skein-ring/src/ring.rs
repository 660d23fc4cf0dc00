//! The ring container.
//!
//! A [`Ring`] is one sentinel handle. The sentinel is both the predecessor
//! of the first member and the successor of the last, so the membership is a
//! closed loop with no null-handle edge cases: following `next` from the
//! sentinel visits every member exactly once and arrives back at the
//! sentinel, and the same holds for `prev`.
//!
//! The ring holds no cached length and no back-pointers into itself, which
//! is what keeps every structural operation a purely local handle rewrite:
//! detaching a member only ever touches the member and its two neighbors,
//! wherever in whichever ring they happen to be.

use core::marker::PhantomData;

use skein_registry::Handle;

use crate::arena::RingArena;
use crate::cursor::{Cursor, Handles, Iter, IterMut};

/// A doubly-linked ring of elements stored in a [`RingArena`].
///
/// Elements are arena values; the ring threads handles through them. A node
/// is a member of at most one ring at a time — pushing a node that is
/// already linked (here or in another ring over the same arena) moves it.
///
/// Rings are deliberately not `Clone`: duplicating a ring would have to
/// duplicate membership, and membership is exclusive.
///
/// # Example
///
/// ```
/// use skein_ring::{Ring, RingArena};
///
/// let mut arena: RingArena<u64> = RingArena::new();
/// let mut ring = Ring::new(&mut arena);
///
/// ring.insert_back(&mut arena, 1);
/// ring.insert_back(&mut arena, 2);
/// ring.insert_back(&mut arena, 3);
///
/// let values: Vec<u64> = ring.iter(&arena).copied().collect();
/// assert_eq!(values, vec![1, 2, 3]);
///
/// ring.dispose(&mut arena);
/// ```
#[derive(Debug)]
pub struct Ring<T> {
    sentinel: Handle,
    _marker: PhantomData<T>,
}

impl<T> Ring<T> {
    /// Creates an empty ring, allocating its sentinel in `arena`.
    pub fn new(arena: &mut RingArena<T>) -> Self {
        Self {
            sentinel: arena.alloc_sentinel(),
            _marker: PhantomData,
        }
    }

    /// Creates a ring that takes over every member of `source`, in order,
    /// leaving `source` empty. O(1): one whole-range splice, not a walk.
    pub fn take(arena: &mut RingArena<T>, source: &mut Ring<T>) -> Self {
        let mut ring = Ring::new(arena);
        ring.append(arena, source);
        ring
    }

    /// Unlinks every member, then frees the sentinel.
    ///
    /// Members stay alive in the arena (they were never owned by the ring).
    /// A ring that is dropped without `dispose` leaks its sentinel slot and
    /// leaves its members linked to each other; they can still be unlinked
    /// or removed individually through the arena.
    pub fn dispose(mut self, arena: &mut RingArena<T>) {
        self.clear(arena);
        arena.free_sentinel(self.sentinel);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns `true` if the ring has no members. O(1).
    pub fn is_empty(&self, arena: &RingArena<T>) -> bool {
        let link = arena.node(self.sentinel).link;
        debug_assert_eq!(
            link.next == self.sentinel,
            link.prev == self.sentinel,
            "sentinel must self-reference in both directions exactly when empty"
        );
        link.next == self.sentinel
    }

    /// Returns the number of members by walking the ring. O(n) — there is
    /// no cached count, by design: a count would have to be repaired on
    /// every detach, and detaches happen without the ring in hand.
    pub fn len(&self, arena: &RingArena<T>) -> usize {
        let mut count = 0;
        let mut current = arena.node(self.sentinel).link.next;
        while current != self.sentinel {
            count += 1;
            current = arena.node(current).link.next;
        }
        count
    }

    /// The one-past-the-end position: the sentinel's handle.
    ///
    /// Valid as a splice/insert position meaning "at the back"; never an
    /// element ([`RingArena::get`] returns `None` for it).
    #[inline]
    pub fn end_handle(&self) -> Handle {
        self.sentinel
    }

    /// Handle of the first member, or `None` if the ring is empty.
    pub fn front_handle(&self, arena: &RingArena<T>) -> Option<Handle> {
        let first = arena.node(self.sentinel).link.next;
        (first != self.sentinel).then_some(first)
    }

    /// Handle of the last member, or `None` if the ring is empty.
    pub fn back_handle(&self, arena: &RingArena<T>) -> Option<Handle> {
        let last = arena.node(self.sentinel).link.prev;
        (last != self.sentinel).then_some(last)
    }

    /// Reference to the first member's element.
    pub fn front<'a>(&self, arena: &'a RingArena<T>) -> Option<&'a T> {
        self.front_handle(arena).map(|h| {
            arena
                .get(h)
                .expect("ring invariant: member handle went stale")
        })
    }

    /// Mutable reference to the first member's element.
    pub fn front_mut<'a>(&self, arena: &'a mut RingArena<T>) -> Option<&'a mut T> {
        let handle = self.front_handle(arena)?;
        Some(
            arena
                .get_mut(handle)
                .expect("ring invariant: member handle went stale"),
        )
    }

    /// Reference to the last member's element.
    pub fn back<'a>(&self, arena: &'a RingArena<T>) -> Option<&'a T> {
        self.back_handle(arena).map(|h| {
            arena
                .get(h)
                .expect("ring invariant: member handle went stale")
        })
    }

    /// Mutable reference to the last member's element.
    pub fn back_mut<'a>(&self, arena: &'a mut RingArena<T>) -> Option<&'a mut T> {
        let handle = self.back_handle(arena)?;
        Some(
            arena
                .get_mut(handle)
                .expect("ring invariant: member handle went stale"),
        )
    }

    // ========================================================================
    // Push / pop
    // ========================================================================

    /// Links `node` as the first member. If `node` is already linked —
    /// in this ring or any other over the same arena — it is moved, not
    /// duplicated.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale, null, or a sentinel.
    pub fn push_front(&mut self, arena: &mut RingArena<T>, node: Handle) {
        arena.expect_element(node);
        arena.unlink(node);
        arena.link_single_after(self.sentinel, node);
    }

    /// Links `node` as the last member, moving it if it is already linked.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale, null, or a sentinel.
    pub fn push_back(&mut self, arena: &mut RingArena<T>, node: Handle) {
        arena.expect_element(node);
        arena.unlink(node);
        arena.link_single_before(self.sentinel, node);
    }

    /// Allocates `value` in the arena and links it as the first member.
    pub fn insert_front(&mut self, arena: &mut RingArena<T>, value: T) -> Handle {
        let node = arena.insert(value);
        arena.link_single_after(self.sentinel, node);
        node
    }

    /// Allocates `value` in the arena and links it as the last member.
    pub fn insert_back(&mut self, arena: &mut RingArena<T>, value: T) -> Handle {
        let node = arena.insert(value);
        arena.link_single_before(self.sentinel, node);
        node
    }

    /// Unlinks and returns the first member's handle, or `None` if empty.
    ///
    /// The element is not destroyed — it stays in the arena, unlinked.
    pub fn pop_front(&mut self, arena: &mut RingArena<T>) -> Option<Handle> {
        let first = self.front_handle(arena)?;
        arena.unlink(first);
        Some(first)
    }

    /// Unlinks and returns the last member's handle, or `None` if empty.
    pub fn pop_back(&mut self, arena: &mut RingArena<T>) -> Option<Handle> {
        let last = self.back_handle(arena)?;
        arena.unlink(last);
        Some(last)
    }

    // ========================================================================
    // Positional insert
    // ========================================================================

    /// Links an unlinked `node` immediately before `at`.
    ///
    /// `at` must be a member of this ring or its end handle; membership of
    /// another ring over the same arena is not detected (the check would
    /// cost a walk, and the source container deliberately refused to pay
    /// it). Stale handles are always detected.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not linked, if `node` is stale or a sentinel, or if
    /// `node` is already linked — moving a member goes through
    /// [`push_front`](Self::push_front)/[`push_back`](Self::push_back) or
    /// [`splice_before`](Self::splice_before), never through single-node
    /// insert.
    pub fn insert_before(&mut self, arena: &mut RingArena<T>, at: Handle, node: Handle) {
        assert!(
            arena.node(at).link.is_linked(),
            "insert position must be linked into the ring"
        );
        arena.expect_element(node);
        assert!(
            !arena.node(node).link.is_linked(),
            "single-node insert requires an unlinked node"
        );
        arena.link_single_before(at, node);
    }

    /// Links an unlinked `node` immediately after `at`. Same contract as
    /// [`insert_before`](Self::insert_before).
    pub fn insert_after(&mut self, arena: &mut RingArena<T>, at: Handle, node: Handle) {
        assert!(
            arena.node(at).link.is_linked(),
            "insert position must be linked into the ring"
        );
        arena.expect_element(node);
        assert!(
            !arena.node(node).link.is_linked(),
            "single-node insert requires an unlinked node"
        );
        arena.link_single_after(at, node);
    }

    // ========================================================================
    // Splice
    // ========================================================================

    /// Moves the sub-range `[first, end)` — from this ring or any other over
    /// the same arena — to just before `at`, preserving its order. O(1)
    /// regardless of range length.
    ///
    /// The range is detached from its source ring (the source's boundary
    /// neighbors reconnect) before the destination links are written, so a
    /// position adjacent to the range ends up as a correct move rather than
    /// a corrupted ring. A degenerate range (`first == end`) is a no-op.
    ///
    /// Returns the handle of the first spliced node (`at` when degenerate).
    ///
    /// # Panics
    ///
    /// Panics if `at`, `first`, or `end` is stale or unlinked.
    ///
    /// The range must be a forward walk that does not cross its ring's
    /// sentinel (the sentinel may only appear as the exclusive `end`), and
    /// `at` must not lie strictly inside `[first, end)`; neither is
    /// detected.
    pub fn splice_before(
        &mut self,
        arena: &mut RingArena<T>,
        at: Handle,
        first: Handle,
        end: Handle,
    ) -> Handle {
        assert!(
            arena.node(at).link.is_linked(),
            "splice position must be linked into the ring"
        );
        if first == end {
            return at;
        }
        assert!(
            arena.node(first).link.is_linked(),
            "splice range start must be linked"
        );
        assert!(
            arena.node(end).link.is_linked(),
            "splice range end must be linked"
        );

        let last = arena.detach_range(first, end);
        // Read the anchor only now: if `at` was adjacent to the range its
        // links were just rewritten by the detach.
        let anchor = arena.node(at).link.prev;
        arena.attach_range(anchor, at, first, last);
        first
    }

    /// Moves the sub-range `[first, end)` to just after `at`. Same contract
    /// as [`splice_before`](Self::splice_before).
    pub fn splice_after(
        &mut self,
        arena: &mut RingArena<T>,
        at: Handle,
        first: Handle,
        end: Handle,
    ) -> Handle {
        assert!(
            arena.node(at).link.is_linked(),
            "splice position must be linked into the ring"
        );
        if first == end {
            return at;
        }
        assert!(
            arena.node(first).link.is_linked(),
            "splice range start must be linked"
        );
        assert!(
            arena.node(end).link.is_linked(),
            "splice range end must be linked"
        );

        let last = arena.detach_range(first, end);
        let successor = arena.node(at).link.next;
        arena.attach_range(at, successor, first, last);
        first
    }

    /// Moves every member of `other` to the back of this ring, in order,
    /// leaving `other` empty. O(1).
    pub fn append(&mut self, arena: &mut RingArena<T>, other: &mut Ring<T>) {
        let first = arena.node(other.sentinel).link.next;
        if first != other.sentinel {
            self.splice_before(arena, self.sentinel, first, other.sentinel);
        }
    }

    // ========================================================================
    // Erase
    // ========================================================================

    /// Unlinks `node` and returns the handle of its former successor (the
    /// end handle when the tail was erased). The element stays alive in the
    /// arena.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale, a sentinel, or not linked.
    pub fn erase(&mut self, arena: &mut RingArena<T>, node: Handle) -> Handle {
        arena.expect_element(node);
        let link = arena.node(node).link;
        assert!(link.is_linked(), "erase requires a linked node");
        arena.unlink(node);
        link.next
    }

    /// Unlinks every member in `[first, end)` in forward order and returns
    /// `end`, which stays valid throughout (erasure never touches nodes
    /// outside the range).
    pub fn erase_range(&mut self, arena: &mut RingArena<T>, first: Handle, end: Handle) -> Handle {
        let mut current = first;
        while current != end {
            current = self.erase(arena, current);
        }
        end
    }

    /// Unlinks every member until the sentinel points at itself again.
    ///
    /// Equivalent to erasing `[front, end)`, driven directly off the
    /// sentinel. Elements stay alive in the arena.
    pub fn clear(&mut self, arena: &mut RingArena<T>) {
        loop {
            let first = arena.node(self.sentinel).link.next;
            if first == self.sentinel {
                break;
            }
            let unlinked = arena.unlink(first);
            debug_assert!(unlinked, "a member failed to unlink during clear");
        }
        debug_assert!(self.is_empty(arena));
    }

    /// Replaces the contents with freshly allocated `values`, in order.
    /// Previous members are unlinked (not destroyed).
    pub fn assign<I>(&mut self, arena: &mut RingArena<T>, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear(arena);
        for value in values {
            self.insert_back(arena, value);
        }
    }

    /// Exchanges the contents of two rings. O(1): only the two sentinel
    /// handles trade places; no member link is touched, because sentinel
    /// storage lives in the arena and never moves.
    pub fn swap(&mut self, other: &mut Ring<T>) {
        core::mem::swap(&mut self.sentinel, &mut other.sentinel);
    }

    // ========================================================================
    // Cursors and iteration
    // ========================================================================

    /// Cursor at the first member (equal to [`cursor_end`](Self::cursor_end)
    /// when the ring is empty).
    pub fn cursor_front(&self, arena: &RingArena<T>) -> Cursor {
        Cursor::at(arena.node(self.sentinel).link.next)
    }

    /// Cursor at the last member (equal to [`cursor_end`](Self::cursor_end)
    /// when the ring is empty).
    pub fn cursor_back(&self, arena: &RingArena<T>) -> Cursor {
        Cursor::at(arena.node(self.sentinel).link.prev)
    }

    /// Cursor at the one-past-the-end position.
    pub fn cursor_end(&self) -> Cursor {
        Cursor::at(self.sentinel)
    }

    /// Iterates over member elements, front to back. Reverse with `.rev()`.
    pub fn iter<'a>(&self, arena: &'a RingArena<T>) -> Iter<'a, T> {
        let link = arena.node(self.sentinel).link;
        Iter::new(arena, self.sentinel, link.next, link.prev)
    }

    /// Iterates over member elements mutably, front to back.
    pub fn iter_mut<'a>(&self, arena: &'a mut RingArena<T>) -> IterMut<'a, T> {
        let link = arena.node(self.sentinel).link;
        IterMut::new(arena, self.sentinel, link.next, link.prev)
    }

    /// Iterates over member handles, front to back.
    ///
    /// Collect these first when the loop body needs to restructure the ring.
    pub fn handles<'a>(&self, arena: &'a RingArena<T>) -> Handles<'a, T> {
        let link = arena.node(self.sentinel).link;
        Handles::new(arena, self.sentinel, link.next, link.prev)
    }
}
