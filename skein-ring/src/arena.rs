//! Node storage for rings.
//!
//! A [`RingArena`] owns every node — elements and ring sentinels alike — in
//! one [`Registry`], so link fields are handles into a single index space and
//! ring surgery is nothing but handle rewrites. The arena's generation checks
//! are what turn the classic intrusive-list failure modes (dangling iterator,
//! use-after-free through a stale neighbor) into immediate, diagnosable
//! panics instead of memory corruption.

use skein_registry::{Handle, Registry};

/// The linkage embedded in every node: the two ring neighbors.
///
/// Either both handles are set (the node is linked into some ring) or both
/// are [`Handle::NONE`]. Half-set links only ever mean corruption.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Link {
    pub(crate) next: Handle,
    pub(crate) prev: Handle,
}

impl Link {
    pub(crate) const UNSET: Link = Link {
        next: Handle::NONE,
        prev: Handle::NONE,
    };

    /// Returns `true` if both neighbors are set, re-checking the
    /// all-or-nothing invariant on the way.
    #[inline]
    pub(crate) fn is_linked(&self) -> bool {
        debug_assert_eq!(
            self.next.is_some(),
            self.prev.is_some(),
            "link must have both neighbors set or neither"
        );
        self.next.is_some()
    }
}

/// A slot in the arena: the linkage plus the element payload.
///
/// Sentinel nodes are the ones with no payload; they are created and freed
/// only by [`Ring`](crate::Ring) and never surface as elements.
pub(crate) struct Node<T> {
    pub(crate) link: Link,
    pub(crate) value: Option<T>,
}

/// Storage for ring nodes.
///
/// Elements live here, not in any ring: a ring only threads handles through
/// the arena. Linking and unlinking never allocate, never move a value, and
/// never touch more than the two neighbors involved.
///
/// # Example
///
/// ```
/// use skein_ring::{Ring, RingArena};
///
/// let mut arena: RingArena<&str> = RingArena::new();
/// let mut ring = Ring::new(&mut arena);
///
/// let a = arena.insert("a");
/// ring.push_back(&mut arena, a);
/// assert!(arena.is_linked(a));
///
/// // Removing a linked element detaches it first; the ring stays closed.
/// assert_eq!(arena.remove(a), Some("a"));
/// assert!(ring.is_empty(&arena));
/// ```
pub struct RingArena<T> {
    nodes: Registry<Node<T>>,
    elements: usize,
}

impl<T> RingArena<T> {
    /// Creates an empty arena.
    #[inline]
    pub const fn new() -> Self {
        Self {
            nodes: Registry::new(),
            elements: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` nodes before the
    /// backing storage reallocates.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Registry::with_capacity(capacity),
            elements: 0,
        }
    }

    /// Returns the number of live elements (linked or not, sentinels
    /// excluded).
    #[inline]
    pub const fn len(&self) -> usize {
        self.elements
    }

    /// Returns `true` if no elements are live.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.elements == 0
    }

    /// Allocates an element, unlinked. Link it with
    /// [`Ring::push_back`](crate::Ring::push_back) and friends.
    pub fn insert(&mut self, value: T) -> Handle {
        self.elements += 1;
        self.nodes.insert(Node {
            link: Link::UNSET,
            value: Some(value),
        })
    }

    /// Destroys an element, detaching it from its ring first if it is
    /// linked. The ring is left closed — this is the guaranteed finalizer
    /// that makes "element dies while still a member" safe.
    ///
    /// Returns `None` if the handle is stale or null.
    ///
    /// # Panics
    ///
    /// Panics if `handle` names a ring sentinel; sentinels are freed by
    /// [`Ring::dispose`](crate::Ring::dispose) alone.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if self.nodes.get(handle).is_none() {
            return None;
        }
        self.unlink(handle);
        let node = self.nodes.remove(handle)?;
        self.elements -= 1;
        node.value
    }

    /// Returns a reference to the element for `handle`.
    ///
    /// `None` for stale and null handles, and for sentinel positions (the
    /// one-past-the-end handle is never an element).
    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.nodes.get(handle)?.value.as_ref()
    }

    /// Returns a mutable reference to the element for `handle`.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.nodes.get_mut(handle)?.value.as_mut()
    }

    /// Returns `true` if `handle` names a live element.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Returns `true` if `handle` names a live element that is currently a
    /// member of some ring.
    #[inline]
    pub fn is_linked(&self, handle: Handle) -> bool {
        match self.nodes.get(handle) {
            Some(node) => node.value.is_some() && node.link.is_linked(),
            None => false,
        }
    }

    /// Detaches an element from whatever ring it is in, stitching its two
    /// neighbors together. Touches nothing else in the ring.
    ///
    /// Idempotent: returns `false` (and does nothing) if the element is not
    /// linked, or if the handle is stale or null.
    ///
    /// # Panics
    ///
    /// Panics if `handle` names a ring sentinel.
    pub fn unlink(&mut self, handle: Handle) -> bool {
        let Some(node) = self.nodes.get(handle) else {
            return false;
        };
        assert!(
            node.value.is_some(),
            "a ring sentinel cannot be unlinked; use Ring::dispose"
        );
        if !node.link.is_linked() {
            return false;
        }

        let Link { next, prev } = node.link;
        self.node_mut(prev).link.next = next;
        self.node_mut(next).link.prev = prev;
        self.node_mut(handle).link = Link::UNSET;
        true
    }

    // ========================================================================
    // Crate-internal surgery. Everything below trusts ring invariants and
    // panics on a handle that fails to resolve (a stale handle here means a
    // corrupted ring, which is always fatal).
    // ========================================================================

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes
            .get(handle)
            .expect("handle does not resolve to a live ring node")
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes
            .get_mut(handle)
            .expect("handle does not resolve to a live ring node")
    }

    /// Panics unless `handle` is a live element (not a sentinel).
    #[inline]
    pub(crate) fn expect_element(&self, handle: Handle) {
        assert!(
            self.node(handle).value.is_some(),
            "a ring sentinel cannot be used as an element"
        );
    }

    /// Allocates a sentinel node linked to itself (an empty ring).
    pub(crate) fn alloc_sentinel(&mut self) -> Handle {
        let handle = self.nodes.insert(Node {
            link: Link::UNSET,
            value: None,
        });
        self.node_mut(handle).link = Link {
            next: handle,
            prev: handle,
        };
        handle
    }

    /// Frees a sentinel. The ring must already be empty.
    pub(crate) fn free_sentinel(&mut self, sentinel: Handle) {
        let node = self.node(sentinel);
        debug_assert!(node.value.is_none(), "free_sentinel on an element node");
        debug_assert!(
            node.link.next == sentinel && node.link.prev == sentinel,
            "sentinel freed while its ring still has members"
        );
        self.nodes.remove(sentinel);
    }

    /// Links an unset node immediately before `at`.
    pub(crate) fn link_single_before(&mut self, at: Handle, node: Handle) {
        let anchor = self.node(at).link.prev;
        self.node_mut(anchor).link.next = node;
        self.node_mut(at).link.prev = node;

        let inserted = self.node_mut(node);
        inserted.link.prev = anchor;
        inserted.link.next = at;
    }

    /// Links an unset node immediately after `at`.
    #[inline]
    pub(crate) fn link_single_after(&mut self, at: Handle, node: Handle) {
        let next = self.node(at).link.next;
        self.link_single_before(next, node);
    }

    /// Detaches `[first, end)` from its source ring, reconnecting the
    /// source's boundary neighbors, and returns the last node of the range.
    ///
    /// The range must be non-degenerate and must not span its ring's
    /// sentinel (except as the exclusive `end`).
    pub(crate) fn detach_range(&mut self, first: Handle, end: Handle) -> Handle {
        let last = self.node(end).link.prev;
        let before_first = self.node(first).link.prev;
        self.node_mut(before_first).link.next = end;
        self.node_mut(end).link.prev = before_first;
        last
    }

    /// Attaches the detached chain `first..=last` between `prev` and `next`.
    pub(crate) fn attach_range(
        &mut self,
        prev: Handle,
        next: Handle,
        first: Handle,
        last: Handle,
    ) {
        self.node_mut(prev).link.next = first;
        self.node_mut(first).link.prev = prev;
        self.node_mut(last).link.next = next;
        self.node_mut(next).link.prev = last;
    }
}

impl<T> Default for RingArena<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
