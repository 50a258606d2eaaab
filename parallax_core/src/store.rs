// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element pool with allocation, paint order, and transient-state capture.
//!
//! [`ElementStore`] exclusively owns every materialized element. Elements are
//! addressed by [`ElementId`] handles: a slot index plus a generation counter,
//! so a handle held across a transition becomes stale (and harmless) once its
//! element is removed, even if the slot is reused.
//!
//! # Paint order
//!
//! Attached elements form an explicit stack, bottom to top. Newly created
//! elements are attached on top; the navigator fixes the order afterwards
//! with [`bring_to_front`](ElementStore::bring_to_front).
//!
//! # Change tracking
//!
//! Additions, removals, and reorders are recorded until the next
//! [`drain_changes`](ElementStore::drain_changes) so that a
//! [`Presenter`](crate::presenter::Presenter) can mirror them. Draining is
//! optional: an element attached and removed between two drains cancels out,
//! so the record never holds more entries than there are slots.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use hashbrown::HashMap;

use crate::element::{Element, ElementFactory, StableId, TransientState};
use crate::error::NavigatorError;
use crate::presenter::StackChanges;

/// Sentinel value for "no slot".
const INVALID: u32 = u32::MAX;

/// A handle to an element in an [`ElementStore`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    /// Slot index into the store.
    pub(crate) idx: u32,
    /// Must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl ElementId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

/// Looks up the rendering context for a destination key.
pub trait Contexts<K, C> {
    /// Returns the context for `key`, if the host supplied one.
    fn context(&self, key: &K) -> Option<&C>;
}

impl<K: Eq + Hash, C, S: BuildHasher> Contexts<K, C> for HashMap<K, C, S> {
    fn context(&self, key: &K) -> Option<&C> {
        self.get(key)
    }
}

impl<K: Ord, C> Contexts<K, C> for BTreeMap<K, C> {
    fn context(&self, key: &K) -> Option<&C> {
        self.get(key)
    }
}

/// Outcome of a successful [`ElementStore::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// The element bound to the key.
    pub id: ElementId,
    /// Whether the element was created by this call.
    pub created: bool,
}

#[derive(Clone, Debug)]
struct SavedState {
    stable_id: StableId,
    state: TransientState,
}

/// Owner of all materialized elements.
pub struct ElementStore<K> {
    // -- Slots --
    elements: Vec<Option<Box<dyn Element<K>>>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,

    // -- Paint order, bottom to top --
    order: Vec<u32>,

    // -- Transient state, keyed by destination --
    saved: HashMap<K, SavedState>,

    // -- Slots referenced by the latest traversal --
    retained: [u32; 2],

    // -- Lifecycle tracking --
    pending_added: Vec<u32>,
    pending_removed: Vec<u32>,
    order_changed: bool,
}

impl<K> fmt::Debug for ElementStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementStore")
            .field("order", &self.order)
            .field("free_list", &self.free_list)
            .field("saved", &self.saved.len())
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash> Default for ElementStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> ElementStore<K> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
            saved: HashMap::new(),
            retained: [INVALID; 2],
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            order_changed: false,
        }
    }

    // -- Pool API --

    /// Returns the attached element for `key`, creating it if needed.
    ///
    /// A new element is built by `factory` with the context `contexts` holds
    /// for `key`. Captured transient state for `key` is reapplied when the
    /// new element's [`StableId`] matches the one it was captured from. The
    /// element is attached on top of the paint order.
    ///
    /// Returns `Ok(None)` when there is no context for `key` or the factory
    /// does not know it.
    ///
    /// # Errors
    ///
    /// [`NavigatorError::MissingIdentity`] if the new element has no
    /// [`StableId`]. The element is dropped without being attached.
    pub fn resolve<C>(
        &mut self,
        key: &K,
        contexts: &dyn Contexts<K, C>,
        factory: &mut dyn ElementFactory<K, C>,
    ) -> Result<Option<Resolved>, NavigatorError> {
        if let Some(id) = self.find(key) {
            return Ok(Some(Resolved { id, created: false }));
        }

        let Some(context) = contexts.context(key) else {
            return Ok(None);
        };
        let Some(mut element) = factory.create(key, context) else {
            return Ok(None);
        };

        let Some(stable_id) = element.stable_id() else {
            return Err(NavigatorError::MissingIdentity {
                element: element.type_name(),
            });
        };
        if let Some(saved) = self.saved.get(key)
            && saved.stable_id == stable_id
        {
            element.restore_state(&saved.state);
        }

        let id = self.attach(element);
        Ok(Some(Resolved { id, created: true }))
    }

    /// Captures the element's transient state and detaches it.
    ///
    /// Returns `false` (and does nothing) if the handle is stale, so removing
    /// the same element twice is harmless.
    pub fn capture_and_remove(&mut self, id: ElementId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        let idx = id.idx;
        let Some(element) = self.elements[idx as usize].take() else {
            return false;
        };

        if let Some(stable_id) = element.stable_id() {
            self.saved.insert(
                element.key().clone(),
                SavedState {
                    stable_id,
                    state: element.save_state(),
                },
            );
        }
        drop(element);

        self.order.retain(|&slot| slot != idx);
        self.retained.iter_mut().for_each(|slot| {
            if *slot == idx {
                *slot = INVALID;
            }
        });
        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
        // An element attached and removed between two drains is never
        // reported, so the pending lists stay bounded by the slot count.
        if let Some(pos) = self.pending_added.iter().position(|&slot| slot == idx) {
            self.pending_added.remove(pos);
        } else if !self.pending_removed.contains(&idx) {
            self.pending_removed.push(idx);
        }
        true
    }

    /// Returns the transient state captured for `key`, if any.
    #[must_use]
    pub fn saved_state(&self, key: &K) -> Option<&TransientState> {
        self.saved.get(key).map(|saved| &saved.state)
    }

    // -- Queries --

    /// Returns the attached element bound to `key`.
    #[must_use]
    pub fn find(&self, key: &K) -> Option<ElementId> {
        self.attached().find(|&id| self.key(id) == Some(key))
    }

    /// Returns whether the handle refers to an attached element.
    #[must_use]
    pub fn is_attached(&self, id: ElementId) -> bool {
        (id.idx as usize) < self.elements.len()
            && self.generation[id.idx as usize] == id.generation
            && self.elements[id.idx as usize].is_some()
    }

    /// Returns the element behind a handle.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&(dyn Element<K> + 'static)> {
        if !self.is_attached(id) {
            return None;
        }
        self.elements[id.idx as usize].as_deref()
    }

    /// Returns the element behind a handle, mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut (dyn Element<K> + 'static)> {
        if !self.is_attached(id) {
            return None;
        }
        self.elements[id.idx as usize].as_deref_mut()
    }

    /// Returns the destination key of an attached element.
    #[must_use]
    pub fn key(&self, id: ElementId) -> Option<&K> {
        self.get(id).map(|element| element.key())
    }

    /// Number of attached elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates attached elements from bottom to top of the paint order.
    #[must_use]
    pub fn attached(&self) -> Attached<'_, K> {
        Attached {
            store: self,
            pos: 0,
        }
    }

    /// The topmost attached element.
    #[must_use]
    pub fn top(&self) -> Option<ElementId> {
        self.order.last().map(|&idx| self.handle(idx))
    }

    /// The element directly beneath the topmost one.
    #[must_use]
    pub fn second_from_top(&self) -> Option<ElementId> {
        let len = self.order.len();
        (len >= 2).then(|| self.handle(self.order[len - 2]))
    }

    // -- Ordering --

    /// Moves an attached element to the top of the paint order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn bring_to_front(&mut self, id: ElementId) {
        self.validate(id);
        if self.order.last() == Some(&id.idx) {
            return;
        }
        self.order.retain(|&slot| slot != id.idx);
        self.order.push(id.idx);
        self.order_changed = true;
    }

    // -- Retention --

    /// Records the elements the latest traversal resolved.
    ///
    /// Deferred removals skip these, so an overlapping traversal that reused
    /// an element scheduled for removal keeps it.
    pub fn set_retained(&mut self, background: Option<ElementId>, foreground: ElementId) {
        self.retained = [background.map_or(INVALID, |id| id.idx), foreground.idx];
    }

    /// Returns whether the latest traversal resolved this element.
    #[must_use]
    pub fn is_retained(&self, id: ElementId) -> bool {
        self.is_attached(id) && self.retained.contains(&id.idx)
    }

    // -- Change tracking --

    /// Returns and clears the changes recorded since the last call.
    pub fn drain_changes(&mut self) -> StackChanges {
        let added = core::mem::take(&mut self.pending_added);
        let removed = core::mem::take(&mut self.pending_removed);
        let order_changed = core::mem::take(&mut self.order_changed);
        StackChanges {
            added,
            removed,
            order: if order_changed {
                Some(self.order.clone())
            } else {
                None
            },
        }
    }

    // -- Internal helpers --

    fn attach(&mut self, element: Box<dyn Element<K>>) -> ElementId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.elements[idx as usize] = Some(element);
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "a screen stack never approaches u32::MAX elements"
            )]
            let idx = self.elements.len() as u32;
            self.elements.push(Some(element));
            self.generation.push(0);
            idx
        };
        self.order.push(idx);
        self.pending_added.push(idx);
        self.handle(idx)
    }

    fn handle(&self, idx: u32) -> ElementId {
        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: ElementId) {
        assert!(self.is_attached(id), "stale ElementId: {id:?}");
    }
}

/// Iterator over attached elements, bottom to top.
///
/// Created by [`ElementStore::attached`].
#[derive(Debug)]
pub struct Attached<'a, K> {
    store: &'a ElementStore<K>,
    pos: usize,
}

impl<K> Iterator for Attached<'_, K> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let idx = *self.store.order.get(self.pos)?;
        self.pos += 1;
        Some(ElementId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}
