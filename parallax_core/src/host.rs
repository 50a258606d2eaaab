// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared element stack.
//!
//! Everything runs on one UI thread, but the stack is reached from two
//! places: the navigator during a traversal, and [`OnComplete`]
//! continuations that fire later when an animation ends. [`HostContainer`]
//! is the reference-counted handle both hold.
//!
//! # Re-entrancy
//!
//! Element callbacks (factories, focus observers, expandable pages) run while
//! the store is borrowed. If such a callback finishes an animation, the
//! continuation it triggers cannot borrow the store again. Continuations
//! therefore go through [`HostContainer::update`]: the update runs at once
//! when the store is free, and is otherwise queued until the borrow holder
//! calls [`HostContainer::flush`]. The navigator and
//! [`BasicTransition`](crate::transition::BasicTransition) flush whenever
//! they release the store, so a handler may run its continuation
//! synchronously.
//!
//! [`OnComplete`]: crate::animation::OnComplete

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;
use core::hash::Hash;

use crate::store::ElementStore;

type Update<K> = Box<dyn FnOnce(&mut ElementStore<K>)>;

struct Shared<K> {
    store: RefCell<ElementStore<K>>,
    queued: RefCell<VecDeque<Update<K>>>,
}

/// Shared handle to an [`ElementStore`].
pub struct HostContainer<K> {
    shared: Rc<Shared<K>>,
}

impl<K: Clone + Eq + Hash> HostContainer<K> {
    /// Creates a container with an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Rc::new(Shared {
                store: RefCell::new(ElementStore::new()),
                queued: RefCell::new(VecDeque::new()),
            }),
        }
    }
}

impl<K: Clone + Eq + Hash> Default for HostContainer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> HostContainer<K> {
    /// Borrows the store.
    ///
    /// # Panics
    ///
    /// Panics if the store is mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, ElementStore<K>> {
        self.shared.store.borrow()
    }

    /// Borrows the store mutably.
    ///
    /// Code reachable from element callbacks must use
    /// [`update`](Self::update) instead.
    ///
    /// # Panics
    ///
    /// Panics if the store is already borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, ElementStore<K>> {
        self.shared.store.borrow_mut()
    }

    /// Returns whether the store is borrowed right now.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.shared.store.try_borrow_mut().is_err()
    }

    /// Runs `action` on the store now, or queues it if the store is borrowed.
    ///
    /// Queued updates run in submission order.
    pub fn update(&self, action: impl FnOnce(&mut ElementStore<K>) + 'static) {
        self.shared.queued.borrow_mut().push_back(Box::new(action));
        self.flush();
    }

    /// Runs queued updates until the queue is empty or the store is borrowed.
    pub fn flush(&self) {
        loop {
            let Ok(mut store) = self.shared.store.try_borrow_mut() else {
                return;
            };
            let Some(action) = self.shared.queued.borrow_mut().pop_front() else {
                return;
            };
            action(&mut store);
        }
    }

    /// Number of updates waiting for the store.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.shared.queued.borrow().len()
    }
}

impl<K> Clone for HostContainer<K> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<K> fmt::Debug for HostContainer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContainer")
            .field("store", &self.shared.store)
            .field("queued", &self.queued())
            .finish()
    }
}
