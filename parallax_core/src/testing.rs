// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles shared by the unit tests.
//!
//! Elements are keyed by `&'static str`. Everything an element observes is
//! appended to a shared [`Journal`] so tests can assert on it after the
//! element has been handed to the store.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Rect, Size};

use crate::animation::{OnComplete, PageAnimation};
use crate::back_press::{BackPressInterceptor, InterceptResult};
use crate::element::{Element, ElementFactory, ExpandablePage, StableId, TransientState};
use crate::focus::{FocusObserver, FocusedScreen};
use crate::host::HostContainer;
use crate::store::{Contexts, ElementId, ElementStore};
use crate::transition::{ScreenTransition, Transition, TransitionResult};

pub(crate) type Key = &'static str;

/// Has a context for every key.
pub(crate) struct Everywhere;

impl<K> Contexts<K, ()> for Everywhere {
    fn context(&self, _key: &K) -> Option<&()> {
        Some(&())
    }
}

/// Keys of the attached elements, bottom to top.
pub(crate) fn keys(store: &ElementStore<Key>) -> Vec<Key> {
    store
        .attached()
        .filter_map(|id| store.key(id).copied())
        .collect()
}

/// Everything fake elements and factories observed.
#[derive(Default)]
pub(crate) struct Journal {
    /// Keys in creation order.
    pub(crate) created: Vec<Key>,
    /// `(observer, focused)` per focus notification.
    pub(crate) focus: Vec<(Key, Option<Key>)>,
    /// Keys asked to intercept a back press.
    pub(crate) back_presses: Vec<Key>,
    /// `("key:expand" | "key:collapse", anchor, handle)` per page animation.
    pub(crate) animations: Vec<(String, Rect, PageAnimation)>,
}

impl Journal {
    pub(crate) fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }
}

struct FakeElement {
    key: Key,
    stable_id: Option<StableId>,
    size: Size,
    state: Vec<u8>,
    observes_focus: bool,
    intercept: Option<InterceptResult>,
    expandable: bool,
    interrupts: bool,
    running: Option<PageAnimation>,
    journal: Rc<RefCell<Journal>>,
}

impl Element<Key> for FakeElement {
    fn key(&self) -> &Key {
        &self.key
    }

    fn stable_id(&self) -> Option<StableId> {
        self.stable_id
    }

    fn size(&self) -> Size {
        self.size
    }

    fn save_state(&self) -> TransientState {
        TransientState(self.state.clone())
    }

    fn restore_state(&mut self, state: &TransientState) {
        self.state.clone_from(&state.0);
    }

    fn as_focus_observer(&mut self) -> Option<&mut dyn FocusObserver<Key>> {
        if self.observes_focus {
            Some(self)
        } else {
            None
        }
    }

    fn as_back_press_interceptor(&mut self) -> Option<&mut dyn BackPressInterceptor> {
        if self.intercept.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn as_expandable(&mut self) -> Option<&mut dyn ExpandablePage> {
        if self.expandable { Some(self) } else { None }
    }
}

impl FocusObserver<Key> for FakeElement {
    fn on_screen_focus_changed(&mut self, focused: Option<&FocusedScreen<Key>>) {
        self.journal
            .borrow_mut()
            .focus
            .push((self.key, focused.map(|f| f.key)));
        if self.interrupts
            && focused.is_none_or(|f| f.key != self.key)
            && let Some(running) = self.running.take()
        {
            running.finish();
        }
    }
}

impl BackPressInterceptor for FakeElement {
    fn on_intercept_back_press(&mut self) -> InterceptResult {
        self.journal.borrow_mut().back_presses.push(self.key);
        self.intercept.unwrap_or(InterceptResult::Ignored)
    }
}

impl FakeElement {
    fn animate(&mut self, verb: &str, anchor: Rect) -> PageAnimation {
        if self.interrupts
            && let Some(previous) = self.running.take()
        {
            previous.finish();
        }
        let animation = PageAnimation::new();
        if self.interrupts {
            self.running = Some(animation.clone());
        }
        self.journal.borrow_mut().animations.push((
            format!("{}:{verb}", self.key),
            anchor,
            animation.clone(),
        ));
        animation
    }
}

impl ExpandablePage for FakeElement {
    fn expand_from(&mut self, anchor: Rect) -> PageAnimation {
        self.animate("expand", anchor)
    }

    fn collapse_to(&mut self, anchor: Rect) -> PageAnimation {
        self.animate("collapse", anchor)
    }
}

/// Builds [`FakeElement`]s. Every key gets a stable ID on first sight unless
/// configured otherwise, and every element observes focus.
pub(crate) struct FakeFactory {
    journal: Rc<RefCell<Journal>>,
    identities: BTreeMap<Key, u32>,
    anonymous: Vec<Key>,
    refused: Vec<Key>,
    blind: Vec<Key>,
    interceptors: BTreeMap<Key, InterceptResult>,
    expandable: Vec<Key>,
    interrupting: Vec<Key>,
    sizes: BTreeMap<Key, Size>,
}

impl FakeFactory {
    pub(crate) fn new(journal: Rc<RefCell<Journal>>) -> Self {
        Self {
            journal,
            identities: BTreeMap::new(),
            anonymous: Vec::new(),
            refused: Vec::new(),
            blind: Vec::new(),
            interceptors: BTreeMap::new(),
            expandable: Vec::new(),
            interrupting: Vec::new(),
            sizes: BTreeMap::new(),
        }
    }

    /// Elements for `key` report no stable ID.
    pub(crate) fn without_identity(mut self, key: Key) -> Self {
        self.anonymous.push(key);
        self
    }

    /// The factory does not know `key`.
    pub(crate) fn refusing(mut self, key: Key) -> Self {
        self.refused.push(key);
        self
    }

    /// Elements for `key` do not observe focus.
    pub(crate) fn not_observing(mut self, key: Key) -> Self {
        self.blind.push(key);
        self
    }

    /// Elements for `key` answer back presses with `result`.
    pub(crate) fn intercepting(mut self, key: Key, result: InterceptResult) -> Self {
        self.interceptors.insert(key, result);
        self
    }

    /// Elements for `key` are expandable pages.
    pub(crate) fn expandable(mut self, key: Key) -> Self {
        self.expandable.push(key);
        self
    }

    /// Elements for `key` are expandable pages that cut their running
    /// animation short when they start another one or lose focus.
    pub(crate) fn interrupting(mut self, key: Key) -> Self {
        self.expandable.push(key);
        self.interrupting.push(key);
        self
    }

    /// Elements for `key` report this size.
    pub(crate) fn sized(mut self, key: Key, width: f64, height: f64) -> Self {
        self.sizes.insert(key, Size::new(width, height));
        self
    }

    /// Future elements for `key` report `id` as their stable ID.
    pub(crate) fn reassign_identity(&mut self, key: Key, id: u32) {
        self.identities.insert(key, id);
    }

    /// Keys created so far, in order.
    pub(crate) fn created(&self) -> Vec<Key> {
        self.journal.borrow().created.clone()
    }
}

impl ElementFactory<Key, ()> for FakeFactory {
    fn create(&mut self, key: &Key, _context: &()) -> Option<Box<dyn Element<Key>>> {
        let key = *key;
        if self.refused.contains(&key) {
            return None;
        }
        let next = u32::try_from(self.identities.len()).unwrap_or(u32::MAX);
        let stable_id = *self.identities.entry(key).or_insert(next);
        self.journal.borrow_mut().created.push(key);
        Some(Box::new(FakeElement {
            key,
            stable_id: (!self.anonymous.contains(&key)).then_some(StableId(stable_id)),
            size: self.sizes.get(&key).copied().unwrap_or(Size::ZERO),
            state: Vec::new(),
            observes_focus: !self.blind.contains(&key),
            intercept: self.interceptors.get(&key).copied(),
            expandable: self.expandable.contains(&key),
            interrupts: self.interrupting.contains(&key),
            running: None,
            journal: self.journal.clone(),
        }))
    }
}

/// Transition log shared between scripted handlers and the test.
#[derive(Clone, Default)]
pub(crate) struct SharedLog {
    entries: Rc<RefCell<Vec<String>>>,
    transitions: Rc<RefCell<Vec<(Key, Key, bool)>>>,
}

impl SharedLog {
    /// `"name:event"` entries in order.
    pub(crate) fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// `(from, to, going_forward)` for every transition a handler accepted.
    pub(crate) fn transitions(&self) -> Vec<(Key, Key, bool)> {
        self.transitions.borrow().clone()
    }

    fn push(&self, name: &str, event: &str) {
        self.entries.borrow_mut().push(format!("{name}:{event}"));
    }
}

/// Continuations held back by [`Scripted::holding`] handlers.
#[derive(Clone, Default)]
pub(crate) struct Held(Rc<RefCell<Vec<OnComplete>>>);

impl Held {
    /// Number of continuations waiting.
    pub(crate) fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Runs every waiting continuation, as if the animations ended.
    pub(crate) fn finish_all(&self) {
        let pending: Vec<OnComplete> = self.0.borrow_mut().drain(..).collect();
        for on_complete in pending {
            on_complete.call();
        }
    }
}

enum Script {
    Decline,
    Complete,
    Hold(Held),
}

/// A transition handler with canned behaviour.
pub(crate) struct Scripted {
    name: &'static str,
    script: Script,
    log: SharedLog,
}

impl Scripted {
    /// Declines every transition.
    pub(crate) fn declining(name: &'static str, log: SharedLog) -> Self {
        Self {
            name,
            script: Script::Decline,
            log,
        }
    }

    /// Accepts every transition and completes at once.
    pub(crate) fn completing(name: &'static str, log: SharedLog) -> Self {
        Self {
            name,
            script: Script::Complete,
            log,
        }
    }

    /// Accepts every transition and completes when the test says so.
    pub(crate) fn holding(name: &'static str, log: SharedLog) -> (Self, Held) {
        let held = Held::default();
        let handler = Self {
            name,
            script: Script::Hold(held.clone()),
            log,
        };
        (handler, held)
    }
}

impl ScreenTransition<Key> for Scripted {
    fn prepare_background(
        &mut self,
        _host: &HostContainer<Key>,
        _background: ElementId,
        _foreground: ElementId,
        _foreground_key: &Key,
    ) {
        self.log.push(self.name, "prepare");
    }

    fn transition(
        &mut self,
        _host: &HostContainer<Key>,
        transition: &Transition<Key>,
        on_complete: OnComplete,
    ) -> TransitionResult {
        match &self.script {
            Script::Decline => {
                self.log.push(self.name, "declined");
                return TransitionResult::Declined(on_complete);
            }
            Script::Complete => on_complete.call(),
            Script::Hold(held) => held.0.borrow_mut().push(on_complete),
        }
        self.log.push(self.name, "handled");
        self.log.transitions.borrow_mut().push((
            transition.from_key,
            transition.to_key,
            transition.going_forward,
        ));
        TransitionResult::Handled
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
