// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked-screen navigation for single-host UIs.
//!
//! `parallax_core` decides, for every backstack change (push, pop, replace),
//! which screen elements must be created, reordered, animated, and discarded.
//! Screens stay stacked on top of each other so that adjacent screens can
//! interact: dragging a foreground screen away reveals its background screen.
//! It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Host backstack change
//!       │
//!       ▼
//!   TraversalRequest ──► Navigator::change_key()
//!                              │
//!            ┌─────────────────┼──────────────────────┐
//!            ▼                 ▼                      ▼
//!   ElementStore::resolve   paint order +        focus::broadcast
//!   (create / reuse)        leftover policy
//!                              │
//!                              ▼
//!                   TransitionPipeline::dispatch ──► OnComplete
//!                              │                   (deferred removal)
//!                              ▼
//!                   completion callback
//! ```
//!
//! **[`key`]**: destination keys and the [`CompositeKey`](key::CompositeKey)
//! pairing an optional background with a mandatory foreground.
//!
//! **[`element`]**: the [`Element`](element::Element) trait implemented by
//! materialized screens, with optional capabilities queried by the navigator.
//!
//! **[`store`]**: the element pool. Generational handles, explicit paint
//! order, transient-state capture, and change tracking.
//!
//! **[`host`]**: the single shared [`HostContainer`](host::HostContainer).
//!
//! **[`transition`]**: the first-match transition pipeline and its
//! always-matching [`BasicTransition`](transition::BasicTransition).
//!
//! **[`animation`]**: the [`OnComplete`](animation::OnComplete) continuation
//! and [`PageAnimation`](animation::PageAnimation) completion handles.
//!
//! **[`focus`]** / **[`back_press`]**: focus broadcasting and back-press
//! interception.
//!
//! **[`navigator`]**: the key changer state machine tying it all together.
//!
//! **[`presenter`]**: the [`Presenter`](presenter::Presenter) trait that
//! platform layers implement to mirror stack changes onto a native tree.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) instrumentation with a
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod back_press;
pub mod config;
pub mod element;
pub mod error;
pub mod focus;
pub mod host;
pub mod key;
pub mod navigator;
pub mod presenter;
pub mod store;
pub mod trace;
pub mod transition;

#[cfg(test)]
mod testing;
