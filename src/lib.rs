//! # gilt-control
//!
//! Declarative controllers for component trees: named refs resolved by
//! selector, and selector-scoped event listeners dispatched from an injected
//! event bus.
//!
//! A controller is attached to a *view* (the root of a subtree). It never
//! owns components; it finds them through a [`ComponentRegistry`](component::ComponentRegistry)
//! using a small CSS-like selector language, and reacts to events that
//! components publish on an [`EventBus`](event::EventBus).
//!
//! ## Core Systems
//!
//! - **[`component`]** - Slotmap-backed component tree, queries, registry seam
//! - **[`selector`]** - Selector tokenizer, parser, AST and matcher
//! - **[`event`]** - Event bus, cancellable dispatch outcomes, observers
//! - **[`controller`]** - Controllers, refs, ref templates, listener sets, lifecycle

// Foundation
pub mod component;
pub mod selector;

// Events
pub mod event;

// Controllers
pub mod controller;
