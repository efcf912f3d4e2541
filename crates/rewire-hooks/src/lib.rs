//! Reusable hooks for common UI state patterns.
//!
//! Each hook is an explicit state object built on `rewire_core`'s signals
//! and scopes: it owns its subscriptions, exposes its state as data, and
//! tears down deterministically. None of them touch rendering; they are the
//! state layer a view binds to.
//!
//! - [`toggle`] — boolean flip-flop.
//! - [`store`] — value synchronized with a key/value backend.
//! - [`media`] — boolean derived from environment state (viewport,
//!   color scheme), re-evaluated on change notifications.
//! - [`fetch`] — tri-state remote data with stale-response suppression.
//! - [`form`] — field map with synchronous per-field validation.
//! - [`input`] — single validated field with optional debounce.
//! - [`page`] — pagination window over an ordered collection.
//! - [`clipboard`] — clipboard writes with a self-clearing copied flag.

pub mod clipboard;
pub mod fetch;
pub mod form;
pub mod input;
pub mod media;
pub mod page;
pub mod store;
pub mod tests;
pub mod toggle;

pub use clipboard::*;
pub use fetch::*;
pub use form::*;
pub use input::*;
pub use media::*;
pub use page::*;
pub use store::*;
pub use toggle::*;
