//! # Signals, Scopes, and the Hook Clock
//!
//! Rewire's hooks are built on a small single-threaded reactive core rather
//! than ambient global listeners. There are three main pieces:
//!
//! - `Signal<T>` — observable value with explicit subscribe/unsubscribe.
//! - `Scope` / `Dispose` — deterministic ownership of cleanups.
//! - `Clock` — the time source every timer-bearing hook reads.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use rewire_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Subscriptions are explicit: `subscribe` returns a `SubId` the owner must
//! release with `unsubscribe`, or hand to the current `Scope` via
//! `subscribe_scoped` so teardown happens when the scope is disposed. Hooks
//! that track an external source (the media query observer, for instance)
//! own their subscription and release it on drop.
//!
//! ## Scopes and effects
//!
//! A `Scope` collects cleanups for everything created while it is current:
//!
//! ```rust
//! use rewire_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     effect(|| {
//!         log::debug!("hook mounted");
//!         on_unmount(|| log::debug!("hook unmounted"))
//!     });
//! });
//! scope.dispose(); // runs the unmount cleanup exactly once
//! ```
//!
//! ## The clock
//!
//! Timer semantics (the clipboard's copied window, input debounce) never
//! spawn detached timers. They stamp a deadline from `clock::now()` and let
//! the owner's `tick()` observe it, so a disposed hook can never fire a
//! stale callback. Tests install a `TestClock` and drive time by hand.

pub mod clock;
pub mod effects;
pub mod scope;
pub mod signal;

pub use clock::*;
pub use effects::*;
pub use scope::*;
pub use signal::*;
