//! Single validated field with optional debounce.
//!
//! The debounced path stages a value with a clock deadline; `tick()`
//! commits it once the deadline passes. A newer staged value supersedes the
//! pending one and restarts the delay, so only the latest edit commits.

use std::cell::RefCell;

use rewire_core::{Signal, clock, signal};
use web_time::{Duration, Instant};

use crate::form::Rule;

struct Staged<V> {
    value: V,
    due: Instant,
}

pub struct InputState<V: Clone + 'static> {
    value: Signal<V>,
    error: Signal<Option<String>>,
    rule: Option<Rule<V>>,
    staged: RefCell<Option<Staged<V>>>,
}

impl<V: Clone + 'static> InputState<V> {
    pub fn new(initial: V, rule: Option<Rule<V>>) -> Self {
        let error = signal(rule.as_ref().and_then(|r| r(&initial)));
        Self {
            value: signal(initial),
            error,
            rule,
            staged: RefCell::new(None),
        }
    }

    /// Commits immediately, discarding any staged value.
    pub fn set(&self, v: V) {
        *self.staged.borrow_mut() = None;
        self.commit(v);
    }

    /// Stages a value to commit after `delay` of no further edits.
    pub fn set_debounced(&self, v: V, delay: Duration) {
        *self.staged.borrow_mut() = Some(Staged {
            value: v,
            due: clock::now() + delay,
        });
    }

    /// Commits a staged value whose deadline has passed.
    pub fn tick(&self) {
        let due = self
            .staged
            .borrow()
            .as_ref()
            .is_some_and(|s| clock::now() >= s.due);
        if due && let Some(staged) = self.staged.borrow_mut().take() {
            self.commit(staged.value);
        }
    }

    fn commit(&self, v: V) {
        self.error.set(self.rule.as_ref().and_then(|r| r(&v)));
        self.value.set(v);
    }

    pub fn value(&self) -> V {
        self.value.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn has_pending(&self) -> bool {
        self.staged.borrow().is_some()
    }

    pub fn value_signal(&self) -> &Signal<V> {
        &self.value
    }

    pub fn error_signal(&self) -> &Signal<Option<String>> {
        &self.error
    }
}

pub fn use_input<V: Clone + 'static>(initial: V) -> InputState<V> {
    InputState::new(initial, None)
}

pub fn use_validated_input<V: Clone + 'static>(
    initial: V,
    rule: impl Fn(&V) -> Option<String> + 'static,
) -> InputState<V> {
    InputState::new(initial, Some(std::rc::Rc::new(rule)))
}
