//! Field map with synchronous per-field validation.
//!
//! The error map is a pure derivation of current values and rules: every
//! mutation re-runs validation for all fields, so it can never go stale.
//! Rule results are plain data describing UI state, not errors to handle.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Returns an error message, or `None` when the value passes.
pub type Rule<V> = Rc<dyn Fn(&V) -> Option<String>>;

struct Field<V> {
    name: String,
    value: V,
    initial: V,
    rules: Vec<Rule<V>>,
}

pub struct FormState<V: Clone + 'static> {
    fields: RefCell<Vec<Field<V>>>,
    errors: RefCell<BTreeMap<String, Vec<String>>>,
    on_field_change: Option<Rc<dyn Fn(&str, &V)>>,
}

/// Declares fields in order, with zero or more rules each.
pub struct FormBuilder<V: Clone + 'static> {
    fields: Vec<Field<V>>,
    on_field_change: Option<Rc<dyn Fn(&str, &V)>>,
}

impl<V: Clone + 'static> FormBuilder<V> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            on_field_change: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, initial: V) -> Self {
        let name = name.into();
        self.fields.push(Field {
            name,
            value: initial.clone(),
            initial,
            rules: Vec::new(),
        });
        self
    }

    /// Adds a rule to the most recently declared field with `name`.
    /// Multiple rules accumulate and report in declaration order.
    pub fn rule(mut self, name: &str, rule: impl Fn(&V) -> Option<String> + 'static) -> Self {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.rules.push(Rc::new(rule)),
            None => log::warn!("rule for undeclared field {name:?} ignored"),
        }
        self
    }

    pub fn on_field_change(mut self, cb: impl Fn(&str, &V) + 'static) -> Self {
        self.on_field_change = Some(Rc::new(cb));
        self
    }

    /// Builds the form and runs the initial validation pass.
    pub fn build(self) -> FormState<V> {
        let form = FormState {
            fields: RefCell::new(self.fields),
            errors: RefCell::new(BTreeMap::new()),
            on_field_change: self.on_field_change,
        };
        form.revalidate();
        form
    }
}

impl<V: Clone + 'static> Default for FormBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + 'static> FormState<V> {
    /// Sets a field's value, revalidates the whole form, and notifies.
    /// Unknown names are logged and ignored.
    pub fn set_field(&self, name: &str, value: V) {
        {
            let mut fields = self.fields.borrow_mut();
            let Some(field) = fields.iter_mut().find(|f| f.name == name) else {
                log::warn!("set_field: unknown field {name:?}");
                return;
            };
            field.value = value.clone();
        }
        self.revalidate();
        if let Some(cb) = &self.on_field_change {
            cb(name, &value);
        }
    }

    /// Recomputes the error map from current values and rules.
    pub fn revalidate(&self) {
        let mut errors = BTreeMap::new();
        for field in self.fields.borrow().iter() {
            let messages: Vec<String> = field
                .rules
                .iter()
                .filter_map(|rule| rule(&field.value))
                .collect();
            if !messages.is_empty() {
                errors.insert(field.name.clone(), messages);
            }
        }
        *self.errors.borrow_mut() = errors;
    }

    pub fn value(&self, name: &str) -> Option<V> {
        self.fields
            .borrow()
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.clone())
    }

    /// Current values in declaration order.
    pub fn snapshot(&self) -> Vec<(String, V)> {
        self.fields
            .borrow()
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        self.errors.borrow().clone()
    }

    pub fn field_errors(&self, name: &str) -> Vec<String> {
        self.errors.borrow().get(name).cloned().unwrap_or_default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Restores every field to its initial value and revalidates.
    pub fn reset(&self) {
        for field in self.fields.borrow_mut().iter_mut() {
            field.value = field.initial.clone();
        }
        self.revalidate();
    }
}

pub fn use_form<V: Clone + 'static>() -> FormBuilder<V> {
    FormBuilder::new()
}
