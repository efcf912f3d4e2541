use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

struct Inner<T> {
    value: T,
    // Slot index is the SubId; unsubscribed slots stay as None so ids remain stable.
    subs: Vec<Option<Box<dyn Fn(&T)>>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, v: T) {
        let mut inner = self.0.borrow_mut();
        inner.value = v;
        let vref = &inner.value;
        for s in inner.subs.iter().flatten() {
            s(vref);
        }
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let mut inner = self.0.borrow_mut();
        f(&mut inner.value);
        let vref = &inner.value;
        for s in inner.subs.iter().flatten() {
            s(vref);
        }
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        inner.subs.push(Some(Box::new(f)));
        inner.subs.len() - 1
    }

    /// Releases a subscription. Safe to call with an already-released id.
    pub fn unsubscribe(&self, id: SubId) {
        let mut inner = self.0.borrow_mut();
        if let Some(slot) = inner.subs.get_mut(id) {
            *slot = None;
        }
    }

    /// Subscribe and hand the release to the current scope, if any.
    ///
    /// Without a scope this behaves like `subscribe`; the caller keeps the id.
    pub fn subscribe_scoped(&self, f: impl Fn(&T) + 'static) -> SubId {
        let id = self.subscribe(f);
        if let Some(scope) = crate::scope::current_scope() {
            let sig = self.clone();
            scope.add_disposer(move || sig.unsubscribe(id));
        }
        id
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subs.iter().flatten().count()
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
