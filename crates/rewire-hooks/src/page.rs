//! Pagination window over an ordered collection.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Fixed-size page window with a 1-based current page.
///
/// `go_to` accepts only `1 ..= total_pages` and notifies the page-change
/// callback exactly once per accepted change; out-of-range requests are
/// no-ops. Replacing the items recomputes the page count and clamps the
/// current page back into range.
pub struct PageWindow<T: Clone + PartialEq + 'static> {
    items: RefCell<Vec<T>>,
    page_size: usize,
    current: Cell<usize>,
    on_change: RefCell<Option<Rc<dyn Fn(usize)>>>,
}

impl<T: Clone + PartialEq + 'static> PageWindow<T> {
    /// `page_size` of zero is treated as one.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items: RefCell::new(items),
            page_size: page_size.max(1),
            current: Cell::new(1),
            on_change: RefCell::new(None),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current.get()
    }

    pub fn total_pages(&self) -> usize {
        self.items.borrow().len().div_ceil(self.page_size)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Moves to `page` if it is in range. Returns whether the move was
    /// accepted; accepted moves notify with the new page number.
    pub fn go_to(&self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.current.set(page);
        self.notify(page);
        true
    }

    pub fn next(&self) -> bool {
        self.go_to(self.current.get() + 1)
    }

    pub fn prev(&self) -> bool {
        self.go_to(self.current.get().saturating_sub(1))
    }

    /// The slice of items visible on the current page.
    pub fn page_items(&self) -> Vec<T> {
        let items = self.items.borrow();
        let start = (self.current.get() - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        if start >= items.len() {
            return Vec::new();
        }
        items[start..end].to_vec()
    }

    /// The 1-based page an item would appear on.
    pub fn page_of(&self, item: &T) -> Option<usize> {
        self.items
            .borrow()
            .iter()
            .position(|it| it == item)
            .map(|idx| idx / self.page_size + 1)
    }

    /// Replaces the collection; the page count follows the new length and
    /// the current page is clamped into range (notifying if it moved).
    pub fn set_items(&self, items: Vec<T>) {
        *self.items.borrow_mut() = items;
        let clamped = self.current.get().min(self.total_pages()).max(1);
        if clamped != self.current.get() {
            self.current.set(clamped);
            self.notify(clamped);
        }
    }

    pub fn on_change(&self, cb: impl Fn(usize) + 'static) {
        *self.on_change.borrow_mut() = Some(Rc::new(cb));
    }

    fn notify(&self, page: usize) {
        let cb = self.on_change.borrow().clone();
        if let Some(cb) = cb {
            cb(page);
        }
    }
}

pub fn use_pagination<T: Clone + PartialEq + 'static>(
    items: Vec<T>,
    page_size: usize,
) -> PageWindow<T> {
    PageWindow::new(items, page_size)
}
