use rewire_core::{Signal, signal};

/// Boolean flip-flop.
#[derive(Clone)]
pub struct Toggle {
    value: Signal<bool>,
}

impl Toggle {
    pub fn new(initial: bool) -> Self {
        Self {
            value: signal(initial),
        }
    }

    pub fn get(&self) -> bool {
        self.value.get()
    }

    pub fn flip(&self) {
        self.value.update(|v| *v = !*v);
    }

    pub fn set(&self, on: bool) {
        self.value.set(on);
    }

    pub fn signal(&self) -> &Signal<bool> {
        &self.value
    }
}

pub fn use_toggle(initial: bool) -> Toggle {
    Toggle::new(initial)
}
