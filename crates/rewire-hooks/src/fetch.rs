//! Tri-state remote data with stale-response suppression.
//!
//! `Fetcher` issues one GET per distinct `(url, headers)` identity through
//! a `Transport` seam. Completions come back over a channel tagged with the
//! generation that dispatched them; `pump()` applies only the current
//! generation, so a response arriving after its inputs were superseded can
//! never overwrite newer state. No retries: a failure is terminal for that
//! identity until the request changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, channel};

use rewire_core::{Signal, signal};
use serde::de::DeserializeOwned;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Pending,
    Success,
    Failure,
}

#[derive(Clone, Debug)]
pub struct FetchSnapshot<T: Clone> {
    pub status: FetchStatus,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Clone> FetchSnapshot<T> {
    fn pending() -> Self {
        Self {
            status: FetchStatus::Pending,
            data: None,
            error: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Raw transport-level response: status code plus body text.
#[derive(Clone, Debug)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// A finished request, tagged with the generation that dispatched it.
pub type Completion = (u64, Result<FetchResponse, FetchError>);

/// Issues requests. The platform implementation performs a blocking GET on
/// a worker thread; tests resolve completions by hand.
pub trait Transport {
    fn dispatch(&self, request: FetchRequest, generation: u64, done: Sender<Completion>);
}

pub struct Fetcher<T: DeserializeOwned + Clone + 'static> {
    transport: Rc<dyn Transport>,
    state: Signal<FetchSnapshot<T>>,
    current: RefCell<Option<FetchRequest>>,
    generation: Cell<u64>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl<T: DeserializeOwned + Clone + 'static> Fetcher<T> {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        let (tx, rx) = channel();
        Self {
            transport,
            state: signal(FetchSnapshot::pending()),
            current: RefCell::new(None),
            generation: Cell::new(0),
            tx,
            rx,
        }
    }

    /// Starts a request, superseding any in-flight one.
    ///
    /// Loading the identity already current is a no-op, including after a
    /// failure: a failed identity stays failed until the inputs change.
    pub fn load(&self, request: FetchRequest) {
        if self.current.borrow().as_ref() == Some(&request) {
            return;
        }
        *self.current.borrow_mut() = Some(request.clone());
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.state.set(FetchSnapshot::pending());
        self.transport.dispatch(request, generation, self.tx.clone());
    }

    /// Drains arrived completions, dropping stale generations.
    pub fn pump(&self) {
        while let Ok((generation, outcome)) = self.rx.try_recv() {
            if generation != self.generation.get() {
                log::debug!("dropping stale fetch completion (generation {generation})");
                continue;
            }
            self.state.set(Self::resolve(outcome));
        }
    }

    fn resolve(outcome: Result<FetchResponse, FetchError>) -> FetchSnapshot<T> {
        let err = match outcome {
            Ok(resp) if (200..300).contains(&resp.status) => {
                match serde_json::from_str::<T>(&resp.body) {
                    Ok(data) => {
                        return FetchSnapshot {
                            status: FetchStatus::Success,
                            data: Some(data),
                            error: None,
                        };
                    }
                    Err(e) => FetchError::Decode(e.to_string()),
                }
            }
            Ok(resp) => FetchError::Status {
                status: resp.status,
                message: snippet(&resp.body),
            },
            Err(e) => e,
        };
        FetchSnapshot {
            status: FetchStatus::Failure,
            data: None,
            error: Some(err.to_string()),
        }
    }

    pub fn snapshot(&self) -> FetchSnapshot<T> {
        self.state.get()
    }

    pub fn status(&self) -> FetchStatus {
        self.state.with(|s| s.status)
    }

    pub fn state(&self) -> &Signal<FetchSnapshot<T>> {
        &self.state
    }

    pub fn request(&self) -> Option<FetchRequest> {
        self.current.borrow().clone()
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_owned();
    }
    match trimmed.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_owned(),
    }
}

/// Creates a fetcher and starts loading `url` immediately.
pub fn use_fetch<T: DeserializeOwned + Clone + 'static>(
    transport: Rc<dyn Transport>,
    url: impl Into<String>,
) -> Fetcher<T> {
    let fetcher = Fetcher::new(transport);
    fetcher.load(FetchRequest::new(url));
    fetcher
}
