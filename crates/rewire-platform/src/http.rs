use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use rewire_hooks::{Completion, FetchError, FetchRequest, FetchResponse, Transport};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One blocking GET per dispatch, on its own worker thread.
///
/// The completion is tagged with the dispatching generation and sent back
/// over the fetcher's channel; a completion whose fetcher is already gone
/// is simply dropped.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn dispatch(&self, request: FetchRequest, generation: u64, done: Sender<Completion>) {
        let client = self.client.clone();
        thread::spawn(move || {
            let outcome = perform(&client, &request);
            if done.send((generation, outcome)).is_err() {
                log::debug!("fetch completion for {} dropped; receiver gone", request.url);
            }
        });
    }
}

fn perform(
    client: &reqwest::blocking::Client,
    request: &FetchRequest,
) -> Result<FetchResponse, FetchError> {
    let mut builder = client.get(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    let response = builder
        .send()
        .map_err(|err| FetchError::Network(err.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .map_err(|err| FetchError::Network(err.to_string()))?;
    Ok(FetchResponse { status, body })
}
