//! Real backends for the seams `rewire-hooks` defines.
//!
//! - [`storage::FileStore`] — durable key/value store, one JSON file.
//! - [`http::HttpTransport`] — blocking GET on a worker thread per request.
//! - [`clipboard::SystemClipboard`] — arboard-backed clipboard writes.
//!
//! Hook state stays on the caller's thread; the only thing that crosses
//! threads is a fetch completion traveling back over its channel.

pub mod clipboard;
pub mod http;
pub mod storage;

pub use clipboard::*;
pub use http::*;
pub use storage::*;
