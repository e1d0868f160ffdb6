//! Request dispatch onto the background transcode worker.
//!
//! The CPU-bound pixel loop must never stall the caller's event loop, so
//! transcoding runs on a dedicated worker thread. This module provides the
//! [`TranscodeService`] that owns that thread, the correlation table that
//! links each dispatched request to its eventual response, and the
//! cancellation plumbing between the two.
//!
//! # Architecture
//!
//! ```text
//! caller task                         worker thread
//! ───────────                         ─────────────
//! dispatch(png, encoding, token)
//!   ├─ register key in table ──────┐
//!   ├─ send {key, payload} ════════╪══► blocking_recv
//!   └─ await settlement / cancel   │      │ transcode
//!                ▲                 │      ▼
//!                └─────────────────┴── settle(key, result)
//! ```
//!
//! A request settles exactly once. Cancellation removes the table entry and
//! settles locally; a response arriving later for the removed key is dropped
//! without effect. If the worker thread dies, every outstanding entry is
//! rejected and the next dispatch starts a replacement worker.

mod error;
mod pending;
mod service;
mod worker;

pub use error::DispatchError;
pub use pending::RequestId;
pub use service::TranscodeService;
