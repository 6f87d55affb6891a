//! JSON message surface between the editor UI and the tray engine.
//!
//! The UI posts a [`Request`] carrying the full parameter tree; the engine
//! answers with a [`Response`]. Nothing is cached between requests, so the
//! caller decides which results are still wanted with a
//! [`RegenerationTracker`].

pub mod dispatch;
pub mod error;
pub mod messages;
pub mod tracker;

pub use dispatch::{dispatch, dispatch_json, dispatch_json_with};
pub use error::BridgeError;
pub use messages::{Request, Response};
pub use tracker::{RegenerationTracker, Ticket};
