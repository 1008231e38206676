//! Client-side access to the external rules engine.
//!
//! # Architecture
//!
//! ```text
//! GameApi (async trait)
//!   ├── HttpGameApi      JSON over HTTP, one request at a time
//!   └── ScriptedGameApi  queued replies for tests (feature `test-util`)
//! ```
//!
//! The frontend talks to the engine only through [`ApiRequest`] values run by
//! [`dispatch`], so exactly one request is ever outstanding.

pub mod error;
pub mod http;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use error::ApiError;
pub use http::HttpGameApi;
pub use traits::{ApiReply, ApiRequest, GameApi, Outcome, dispatch};

#[cfg(any(test, feature = "test-util"))]
pub use mock::ScriptedGameApi;
