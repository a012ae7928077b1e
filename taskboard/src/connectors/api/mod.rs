//! Remote API connectivity.
//!
//! This module provides the abstraction every other component uses to talk to
//! the task service:
//! - An error taxonomy separating transport failures from server rejections
//! - The [`ApiConnector`] trait exposing verb-based request operations that
//!   return parsed response bodies
//!
//! The module is implementation-agnostic; a concrete implementation backed by
//! the reqwest HTTP client is provided in the `http` submodule. The connector
//! holds no retry logic: a failed call fails once, to the caller, immediately.

use mockall::automock;
use serde_json::Value;
use thiserror::Error;

pub mod http;

/// Errors that can occur while talking to the remote API.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response from the server
    #[error("Could not reach the server: {0}")]
    Transport(String),
    /// The server responded with a non-success status
    #[error("Server rejected the request with status {status}")]
    Api { status: u16, body: String },
    /// The response body was not valid JSON
    #[error("Could not decode the response body: {0}")]
    Decode(String),
}

/// Trait abstracting the remote task service.
///
/// Paths are relative to the configured base URL. Bodies and responses are
/// JSON values; callers decode them into their own domain types. Every
/// request attaches the current session token as a bearer credential when
/// one is present; with no token the request is sent unauthenticated and the
/// server decides whether to reject it.
#[automock]
pub trait ApiConnector {
    /// Fetches the resource at `path`.
    async fn get(&self, path: &str) -> Result<Value, Error>;
    /// Creates a resource under `path` from the given body.
    async fn post(&self, path: &str, body: Value) -> Result<Value, Error>;
    /// Replaces fields of the resource at `path` with the given body.
    async fn put(&self, path: &str, body: Value) -> Result<Value, Error>;
    /// Deletes the resource at `path`. The response body is discarded.
    async fn delete(&self, path: &str) -> Result<(), Error>;
}
