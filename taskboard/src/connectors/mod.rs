//! Connectors to collaborators outside the process boundary: the remote HTTP
//! API and the client-side key-value store holding the session token.

pub mod api;
pub mod storage;
