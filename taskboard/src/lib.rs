//! Client-side core of a task-tracking application.
//!
//! This crate owns the domain state and synchronization logic of the client:
//! in-memory stores for tasks and users kept consistent with a remote HTTP
//! API, the session lifecycle around a single bearer token, and a pure view
//! engine that derives the pending/completed board from raw state plus
//! user-entered predicates. The presentation layer consumes the stores' read
//! APIs and calls their operations; it contributes no data-model logic and is
//! represented here only by the [`session::Navigator`] boundary trait.

pub mod config;
pub mod connectors;
pub mod session;
pub mod tasks;
pub mod users;
pub mod views;
