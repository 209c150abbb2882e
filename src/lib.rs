//! Access gate for request handlers.
//!
//! [`gate`] is the transport-agnostic core: wrap a handler with an access
//! requirement and let caller-supplied predicates decide whether the handler
//! or a failure handler runs. The remaining modules put it in front of an
//! axum API.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod services;
pub mod state;
