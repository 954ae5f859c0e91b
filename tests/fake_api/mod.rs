//! Fake anti-spam API server for integration testing
//!
//! This module provides an in-process HTTP server that speaks enough
//! of the anti-spam REST API to test `ApiClient`, `App` and the CLI
//! end-to-end:
//!
//! TCP -> one HTTP/1.1 request -> route -> JSON response -> close
//!
//! ## Module layout
//!
//! - `server` -- TCP listener, routing and connection dispatch
//! - `handlers/` -- one file per endpoint group (auth, listing, ...)
//! - `backend` -- test data model (users, emails, builder)
//! - `io` -- request parsing and response writing

pub mod backend;
mod io;

pub use backend::BackendBuilder;
pub use server::FakeApiServer;
