//! Authentication state for the client.
//!
//! `SessionStore` owns the access/refresh token pair, persists it across
//! restarts, and is injected into `ApiClient` at construction so tests can
//! run against isolated stores.

pub mod session;

pub use session::SessionStore;
