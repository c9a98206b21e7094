//! REST API client module for the Opportunet backend.
//!
//! This module provides the `ApiClient` for authentication, profile, and
//! opportunity endpoints, and the `ApiError` taxonomy its calls fail with.
//!
//! The API uses JWT bearer access tokens; an expired access token is
//! recovered transparently with a single refresh-and-retry per call.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
