//! Client-side core for the Opportunet student opportunities platform.
//!
//! Opportunet is a discovery and networking platform for students:
//! internships, grants, hackathons, jobs, mentors, and events. This crate
//! is the platform's client core - everything below the screens:
//!
//! - [`auth::SessionStore`]: the access/refresh token pair, persisted
//!   across restarts
//! - [`api::ApiClient`]: REST calls with bearer-token injection and a
//!   single transparent refresh-and-retry on an expired access token
//! - [`models`]: typed projections of the server's payloads
//! - [`data::DataSource`]: read-path abstraction that degrades gracefully
//!   to bundled sample data when the backend is unreachable
//! - [`config::Config`]: host configuration and persisted preferences
//!
//! ```no_run
//! use opportunet_client::{ApiClient, Config, SessionStore};
//! use opportunet_client::models::LoginRequest;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let session = SessionStore::new(config.data_dir()?);
//! let client = ApiClient::new(config.api_base(), session)?;
//!
//! client
//!     .login(&LoginRequest {
//!         email: "a@b.com".into(),
//!         password: "secret".into(),
//!     })
//!     .await?;
//! let listings = client.get_opportunities(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::SessionStore;
pub use config::Config;
pub use data::DataSource;
