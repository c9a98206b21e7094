//! Read-path data source for the client's screens.
//!
//! The original screens each wrapped their fetches in ad hoc
//! fallback-to-sample-data handling; `DataSource` centralizes that. Reads
//! go to the backend and degrade gracefully to bundled fixtures when the
//! fetch fails or the listing comes back empty - a display fallback, not
//! error recovery. Writes never fall back and stay on `ApiClient`.

pub mod fixtures;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::SessionStore;
use crate::config::Config;
use crate::models::{Category, Opportunity, Person, Profile};

/// Which data source implementation to run, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Remote,
    Fixture,
}

pub enum DataSource {
    /// Live backend, with fixture fallback on failed or empty reads.
    Remote(ApiClient),
    /// Bundled fixtures only. Demo mode and tests.
    Fixture,
}

impl DataSource {
    pub fn remote(client: ApiClient) -> Self {
        DataSource::Remote(client)
    }

    pub fn fixture() -> Self {
        DataSource::Fixture
    }

    /// Build the configured source: a remote client against the configured
    /// base URL, or fixtures.
    pub fn from_config(config: &Config, session: SessionStore) -> Result<Self, ApiError> {
        match config.data_source() {
            DataSourceKind::Remote => Ok(DataSource::Remote(ApiClient::new(config.api_base(), session)?)),
            DataSourceKind::Fixture => Ok(DataSource::Fixture),
        }
    }

    /// Opportunity listing, optionally filtered by category. Never fails:
    /// a dead backend or an empty listing serves the bundled samples.
    pub async fn opportunities(&self, category: Option<Category>) -> Vec<Opportunity> {
        match self {
            DataSource::Remote(client) => match client.get_opportunities(category).await {
                Ok(listings) if !listings.is_empty() => listings,
                Ok(_) => {
                    debug!("Listing is empty, showing sample opportunities");
                    filter_by_category(fixtures::sample_opportunities(), category)
                }
                Err(e) => {
                    warn!(error = %e, "Failed to fetch opportunities, falling back to samples");
                    filter_by_category(fixtures::sample_opportunities(), category)
                }
            },
            DataSource::Fixture => filter_by_category(fixtures::sample_opportunities(), category),
        }
    }

    /// A single opportunity; falls back to a matching fixture, `None` when
    /// neither the backend nor the fixtures know the id.
    pub async fn opportunity(&self, id: i64) -> Option<Opportunity> {
        match self {
            DataSource::Remote(client) => match client.get_opportunity(id).await {
                Ok(opportunity) => Some(opportunity),
                Err(e) => {
                    warn!(id, error = %e, "Failed to fetch opportunity, checking samples");
                    fixtures::sample_opportunities().into_iter().find(|o| o.id == id)
                }
            },
            DataSource::Fixture => fixtures::sample_opportunities().into_iter().find(|o| o.id == id),
        }
    }

    /// The current user's profile, or the sample profile when the fetch
    /// fails.
    pub async fn profile(&self) -> Profile {
        match self {
            DataSource::Remote(client) => match client.get_profile().await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch profile, falling back to sample");
                    fixtures::sample_profile()
                }
            },
            DataSource::Fixture => fixtures::sample_profile(),
        }
    }

    /// Networking cards for the dashboard rail. The backend has no people
    /// endpoint yet, so both sources serve fixtures.
    pub fn people(&self) -> Vec<Person> {
        fixtures::sample_people()
    }
}

fn filter_by_category(listings: Vec<Opportunity>, category: Option<Category>) -> Vec<Opportunity> {
    match category {
        Some(category) => listings.into_iter().filter(|o| o.category == category).collect(),
        None => listings,
    }
}
