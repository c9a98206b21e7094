//! API client for communicating with the Opportunet REST backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests: login, registration, profile reads/writes, and
//! opportunity listings.

use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::models::{
    Category, LoginRequest, NewOpportunity, Opportunity, Profile, RefreshRequest, RegisterRequest,
    RegisteredUser, TokenPair,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Whether an endpoint may be called without credentials. Public endpoints
/// never trigger the refresh/retry recovery path; a 401 on one is returned
/// as a plain failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Protected,
    Public,
}

/// API client for the Opportunet backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session store is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new API client against `base_url` (e.g.
    /// `http://localhost:8000/api`), using `session` for token state.
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// The session store this client reads and updates.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request with the JSON content type and, if an access token
    /// exists, a bearer authorization header. Called again on retry so the
    /// header picks up a refreshed token.
    fn build<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }

    /// Core request path. On a 401 for a protected endpoint with a refresh
    /// token on hand, runs the refresh protocol once and retries the
    /// original call exactly once; a second 401 (or any other non-2xx on
    /// the retry) is a hard failure, never a further refresh attempt.
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        access: Access,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.build(method.clone(), &url, body).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && access == Access::Protected
            && self.session.refresh_token().is_some()
        {
            debug!(url = %url, "Access token rejected, attempting refresh");
            if !self.refresh_tokens().await {
                // Refresh failure already cleared both tokens
                return Err(ApiError::AuthExpired);
            }
            let retry = self.build(method, &url, body).send().await?;
            if !retry.status().is_success() {
                return Err(ApiError::from_response(retry).await);
            }
            return Self::parse_json(retry, &url).await;
        }

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Self::parse_json(response, &url).await
    }

    /// Parse a successful response into the expected model. A payload that
    /// does not match the schema is a `Validation` error, distinct from the
    /// HTTP error path.
    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            debug!(url = %url, error = %e, "Response did not match the expected shape");
            ApiError::Validation(e.to_string())
        })
    }

    /// Exchange the refresh token for a new access token. On success the
    /// new access token is stored (the refresh token is not rotated by this
    /// endpoint). On any failure both tokens are cleared - a dead refresh
    /// token means the session is over.
    async fn refresh_tokens(&self) -> bool {
        let Some(refresh) = self.session.refresh_token() else {
            return false;
        };

        let url = self.url("/auth/refresh/");
        let result = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&RefreshRequest { refresh })
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => match response.json::<TokenPair>().await {
                Ok(tokens) => {
                    self.session.set_access_token(tokens.access);
                    debug!("Access token refreshed");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Refresh succeeded but response was unreadable");
                    self.session.clear_tokens();
                    false
                }
            },
            Ok(response) => {
                debug!(status = %response.status(), "Token refresh rejected");
                self.session.clear_tokens();
                false
            }
            Err(e) => {
                warn!(error = %e, "Token refresh request failed");
                self.session.clear_tokens();
                false
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, access: Access) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>, access).await
    }

    async fn post<T, B>(&self, path: &str, body: &B, access: Access) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), access).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), Access::Protected).await
    }

    // ===== Endpoint Methods =====

    /// Log in and persist the returned token pair in the session store.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenPair, ApiError> {
        let tokens: TokenPair = self.post("/auth/login/", credentials, Access::Protected).await?;
        self.session.set_tokens(tokens.access.clone(), tokens.refresh.clone());
        Ok(tokens)
    }

    /// Create an account. The response carries no tokens; call `login`
    /// afterwards to start a session.
    pub async fn register(&self, registration: &RegisterRequest) -> Result<RegisteredUser, ApiError> {
        self.post("/auth/register/", registration, Access::Protected).await
    }

    /// Fetch the current user's profile.
    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.get("/auth/me/profile", Access::Protected).await
    }

    /// Partially update the current user's profile; only fields set on
    /// `changes` are sent.
    pub async fn update_profile(&self, changes: &Profile) -> Result<Profile, ApiError> {
        self.put("/auth/me/profile", changes).await
    }

    /// List approved opportunities, optionally filtered by category.
    /// Public-allowed: callable without a session.
    pub async fn get_opportunities(&self, category: Option<Category>) -> Result<Vec<Opportunity>, ApiError> {
        self.get(&opportunities_path(category), Access::Public).await
    }

    /// Fetch a single opportunity. Public-allowed.
    pub async fn get_opportunity(&self, id: i64) -> Result<Opportunity, ApiError> {
        self.get(&format!("/opportunities/{}/", id), Access::Public).await
    }

    /// Submit a new listing for moderation.
    pub async fn create_opportunity(&self, draft: &NewOpportunity) -> Result<Opportunity, ApiError> {
        self.post("/opportunities/", draft, Access::Protected).await
    }

    /// End the session. Purely client-side: both tokens are dropped and no
    /// server call is made.
    pub fn logout(&self) {
        self.session.clear_tokens();
    }
}

/// Listing path with the category filter appended only when one is given.
fn opportunities_path(category: Option<Category>) -> String {
    match category {
        Some(category) => format!("/opportunities/?category={}", category.as_str()),
        None => "/opportunities/".to_string(),
    }
}
