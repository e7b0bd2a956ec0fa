//! REST client for the blog API

use crate::composer::Draft;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::{ItemResponse, ListResponse, Post, PostsQuery, Profile};
use futures_util::future::BoxFuture;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Where posts come from. The pager only ever talks to this trait.
pub trait PostSource: Send + Sync {
    /// One page of a filtered listing.
    fn list_posts<'a>(&'a self, query: &'a PostsQuery) -> BoxFuture<'a, Result<ListResponse>>;

    /// A single post by id.
    fn get_post<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Post>>;
}

/// Credentials for the current user, passed explicitly to the client.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An admin session. Blank tokens yield an anonymous session.
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            token: (!token.is_empty()).then(|| token.to_string()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.token.is_some()
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// HTTP client for the posts and profile endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Build a client against `base_url` (e.g. `https://example.com/api`).
    pub fn new(base_url: &str, session: Session, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !crate::types::is_http_url(base_url) {
            return Err(Error::Config(format!(
                "API base URL must be http(s): {}",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            session,
        })
    }

    /// Build a client from the `[api]` config section, resolving the token.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let session = match &config.token {
            Some(token) => {
                let token = token.resolve()?;
                if token.trim().is_empty() {
                    tracing::warn!("API token resolves to empty string. Admin features disabled.");
                }
                Session::with_token(token)
            }
            None => Session::anonymous(),
        };

        Self::new(
            &config.base_url,
            session,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /posts`
    pub async fn fetch_posts(&self, query: &PostsQuery) -> Result<ListResponse> {
        let response = self
            .request(Method::GET, "/posts")
            .query(query)
            .send()
            .await?;
        decode_listing(response).await
    }

    /// `GET /posts/{id}`
    pub async fn fetch_post(&self, id: &str) -> Result<Post> {
        let path = format!("/posts/{}", id);
        let response = self.request(Method::GET, &path).send().await?;
        decode_item(response, &path).await
    }

    /// `POST /posts` (admin). The server assigns the id.
    pub async fn create_post(&self, draft: &Draft) -> Result<Post> {
        self.require_admin()?;
        let payload = draft.to_payload()?;
        let response = self
            .request(Method::POST, "/posts")
            .json(&payload)
            .send()
            .await?;
        let post: Post = decode_item(response, "/posts").await?;
        tracing::info!("Created {} post {}", draft.kind, post.id().unwrap_or("?"));
        Ok(post)
    }

    /// `PUT /posts/{id}` (admin)
    pub async fn update_post(&self, id: &str, draft: &Draft) -> Result<Post> {
        self.require_admin()?;
        let payload = draft.to_payload()?;
        let path = format!("/posts/{}", id);
        let response = self
            .request(Method::PUT, &path)
            .json(&payload)
            .send()
            .await?;
        let post = decode_item(response, &path).await?;
        tracing::info!("Updated post {}", id);
        Ok(post)
    }

    /// `DELETE /posts/{id}` (admin)
    pub async fn delete_post(&self, id: &str) -> Result<()> {
        self.require_admin()?;
        let path = format!("/posts/{}", id);
        let response = self.request(Method::DELETE, &path).send().await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Deleted post {}", id);
            return Ok(());
        }
        if is_auth_failure(status) {
            return Err(Error::Unauthorized);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body, &path))
    }

    /// `GET /profile`
    pub async fn get_profile(&self) -> Result<Profile> {
        let response = self.request(Method::GET, "/profile").send().await?;
        decode_item(response, "/profile").await
    }

    /// `PUT /profile` (admin)
    pub async fn update_profile(&self, profile: &Profile) -> Result<Profile> {
        self.require_admin()?;
        let errors = profile.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        let response = self
            .request(Method::PUT, "/profile")
            .json(profile)
            .send()
            .await?;
        decode_item(response, "/profile").await
    }

    fn require_admin(&self) -> Result<()> {
        if self.session.is_admin() {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl PostSource for ApiClient {
    fn list_posts<'a>(&'a self, query: &'a PostsQuery) -> BoxFuture<'a, Result<ListResponse>> {
        Box::pin(self.fetch_posts(query))
    }

    fn get_post<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Post>> {
        Box::pin(self.fetch_post(id))
    }
}

/// Decode a listing. Unsuccessful envelopes are returned as-is so the pager
/// can surface the server's own message.
async fn decode_listing(response: Response) -> Result<ListResponse> {
    let status = response.status();
    if is_auth_failure(status) {
        return Err(Error::Unauthorized);
    }

    let body = response.text().await?;
    match serde_json::from_str::<ListResponse>(&body) {
        Ok(envelope) if status.is_success() || !envelope.success => Ok(envelope),
        Ok(_) => Err(status_error(status, &body, "/posts")),
        Err(e) if status.is_success() => Err(Error::Decode(e.to_string())),
        Err(_) => Err(status_error(status, &body, "/posts")),
    }
}

async fn decode_item<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    let status = response.status();
    if is_auth_failure(status) {
        return Err(Error::Unauthorized);
    }

    let body = response.text().await?;
    if !status.is_success() {
        return Err(status_error(status, &body, path));
    }

    let envelope: ItemResponse<T> =
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))?;

    if !envelope.success {
        return Err(Error::Api {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "Request was not successful".to_string()),
        });
    }

    envelope
        .data
        .ok_or_else(|| Error::Decode(format!("Response from {} has no data", path)))
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn status_error(status: StatusCode, body: &str, path: &str) -> Error {
    if status == StatusCode::NOT_FOUND {
        return Error::NotFound(path.to_string());
    }

    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        });

    Error::Api {
        status: status.as_u16(),
        message,
    }
}
