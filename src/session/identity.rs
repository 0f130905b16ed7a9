//! Client for the external identity service.
//!
//! The service issues and validates sessions; this side only submits
//! credentials, keeps the cookie it hands back, and asks who is signed in.

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use url::Url;

use super::context::{SessionContext, SessionUser};
use super::store::SessionCookie;
use crate::api::client::normalize_base;
use crate::config::ApiConfig;
use crate::error::{FetchError, FetchResult};

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: SessionUser,
}

/// Server-side session record returned by `get-session`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub session: SessionInfo,
    pub user: SessionUser,
}

#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    auth_url: Url,
    session: SessionContext,
}

impl IdentityClient {
    pub fn new(config: &ApiConfig, session: SessionContext) -> FetchResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Self::with_http(http, config, session)
    }

    pub fn with_http(http: reqwest::Client, config: &ApiConfig, session: SessionContext) -> FetchResult<Self> {
        let base = normalize_base(&config.base_url)?;
        let auth_path = config.auth_base_path.trim_matches('/');
        let auth_url = if auth_path.is_empty() {
            base
        } else {
            base.join(&format!("{}/", auth_path))?
        };

        Ok(Self {
            http,
            auth_url,
            session,
        })
    }

    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> FetchResult<SessionUser> {
        let url = self.auth_url.join("sign-in/email")?;
        tracing::debug!(%url, "signing in");

        let response = self
            .http
            .post(url)
            .json(&SignInRequest { email, password })
            .send()
            .await?;

        let cookie = self.session_cookie(&response);
        let envelope: UserEnvelope = read_json(response, "sign-in").await?;

        let cookie = cookie.ok_or_else(|| FetchError::rejected("identity service did not set a session cookie"))?;
        self.session
            .establish(cookie, Some(envelope.user.clone()))
            .map_err(|e| FetchError::rejected(e.to_string()))?;

        tracing::info!(user = %envelope.user.email, "signed in");
        Ok(envelope.user)
    }

    /// Register an account. When the service signs the new user straight in,
    /// the returned cookie is kept as well.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> FetchResult<SessionUser> {
        let url = self.auth_url.join("sign-up/email")?;
        tracing::debug!(%url, "signing up");

        let response = self
            .http
            .post(url)
            .json(&SignUpRequest { name, email, password })
            .send()
            .await?;

        let cookie = self.session_cookie(&response);
        let envelope: UserEnvelope = read_json(response, "sign-up").await?;

        if let Some(cookie) = cookie {
            self.session
                .establish(cookie, Some(envelope.user.clone()))
                .map_err(|e| FetchError::rejected(e.to_string()))?;
        }

        Ok(envelope.user)
    }

    /// Tell the service to end the session. The local session is dropped
    /// whether or not the remote call succeeds.
    pub async fn sign_out(&self) -> FetchResult<()> {
        let url = self.auth_url.join("sign-out")?;
        let mut request = self.http.post(url).json(&serde_json::json!({}));
        if let Some(cookie) = self.session.cookie_header() {
            request = request.header(COOKIE, cookie);
        }

        let remote: FetchResult<()> = async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FetchError::from_body(status.as_u16(), &body));
            }
            Ok(())
        }
        .await;

        if let Err(e) = self.session.invalidate() {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
        remote
    }

    /// Ask the service who the cookie belongs to. A `null` answer means the
    /// cookie is stale, so the local session is invalidated.
    pub async fn get_session(&self) -> FetchResult<Option<ActiveSession>> {
        let Some(cookie) = self.session.cookie_header() else {
            return Ok(None);
        };

        let url = self.auth_url.join("get-session")?;
        let response = self.http.get(url).header(COOKIE, cookie).send().await?;
        let active: Option<ActiveSession> = read_json(response, "get-session").await?;

        match &active {
            Some(active) => {
                if let Err(e) = self.session.set_user(active.user.clone()) {
                    tracing::warn!(error = %e, "failed to persist session user");
                }
            }
            None => {
                tracing::info!("session no longer valid, clearing");
                if let Err(e) = self.session.invalidate() {
                    tracing::warn!(error = %e, "failed to clear stored session");
                }
            }
        }

        Ok(active)
    }

    fn session_cookie(&self, response: &Response) -> Option<SessionCookie> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(parse_set_cookie)
            .find(|cookie| self.session.is_session_cookie(&cookie.name) && !cookie.value.is_empty())
    }
}

/// Name and value from a `Set-Cookie` header; attributes are dropped
pub fn parse_set_cookie(header: &str) -> Option<SessionCookie> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(SessionCookie::new(name, value.trim().trim_matches('"')))
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response, endpoint: &str) -> FetchResult<T> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(FetchError::from_body(status.as_u16(), &text));
    }
    serde_json::from_str(&text).map_err(|source| FetchError::Schema {
        route: format!("identity/{}", endpoint),
        source,
    })
}
