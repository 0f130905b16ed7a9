use reqwest::header::COOKIE;
use url::Url;

use super::contract::{ContractOutput, Route};
use crate::config::ApiConfig;
use crate::error::{FetchError, FetchResult};
use crate::session::SessionContext;

/// Whether the session cookie rides along with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Include,
    Omit,
}

/// Parameters of one contract call. Only the route's own query and body
/// types are accepted.
pub struct RequestOptions<R: Route> {
    pub query: Option<R::Query>,
    pub body: Option<R::Body>,
    pub credentials: Credentials,
}

impl<R: Route> Default for RequestOptions<R> {
    fn default() -> Self {
        Self {
            query: None,
            body: None,
            credentials: Credentials::Include,
        }
    }
}

impl<R: Route> RequestOptions<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: R::Query) -> Self {
        Self::new().query(query)
    }

    pub fn with_body(body: R::Body) -> Self {
        Self::new().body(body)
    }

    pub fn query(mut self, query: R::Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn body(mut self, body: R::Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Single HTTP client bound to the route contract.
///
/// Each call sends exactly one request. There is no retry, cancellation or
/// timeout override; every failure comes back as a [`FetchError`].
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl FetchClient {
    pub fn new(config: &ApiConfig, session: SessionContext) -> FetchResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Self::with_http(http, config, session)
    }

    pub fn with_http(http: reqwest::Client, config: &ApiConfig, session: SessionContext) -> FetchResult<Self> {
        Ok(Self {
            http,
            base_url: normalize_base(&config.base_url)?,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Resolve a route to its absolute URL
    pub fn url_for<R: Route>(&self) -> FetchResult<Url> {
        Ok(self.base_url.join(R::PATH)?)
    }

    pub async fn request<R: Route>(&self, options: RequestOptions<R>) -> FetchResult<R::Output> {
        let key = R::key();
        tracing::debug!(route = %key, method = %R::METHOD, "sending request");

        let result = self.send::<R>(&key, options).await;
        if let Err(err) = &result {
            tracing::warn!(route = %key, kind = ?err.kind(), error = %err, "request failed");
        }
        result
    }

    async fn send<R: Route>(&self, key: &str, options: RequestOptions<R>) -> FetchResult<R::Output> {
        let url = self.url_for::<R>()?;
        let mut builder = self.http.request(R::METHOD.into(), url);

        if let Some(query) = &options.query {
            builder = builder.query(query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }
        if options.credentials == Credentials::Include {
            if let Some(cookie) = self.session.cookie_header() {
                builder = builder.header(COOKIE, cookie);
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::from_body(status.as_u16(), &text));
        }

        let output: R::Output = serde_json::from_str(&text).map_err(|source| FetchError::Schema {
            route: key.to_string(),
            source,
        })?;

        if let Some(message) = output.backend_error() {
            return Err(FetchError::rejected(message));
        }

        Ok(output)
    }
}

/// Make sure the base ends in `/` so relative route paths join under it
pub(crate) fn normalize_base(base_url: &str) -> FetchResult<Url> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::contract::{CustomLevelByIdRoute, RecipientListRoute};
    use crate::config::SessionConfig;

    fn client(base: &str) -> FetchClient {
        FetchClient::new(&ApiConfig::new(base), SessionContext::in_memory(&SessionConfig::default())).unwrap()
    }

    #[test]
    fn test_route_urls_join_under_base() {
        let client = client("https://api.mystrokeapi.uk/");
        assert_eq!(
            client.url_for::<RecipientListRoute>().unwrap().as_str(),
            "https://api.mystrokeapi.uk/dashboard/recipient/list"
        );
    }

    #[test]
    fn test_base_without_trailing_slash_keeps_prefix() {
        let client = client("http://localhost:3000/api");
        assert_eq!(
            client.url_for::<CustomLevelByIdRoute>().unwrap().as_str(),
            "http://localhost:3000/api/dashboard/custom-level/by-id"
        );
    }

    #[test]
    fn test_invalid_base_is_transport_error() {
        let err = FetchClient::new(
            &ApiConfig::new("not a url"),
            SessionContext::in_memory(&SessionConfig::default()),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
    }

    #[test]
    fn test_request_options_default_to_include_credentials() {
        let options = RequestOptions::<RecipientListRoute>::new();
        assert_eq!(options.credentials, Credentials::Include);
        assert!(options.query.is_none());
    }
}
