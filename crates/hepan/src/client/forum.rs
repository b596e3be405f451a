//! Forum HTTP client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::Result;
use crate::auth::Authorization;
use crate::config::ClientConfig;
use crate::endpoints::{
    ADOPT_LEGACY_AUTH, AdoptLegacyAuthResponse, ApiEnvelope, STAR_MARKER_HEADER,
};
use crate::error::{AuthError, ContentError, InvalidInputError, ParseError, TransportError};
use crate::extract::Extract;
use crate::types::ForumUrl;

/// HTTP client bound to one forum and one cookie jar.
///
/// The jar holds the legacy login cookies; dropping the client forgets them.
#[derive(Clone)]
pub(crate) struct ForumClient {
    http: reqwest::Client,
    forum: ForumUrl,
    login_timeout: Duration,
}

impl ForumClient {
    /// Create a client with a fresh cookie jar.
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .cookie_provider(Arc::new(Jar::default()))
            .build()
            .map_err(|e| InvalidInputError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            forum: config.forum.clone(),
            login_timeout: config.login_timeout(),
        })
    }

    pub(crate) fn forum(&self) -> &ForumUrl {
        &self.forum
    }

    /// GET a legacy page and return its body.
    #[instrument(skip(self), fields(forum = %self.forum))]
    pub(crate) async fn get_html(&self, path: &str) -> Result<String> {
        let url = self.forum.endpoint(path);
        debug!(path, "GET page");

        let response = self.http.get(&url).send().await?;
        read_body(response).await
    }

    /// GET a legacy page with extra query parameters.
    #[instrument(skip(self), fields(forum = %self.forum))]
    pub(crate) async fn get_html_with<Q>(&self, path: &str, query: &Q) -> Result<String>
    where
        Q: Serialize + fmt::Debug + ?Sized,
    {
        let url = self.forum.endpoint(path);
        debug!(path, "GET page");
        trace!(?query, "query parameters");

        let response = self.http.get(&url).query(query).send().await?;
        read_body(response).await
    }

    /// POST a urlencoded form and return the response body.
    ///
    /// The form is not logged; it may carry a password or formhash.
    #[instrument(skip(self, form), fields(forum = %self.forum))]
    pub(crate) async fn post_form<F>(&self, path: &str, form: &F) -> Result<String>
    where
        F: Serialize + ?Sized,
    {
        let url = self.forum.endpoint(path);
        debug!(path, "POST form");

        let response = self.http.post(&url).form(form).send().await?;
        read_body(response).await
    }

    /// POST the login form under the shorter login timeout.
    #[instrument(skip(self, form), fields(forum = %self.forum))]
    pub(crate) async fn post_login<F>(&self, path: &str, form: &F) -> Result<String>
    where
        F: Serialize + ?Sized,
    {
        let url = self.forum.endpoint(path);
        debug!(path, timeout = ?self.login_timeout, "POST login form");

        let response = self
            .http
            .post(&url)
            .form(form)
            .timeout(self.login_timeout)
            .send()
            .await?;
        read_body(response).await
    }

    /// Make an authenticated JSON API query and run the adapter on `data`.
    ///
    /// `code != 0` in the envelope becomes a [`ContentError`] before the
    /// adapter sees anything.
    #[instrument(skip(self, authorization), fields(forum = %self.forum))]
    pub(crate) async fn api_get<Q, T>(
        &self,
        path: &str,
        query: &Q,
        authorization: &Authorization,
    ) -> Result<T>
    where
        Q: Serialize + fmt::Debug + ?Sized,
        T: Extract,
    {
        let url = self.forum.endpoint(path);
        debug!(path, "API query");
        trace!(?query, "query parameters");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, authorization.as_str())
            .send()
            .await?;
        let body = read_body(response).await?;

        let envelope: ApiEnvelope = serde_json::from_str(&body).map_err(ParseError::from)?;
        if envelope.code != 0 {
            debug!(code = envelope.code, message = %envelope.message, "API reported failure");
            return Err(ContentError::api(envelope.code, envelope.message)
                .with_context(path)
                .into());
        }

        let data = envelope.data.ok_or_else(|| ParseError::missing("data"))?;
        Ok(T::extract(data.get())?)
    }

    /// Exchange the cookie session for a JSON API authorization.
    ///
    /// Every failure here is an [`AuthError`]; a transport failure stays a
    /// transport error.
    #[instrument(skip(self), fields(forum = %self.forum))]
    pub(crate) async fn adopt_legacy_auth(&self) -> Result<Authorization> {
        let url = self.forum.endpoint(ADOPT_LEGACY_AUTH);
        debug!("Exchanging cookie session for authorization");

        let response = self
            .http
            .post(&url)
            .header(STAR_MARKER_HEADER, "1")
            .send()
            .await?;

        let status = response.status();
        trace!(%status, "exchange response");
        if !status.is_success() {
            return Err(AuthError::ExchangeStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await?;
        let parsed: AdoptLegacyAuthResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::ExchangeMalformed {
                reason: e.to_string(),
            })?;

        let token = parsed
            .data
            .and_then(|data| data.authorization)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::ExchangeMissingToken)?;

        if HeaderValue::from_str(&token).is_err() {
            return Err(AuthError::ExchangeMalformed {
                reason: "authorization is not a valid header value".to_string(),
            }
            .into());
        }

        Ok(Authorization::new(token))
    }
}

/// Read the body of a successful response; any other status is a transport
/// failure.
async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    trace!(%status, "forum response");

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
        }
        .into());
    }
    Ok(response.text().await?)
}

impl fmt::Debug for ForumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForumClient")
            .field("forum", &self.forum)
            .field("login_timeout", &self.login_timeout)
            .finish_non_exhaustive()
    }
}
