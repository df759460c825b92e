//! A single request/response cycle against the catalog API.

use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, StatusCode};
use hyper::ext::ReasonPhrase;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::{CatalogClientError, DecodeError, StatusError};
use crate::query::QueryPairs;

/// Where the catalog API is mounted on the backend.
pub const CATALOG_API_PATH: &str = "/api/catalog";

/// A response that passed the status check, body already read.
#[derive(Debug)]
pub(crate) struct SuccessResponse {
    /// Final URL of the request, after redirects.
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Path, query and body of a request. The method decides the expected
/// success status.
#[derive(Debug)]
pub(crate) struct Call<'a, B = ()> {
    pub method: Method,
    pub path: String,
    pub query: QueryPairs,
    pub body: Option<&'a B>,
}

impl Call<'_> {
    pub fn get(path: String, query: QueryPairs) -> Self {
        Self {
            method: Method::GET,
            path,
            query,
            body: None,
        }
    }

    pub fn delete(path: String) -> Self {
        Self {
            method: Method::DELETE,
            path,
            query: QueryPairs::new(),
            body: None,
        }
    }
}

impl<'a, B> Call<'a, B> {
    pub fn post(path: String, body: &'a B) -> Self {
        Self {
            method: Method::POST,
            path,
            query: QueryPairs::new(),
            body: Some(body),
        }
    }
}

/// The only status accepted as success for a request of `method`.
fn expected_status(method: &Method) -> StatusCode {
    if *method == Method::DELETE {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    }
}

/// HTTP transport shared by all catalog operations.
///
/// Holds only immutable configuration, clones share the connection pool.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    api_url: String,
}

impl Transport {
    pub fn new(config: &CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let http = build_http_client(config)?;
        let api_url = format!("{}{CATALOG_API_PATH}", config.base_url.trim_end_matches('/'));
        // Fail on construction rather than on the first request.
        Url::parse(&api_url).map_err(|source| CatalogClientError::InvalidUrl {
            url: api_url.clone(),
            source,
        })?;
        Ok(Self { http, api_url })
    }

    fn url(&self, path: &str, query: &QueryPairs) -> Result<Url, CatalogClientError> {
        let url = format!("{}{path}", self.api_url);
        let mut url = Url::parse(&url).map_err(|source| CatalogClientError::InvalidUrl { url, source })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        Ok(url)
    }

    /// Send `call` and hand a successful response to `decode`.
    ///
    /// Any status other than the one expected for the method is a
    /// [StatusError], the body of such a response is never read.
    /// Every error is tagged with method and path.
    #[instrument(skip_all, fields(method = %call.method, path = %call.path))]
    pub async fn execute<B, T>(
        &self,
        call: Call<'_, B>,
        decode: impl FnOnce(SuccessResponse) -> Result<T, DecodeError>,
    ) -> Result<T, CatalogClientError>
    where
        B: Serialize,
    {
        let Call {
            method,
            path,
            query,
            body,
        } = call;

        let url = self.url(&path, &query)?;
        debug!(%url, "sending catalog request");

        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let transport_error = |source| CatalogClientError::Transport {
            method: method.clone(),
            path: path.clone(),
            source,
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(%status, "received catalog response");

        if status != expected_status(&method) {
            let reason = response
                .extensions()
                .get::<ReasonPhrase>()
                .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok());
            return Err(CatalogClientError::Status {
                method,
                path,
                status: StatusError::new(status, reason),
            });
        }

        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport_error)?;

        decode(SuccessResponse { url, headers, body })
            .map_err(|source| CatalogClientError::Decode { method, path, source })
    }
}

/// Build HTTP client with bearer token auth for the catalog API.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    if let Some(token) = &config.token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            CatalogClientError::InvalidHeader {
                name: header::AUTHORIZATION.to_string(),
            }
        })?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    for (key, value) in &config.extra_headers {
        let invalid = || CatalogClientError::InvalidHeader { name: key.clone() };
        headers.insert(
            HeaderName::from_str(key).map_err(|_| invalid())?,
            HeaderValue::from_str(value).map_err(|_| invalid())?,
        );
    }

    debug!(
        base_url = %config.base_url,
        has_token = config.token.is_some(),
        extra_headers = config.extra_headers.len(),
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.timeout_secs));

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder.build().map_err(CatalogClientError::Build)
}
