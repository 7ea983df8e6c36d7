//! Authenticated z/OSMF session over reqwest

use crate::error::{transport_error, DomainError, Result, ZosmfError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Identity, Url};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use zosmf_core::application::constants::REQUEST_TIMEOUT;
use zosmf_core::domain::Profile;
use zosmf_core::port::{ApiRequest, ApiResponse, HttpMethod, RequestBody, ZosmfTransport};

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain";

/// Connection state for one z/OSMF instance: resolved base URL, default
/// headers and a pooled HTTP client.
///
/// Building a session makes no network call.
///
/// # Example
///
/// ```
/// use zosmf_core::domain::Profile;
/// use zosmf_sdk::Session;
///
/// let profile = Profile::new("dev", "zos.example.com", 10443, "IBMUSER", "secret");
/// let session = Session::new(&profile).unwrap();
/// assert_eq!(session.base_url(), "https://zos.example.com:10443/zosmf");
/// ```
#[derive(Clone)]
pub struct Session {
    profile: Profile,
    base_url: String,
    url: Url,
    headers: BTreeMap<String, String>,
    client: Client,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("profile", &self.profile)
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(profile: &Profile) -> Result<Self> {
        let base_url = profile.base_url();
        let url = Url::parse(&base_url)
            .map_err(|e| ZosmfError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let timeout = profile
            .response_timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(REQUEST_TIMEOUT);

        let mut builder = Client::builder().timeout(timeout);
        if !profile.reject_unauthorized {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(identity) = client_identity(profile)? {
            builder = builder.identity(identity);
        }
        let client = builder
            .build()
            .map_err(|e| ZosmfError::Transport(format!("failed to build HTTP client: {}", e)))?;

        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.as_str().to_string(), APPLICATION_JSON.to_string());
        headers.insert("accept".to_string(), APPLICATION_JSON.to_string());
        if profile.has_credentials() {
            let credentials = STANDARD.encode(format!("{}:{}", profile.user, profile.password));
            headers.insert("authorization".to_string(), format!("Basic {}", credentials));
        }

        debug!(base_url = %base_url, user = %profile.user, "Session created");

        Ok(Self {
            profile: profile.clone(),
            base_url,
            url,
            headers,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn user(&self) -> &str {
        &self.profile.user
    }

    /// Set a default header. Header names are case-insensitive and stored
    /// lowercase.
    pub fn add_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn remove_header(&mut self, name: impl AsRef<str>) {
        self.headers.remove(&name.as_ref().to_ascii_lowercase());
    }

    fn build_url(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| ZosmfError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    fn build_headers(&self, request: &ApiRequest) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        let per_request = request.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        let body_type = match request.body {
            RequestBody::Text(_) => Some((CONTENT_TYPE.as_str(), TEXT_PLAIN)),
            _ => None,
        };

        // Later entries win: session defaults, then body type, then per-request
        for (name, value) in self
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(body_type)
            .chain(per_request)
        {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ZosmfError::Internal(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ZosmfError::Internal(format!("invalid header value for {}: {}", name, e)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// Client certificate from the profile's PEM files.
///
/// The key may live in its own file or inside the certificate file.
fn client_identity(profile: &Profile) -> Result<Option<Identity>> {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
    let read = |field: &str, path: &str| {
        std::fs::read(path).map_err(|e| {
            ZosmfError::from(DomainError::InvalidProfile(format!(
                "failed to read {} {}: {}",
                field, path, e
            )))
        })
    };

    let (cert_file, key_file) =
        match (non_empty(&profile.cert_file), non_empty(&profile.cert_key_file)) {
            (None, None) => return Ok(None),
            (None, Some(_)) => {
                return Err(DomainError::InvalidProfile(
                    "certKeyFile is set without certFile".to_string(),
                )
                .into())
            }
            (Some(cert_file), key_file) => (cert_file, key_file),
        };

    let mut pem = read("certFile", &cert_file)?;
    if let Some(key_file) = key_file {
        pem.push(b'\n');
        pem.extend(read("certKeyFile", &key_file)?);
    }
    let identity = Identity::from_pem(&pem).map_err(|e| {
        DomainError::InvalidProfile(format!("invalid client certificate {}: {}", cert_file, e))
    })?;

    debug!(cert_file = %cert_file, "Client certificate loaded");
    Ok(Some(identity))
}

#[async_trait]
impl ZosmfTransport for Session {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user(&self) -> &str {
        &self.profile.user
    }

    fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.build_url(&request)?;
        let headers = self.build_headers(&request)?;
        let method = request.method;
        let path = request.path();

        debug!(method = %method, url = %url, "Sending request");

        let builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Delete => self.client.delete(url),
        }
        .headers(headers);

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(&value)?),
            RequestBody::Text(text) => builder.body(text),
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        debug!(
            method = %method,
            path = %path,
            status = %status,
            bytes = %body.len(),
            "Received response"
        );

        Ok(ApiResponse { status, body })
    }
}
