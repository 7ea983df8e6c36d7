// Transport Port - one authenticated HTTP round trip against z/OSMF

use crate::error::{Result, ZosmfError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Sent as `text/plain`
    Text(String),
}

/// A request relative to the session base URL.
///
/// `segments` are raw path segments; the transport percent-encodes each one,
/// so `USER.PDS(MEM1)` is passed as a single segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new<I, S>(method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Get, segments)
    }

    pub fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Put, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Post, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Delete, segments)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn queries(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Per-request header; overrides a session header of the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = RequestBody::Text(body.into());
        self
    }

    /// `/a/b/c`, for logs and error messages
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status plus the fully read body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Fail with [`ZosmfError::Api`] unless the status is one of `accepted`
    pub fn expect_status(self, accepted: &[u16]) -> Result<Self> {
        if accepted.contains(&self.status) {
            Ok(self)
        } else {
            Err(ZosmfError::Api {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| ZosmfError::Decode(e.to_string()))
    }
}

/// Executes requests against one z/OSMF instance.
///
/// Implementations own the base URL, the default headers and the
/// credentials; callers only describe the resource.
#[async_trait]
pub trait ZosmfTransport: Send + Sync {
    /// `protocol://host[:port]/basePath`
    fn base_url(&self) -> &str;

    /// User the session authenticates as, used for default dataset patterns
    fn user(&self) -> &str;

    /// Headers added to every request
    fn headers(&self) -> &BTreeMap<String, String>;

    /// Send one request and read the whole body. Non-2xx statuses are
    /// returned as responses, not errors; only transport failures error.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted transport: answers from a queue, records every request
    pub struct MockTransport {
        base_url: String,
        user: String,
        headers: BTreeMap<String, String>,
        responses: Mutex<VecDeque<Result<ApiResponse>>>,
        fallback: Option<ApiResponse>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl MockTransport {
        pub fn new(user: &str) -> Self {
            Self {
                base_url: "https://mock.zosmf/zosmf".to_string(),
                user: user.to_string(),
                headers: BTreeMap::new(),
                responses: Mutex::new(VecDeque::new()),
                fallback: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Response returned once the queue is drained
        pub fn with_fallback(mut self, status: u16, body: &str) -> Self {
            self.fallback = Some(ApiResponse::new(status, body));
            self
        }

        pub fn push_response(&self, status: u16, body: &str) -> &Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(ApiResponse::new(status, body)));
            self
        }

        pub fn push_error(&self, error: ZosmfError) -> &Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ZosmfTransport for MockTransport {
        fn base_url(&self) -> &str {
            &self.base_url
        }

        fn user(&self) -> &str {
            &self.user
        }

        fn headers(&self) -> &BTreeMap<String, String> {
            &self.headers
        }

        async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request.clone());
            match self.responses.lock().unwrap().pop_front() {
                Some(scripted) => scripted,
                None => self.fallback.clone().ok_or_else(|| {
                    ZosmfError::Transport(format!(
                        "no scripted response for {} {}",
                        request.method,
                        request.path()
                    ))
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get(["restjobs", "jobs"])
            .query("owner", "IBMUSER")
            .header("X-IBM-Max-Items", "10");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path(), "/restjobs/jobs");
        assert_eq!(request.query, vec![("owner".into(), "IBMUSER".into())]);
        assert_eq!(request.header_value("x-ibm-max-items"), Some("10"));
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[test]
    fn test_expect_status() {
        assert!(ApiResponse::new(201, "").expect_status(&[200, 201]).is_ok());

        let err = ApiResponse::new(500, "boom")
            .expect_status(&[200])
            .unwrap_err();
        assert_eq!(err.to_string(), "API request failed with status 500: boom");
    }

    #[test]
    fn test_json_decode_error() {
        let err = ApiResponse::new(200, "not json")
            .json::<serde_json::Value>()
            .unwrap_err();
        assert!(matches!(err, ZosmfError::Decode(_)));
    }
}
