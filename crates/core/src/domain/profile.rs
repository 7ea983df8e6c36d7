// Connection Profile

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Base path of the z/OSMF REST services when the profile names none
pub const DEFAULT_BASE_PATH: &str = "/zosmf";

/// Protocol used when the profile names none
pub const DEFAULT_PROTOCOL: &str = "https";

/// Connection descriptor for one z/OSMF instance.
///
/// A profile is immutable once handed to a session; build a new one to
/// point somewhere else.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_reject_unauthorized")]
    pub reject_unauthorized: bool,
    #[serde(default)]
    pub base_path: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_key_file: Option<String>,
}

fn default_reject_unauthorized() -> bool {
    true
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("reject_unauthorized", &self.reject_unauthorized)
            .field("base_path", &self.base_path)
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

impl Profile {
    /// Create a profile with TLS verification on and the default base path
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            reject_unauthorized: true,
            base_path: String::new(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            encoding: None,
            response_timeout: None,
            cert_file: None,
            cert_key_file: None,
        }
    }

    /// Create a profile with explicit TLS policy and base path
    pub fn with_options(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        reject_unauthorized: bool,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            reject_unauthorized,
            base_path: base_path.into(),
            ..Self::new(name, host, port, user, password)
        }
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Check that the fields needed for an authenticated session are present
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(DomainError::InvalidProfile("host is required".to_string()));
        }
        if self.user.is_empty() {
            return Err(DomainError::InvalidProfile("user is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(DomainError::InvalidProfile(
                "password is required".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(DomainError::InvalidProfile(
                "port must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved protocol: the profile's own (https when empty), forced to
    /// http on ports 80 and 8080.
    pub fn effective_protocol(&self) -> &str {
        match self.port {
            80 | 8080 => "http",
            _ if self.protocol.is_empty() => DEFAULT_PROTOCOL,
            _ => &self.protocol,
        }
    }

    /// `protocol://host[:port]/basePath`
    ///
    /// The port is omitted when it is 0, 80 or 443. The base path defaults
    /// to `/zosmf` and always starts with `/`.
    pub fn base_url(&self) -> String {
        let mut url = format!("{}://{}", self.effective_protocol(), self.host);

        if !matches!(self.port, 0 | 80 | 443) {
            url.push_str(&format!(":{}", self.port));
        }

        let base_path = if self.base_path.is_empty() {
            DEFAULT_BASE_PATH
        } else {
            self.base_path.as_str()
        };
        if !base_path.starts_with('/') {
            url.push('/');
        }
        url.push_str(base_path);

        url
    }

    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty()
    }
}
