//! Profile loading from the environment
//!
//! | Variable                    | Default  |
//! |-----------------------------|----------|
//! | `ZOSMF_HOST`                | required |
//! | `ZOSMF_PORT`                | 443      |
//! | `ZOSMF_USER`                |          |
//! | `ZOSMF_PASSWORD`            |          |
//! | `ZOSMF_REJECT_UNAUTHORIZED` | true     |
//! | `ZOSMF_BASE_PATH`           | /zosmf   |
//! | `ZOSMF_PROTOCOL`            | https    |
//! | `ZOSMF_ENCODING`            |          |
//! | `ZOSMF_RESPONSE_TIMEOUT`    | 30 (s)   |
//! | `ZOSMF_CERT_FILE`           |          |
//! | `ZOSMF_CERT_KEY_FILE`       |          |

use crate::error::{DomainError, Result};
use zosmf_core::domain::profile::DEFAULT_PROTOCOL;
use zosmf_core::domain::Profile;

pub const ENV_HOST: &str = "ZOSMF_HOST";
pub const ENV_PORT: &str = "ZOSMF_PORT";
pub const ENV_USER: &str = "ZOSMF_USER";
pub const ENV_PASSWORD: &str = "ZOSMF_PASSWORD";
pub const ENV_REJECT_UNAUTHORIZED: &str = "ZOSMF_REJECT_UNAUTHORIZED";
pub const ENV_BASE_PATH: &str = "ZOSMF_BASE_PATH";
pub const ENV_PROTOCOL: &str = "ZOSMF_PROTOCOL";
pub const ENV_ENCODING: &str = "ZOSMF_ENCODING";
pub const ENV_RESPONSE_TIMEOUT: &str = "ZOSMF_RESPONSE_TIMEOUT";
pub const ENV_CERT_FILE: &str = "ZOSMF_CERT_FILE";
pub const ENV_CERT_KEY_FILE: &str = "ZOSMF_CERT_KEY_FILE";

const DEFAULT_PORT: u16 = 443;

/// Build a profile named `name` from `ZOSMF_*` environment variables
pub fn profile_from_env(name: &str) -> Result<Profile> {
    profile_from_lookup(name, |key| std::env::var(key).ok())
}

/// Build a profile from an arbitrary key lookup
pub fn profile_from_lookup<F>(name: &str, lookup: F) -> Result<Profile>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let host = get(ENV_HOST).ok_or_else(|| {
        DomainError::InvalidProfile(format!("{} is required", ENV_HOST))
    })?;

    let port = match get(ENV_PORT) {
        Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
            DomainError::InvalidProfile(format!("{} must be a port number, got: {}", ENV_PORT, raw))
        })?,
        None => DEFAULT_PORT,
    };

    let reject_unauthorized = match get(ENV_REJECT_UNAUTHORIZED) {
        Some(raw) => parse_bool(&raw).ok_or_else(|| {
            DomainError::InvalidProfile(format!(
                "{} must be true or false, got: {}",
                ENV_REJECT_UNAUTHORIZED, raw
            ))
        })?,
        None => true,
    };

    let response_timeout = get(ENV_RESPONSE_TIMEOUT)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                DomainError::InvalidProfile(format!(
                    "{} must be a number of seconds, got: {}",
                    ENV_RESPONSE_TIMEOUT, raw
                ))
            })
        })
        .transpose()?;

    Ok(Profile {
        reject_unauthorized,
        base_path: get(ENV_BASE_PATH).unwrap_or_default(),
        protocol: get(ENV_PROTOCOL).unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
        encoding: get(ENV_ENCODING),
        response_timeout,
        cert_file: get(ENV_CERT_FILE),
        cert_key_file: get(ENV_CERT_KEY_FILE),
        ..Profile::new(
            name,
            host,
            port,
            get(ENV_USER).unwrap_or_default(),
            get(ENV_PASSWORD).unwrap_or_default(),
        )
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let profile = profile_from_lookup(
            "env",
            lookup(&[
                ("ZOSMF_HOST", "zos.example.com"),
                ("ZOSMF_USER", "IBMUSER"),
                ("ZOSMF_PASSWORD", "secret"),
            ]),
        )
        .unwrap();

        assert_eq!(profile.name, "env");
        assert_eq!(profile.port, 443);
        assert!(profile.reject_unauthorized);
        assert_eq!(profile.protocol, "https");
        assert_eq!(profile.base_url(), "https://zos.example.com/zosmf");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_all_variables() {
        let profile = profile_from_lookup(
            "env",
            lookup(&[
                ("ZOSMF_HOST", "zos.example.com"),
                ("ZOSMF_PORT", "10443"),
                ("ZOSMF_USER", "IBMUSER"),
                ("ZOSMF_PASSWORD", "secret"),
                ("ZOSMF_REJECT_UNAUTHORIZED", "false"),
                ("ZOSMF_BASE_PATH", "/ibm/zosmf"),
                ("ZOSMF_ENCODING", "IBM-1047"),
                ("ZOSMF_RESPONSE_TIMEOUT", "60"),
                ("ZOSMF_CERT_FILE", "/etc/zosmf/client.pem"),
                ("ZOSMF_CERT_KEY_FILE", "/etc/zosmf/client.key"),
            ]),
        )
        .unwrap();

        assert!(!profile.reject_unauthorized);
        assert_eq!(profile.encoding.as_deref(), Some("IBM-1047"));
        assert_eq!(profile.response_timeout, Some(60));
        assert_eq!(profile.cert_file.as_deref(), Some("/etc/zosmf/client.pem"));
        assert_eq!(profile.cert_key_file.as_deref(), Some("/etc/zosmf/client.key"));
        assert_eq!(profile.base_url(), "https://zos.example.com:10443/ibm/zosmf");
    }

    #[test]
    fn test_missing_host() {
        let err = profile_from_lookup("env", lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("ZOSMF_HOST is required"));
    }

    #[test]
    fn test_bad_values() {
        let err = profile_from_lookup(
            "env",
            lookup(&[("ZOSMF_HOST", "h"), ("ZOSMF_PORT", "not-a-port")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("ZOSMF_PORT"));

        let err = profile_from_lookup(
            "env",
            lookup(&[("ZOSMF_HOST", "h"), ("ZOSMF_REJECT_UNAUTHORIZED", "maybe")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("true or false"));
    }
}
