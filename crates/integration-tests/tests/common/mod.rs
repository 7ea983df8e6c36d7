//! Shared helpers for the HTTP integration tests
#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;
use zosmf_sdk::{Profile, Session, ZosmfClient};

pub const USER: &str = "IBMUSER";
pub const PASSWORD: &str = "secret";

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per binary (`RUST_LOG` controls the level)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Plain-http profile pointing at the mock server; requests land under `/zosmf`
pub fn profile_for(server: &MockServer) -> Profile {
    let address = server.address();
    Profile::new("mock", address.ip().to_string(), address.port(), USER, PASSWORD)
        .with_protocol("http")
}

pub fn session_for(server: &MockServer) -> Session {
    init_tracing();
    Session::new(&profile_for(server)).expect("session for mock server")
}

pub fn client_for(server: &MockServer) -> ZosmfClient {
    ZosmfClient::new(session_for(server))
}
