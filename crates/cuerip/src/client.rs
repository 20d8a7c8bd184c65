use reqwest::Client;
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use std::sync::Arc;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::CueRipError;

/// Create a reqwest Client with the provided configuration
pub fn create_client(config: &FetchConfig) -> Result<Client, CueRipError> {
    // Create the crypto provider
    let provider = Arc::new(ring::default_provider());

    // Build platform default TLS configuration
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .expect("Failed to configure default TLS protocol versions")
        .with_platform_verifier()
        .unwrap()
        .with_no_client_auth();

    let mut client_builder = Client::builder()
        .pool_max_idle_per_host(5) // Allow multiple connections to same host
        .user_agent(&config.user_agent)
        .default_headers(config.headers.clone())
        .use_preconfigured_tls(tls_config)
        .redirect(if config.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        });

    if !config.timeout.is_zero() {
        client_builder = client_builder.timeout(config.timeout);
    }

    if !config.connect_timeout.is_zero() {
        client_builder = client_builder.connect_timeout(config.connect_timeout);
    }

    if !config.read_timeout.is_zero() {
        client_builder = client_builder.read_timeout(config.read_timeout);
    }

    if !config.use_system_proxy {
        // reqwest uses system proxy settings by default when we don't call no_proxy()
        client_builder = client_builder.no_proxy();
        debug!("Proxy disabled for downloads");
    }

    client_builder.build().map_err(CueRipError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_create_client_applies_timeouts() {
        let config = FetchConfig {
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
            ..FetchConfig::default()
        };
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_client_with_unlimited_timeouts() {
        let config = FetchConfig {
            timeout: Duration::ZERO,
            connect_timeout: Duration::ZERO,
            read_timeout: Duration::ZERO,
            ..FetchConfig::default()
        };
        assert!(create_client(&config).is_ok());
    }
}
