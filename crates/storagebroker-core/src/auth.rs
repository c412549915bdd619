//! Service-principal token acquisition
//!
//! One token is acquired per process invocation via the OAuth2
//! `client_credentials` grant; a single broker operation performs only a
//! handful of calls, so no refresh logic is needed.

use crate::config::{CloudEnvironment, ProviderConfig};
use crate::error::{ProviderError, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Acquire a bearer token scoped to the environment's management endpoint
pub async fn acquire_token(
    http: &reqwest::Client,
    environment: &CloudEnvironment,
    config: &ProviderConfig,
) -> Result<String> {
    let token_url = format!(
        "{}/{}/oauth2/token",
        environment.active_directory_endpoint.trim_end_matches('/'),
        config.tenant_id
    );
    debug!("Requesting service principal token from {}", token_url);

    let response = http
        .post(&token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("resource", environment.resource_manager_endpoint.as_str()),
        ])
        .send()
        .await
        .map_err(|source| ProviderError::Transport {
            action: "token request".to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::AuthenticationFailed(format!(
            "token endpoint returned {}: {}",
            status, body
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::AuthenticationFailed(e.to_string()))?;

    debug!("Service principal token acquired");
    Ok(token.access_token)
}
