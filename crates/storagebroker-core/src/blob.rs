//! Blob service data-plane client
//!
//! Container creation talks directly to the storage account's blob endpoint,
//! authenticated with the account key via SharedKey request signing. Only the
//! single operation the broker needs is implemented.

use crate::error::{ProviderError, Result};
use crate::model::ContainerAccess;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Storage service version used for signing and the `x-ms-version` header
const BLOB_API_VERSION: &str = "2015-02-21";

/// Minimal blob service client bound to one storage account
pub struct BlobClient {
    http: reqwest::Client,
    account: String,
    key: Vec<u8>,
    /// Base URL of the blob endpoint, e.g. `https://{account}.blob.core.windows.net`
    endpoint: String,
}

impl BlobClient {
    /// Create a client for `account` using its base64-encoded access key
    pub fn new(
        http: reqwest::Client,
        account: impl Into<String>,
        access_key: &str,
        endpoint: impl Into<String>,
    ) -> Result<Self> {
        let key = BASE64.decode(access_key)?;
        Ok(Self {
            http,
            account: account.into(),
            key,
            endpoint: endpoint.into(),
        })
    }

    /// Create a blob container, succeeding quietly if it already exists.
    ///
    /// Returns `true` if the container was created, `false` if it was already
    /// there.
    pub async fn create_container_if_not_exists(
        &self,
        container: &str,
        access: ContainerAccess,
    ) -> Result<bool> {
        let url = format!(
            "{}/{}?restype=container",
            self.endpoint.trim_end_matches('/'),
            container
        );
        let date = chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();

        let mut ms_headers = vec![("x-ms-date", date.clone()), ("x-ms-version", BLOB_API_VERSION.to_string())];
        if let Some(level) = access.header_value() {
            ms_headers.push(("x-ms-blob-public-access", level.to_string()));
        }
        ms_headers.sort_by(|a, b| a.0.cmp(b.0));

        let signature = self.sign("PUT", &ms_headers, container, "restype:container");

        let mut request = self
            .http
            .put(&url)
            .header("Content-Length", "0")
            .header(
                "Authorization",
                format!("SharedKey {}:{}", self.account, signature),
            );
        for (name, value) in &ms_headers {
            request = request.header(*name, value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                action: format!("create container '{}'", container),
                source,
            })?;

        match response.status().as_u16() {
            201 => {
                debug!("Container '{}' created", container);
                Ok(true)
            }
            409 => {
                // ContainerAlreadyExists: the idempotent no-op case
                debug!("Container '{}' already exists", container);
                Ok(false)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::Api {
                    action: format!("create container '{}'", container),
                    status,
                    body,
                })
            }
        }
    }

    /// Build the SharedKey signature for a zero-length request.
    ///
    /// The string-to-sign layout is fixed by the storage service: the verb,
    /// eleven standard headers (all empty here; a zero Content-Length is
    /// signed as the empty string from version 2015-02-21 on), the sorted
    /// `x-ms-*` headers, and the canonicalized resource.
    fn sign(
        &self,
        verb: &str,
        ms_headers: &[(&str, String)],
        container: &str,
        resource_params: &str,
    ) -> String {
        let canonical_headers: String = ms_headers
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();
        let canonical_resource =
            format!("/{}/{}\n{}", self.account, container, resource_params);

        let string_to_sign = format!(
            "{verb}\n\n\n\n\n\n\n\n\n\n\n\n{canonical_headers}{canonical_resource}"
        );

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("hmac accepts keys of any length");
        mac.update(string_to_sign.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BlobClient {
        BlobClient::new(
            reqwest::Client::new(),
            "cfabcd1234",
            &BASE64.encode(b"test-key"),
            "https://cfabcd1234.blob.core.windows.net",
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_base64_keys() {
        let result = BlobClient::new(
            reqwest::Client::new(),
            "acct",
            "not base64!!!",
            "https://acct.blob.core.windows.net",
        );
        assert!(matches!(result, Err(ProviderError::InvalidAccessKey(_))));
    }

    #[test]
    fn signature_is_deterministic_for_fixed_headers() {
        let c = client();
        let headers = vec![
            ("x-ms-date", "Tue, 03 Feb 2026 10:00:00 GMT".to_string()),
            ("x-ms-version", BLOB_API_VERSION.to_string()),
        ];
        let first = c.sign("PUT", &headers, "cloud-foundry-abc", "restype:container");
        let second = c.sign("PUT", &headers, "cloud-foundry-abc", "restype:container");
        assert_eq!(first, second);
        assert!(!first.is_empty());
        // base64 of a 32-byte HMAC-SHA256 digest
        assert_eq!(BASE64.decode(&first).unwrap().len(), 32);
    }
}
