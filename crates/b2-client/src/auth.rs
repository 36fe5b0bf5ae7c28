//! Account authorization

use crate::config::Config;
use crate::error::Result;
use crate::transport::Transport;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header;
use serde::{Deserialize, Serialize};

/// Authorization returned by the service.
///
/// Holds the session token plus the per-account URLs and part-size hints
/// every later call is built from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub account_id: String,
    pub authorization_token: String,
    /// Base URL for API calls
    pub api_url: String,
    /// Base URL for downloads
    pub download_url: String,
    /// Part size the service recommends for large-file uploads
    pub recommended_part_size: u64,
    /// Smallest allowed part size (except the last part)
    pub absolute_minimum_part_size: u64,
    #[serde(default)]
    pub allowed: Allowed,
}

/// Capabilities granted to the application key
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allowed {
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
}

pub(crate) fn basic_credentials(key_id: &str, key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", key_id, key)))
}

pub(crate) async fn authorize_account(
    transport: &Transport,
    config: &Config,
) -> Result<Authorization> {
    let url = format!("{}/b2api/v2/b2_authorize_account", config.api_url);
    let credentials = basic_credentials(&config.application_key_id, &config.application_key);

    let response = transport
        .send(|| {
            transport
                .http()
                .get(&url)
                .header(header::AUTHORIZATION, credentials.as_str())
        })
        .await?;

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_credentials() {
        // base64("key-id:secret")
        assert_eq!(
            basic_credentials("key-id", "secret"),
            "Basic a2V5LWlkOnNlY3JldA=="
        );
    }

    #[test]
    fn test_authorization_parses_wire_response() {
        let json = r#"{
            "accountId": "acct-1",
            "authorizationToken": "token-1",
            "apiUrl": "https://api001.example.com",
            "downloadUrl": "https://f001.example.com",
            "recommendedPartSize": 100000000,
            "absoluteMinimumPartSize": 5000000,
            "allowed": {
                "capabilities": ["listBuckets", "writeFiles"],
                "bucketId": null,
                "namePrefix": null
            }
        }"#;

        let auth: Authorization = serde_json::from_str(json).unwrap();
        assert_eq!(auth.account_id, "acct-1");
        assert_eq!(auth.recommended_part_size, 100_000_000);
        assert_eq!(auth.allowed.capabilities.len(), 2);
        assert!(auth.allowed.bucket_id.is_none());
    }
}
