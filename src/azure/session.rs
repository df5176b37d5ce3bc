// src/azure/session.rs
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::path::Path;

use super::az;
use crate::error::{ApiError, Error, Result};

/// Environment variable naming the SDK credentials file
pub const AUTH_LOCATION_ENV: &str = "AZURE_AUTH_LOCATION";

const DEFAULT_AAD_ENDPOINT: &str = "https://login.microsoftonline.com";
const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com/";

/// Subscription identity plus the means to obtain a bearer token
#[derive(Debug, Clone)]
pub struct Session {
    pub subscription_id: String,
    pub endpoints: Endpoints,
    authorizer: Authorizer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub active_directory: String,
    pub resource_manager: String,
}

impl Endpoints {
    /// Resource manager base URL without trailing slash
    pub fn resource_manager_base(&self) -> &str {
        self.resource_manager.trim_end_matches('/')
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Authorizer {
    /// OAuth2 client-credentials grant with a service principal
    ClientSecret {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    /// Token borrowed from a logged-in Azure CLI
    AzureCli,
}

// Keeps the secret out of debug logs
impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorizer::ClientSecret {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ClientSecret")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Authorizer::AzureCli => f.write_str("AzureCli"),
        }
    }
}

/// SDK auth file, as written by `az ad sp create-for-rbac --sdk-auth`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthFile {
    subscription_id: Option<serde_json::Value>,
    client_id: Option<String>,
    client_secret: Option<String>,
    tenant_id: Option<String>,
    active_directory_endpoint_url: Option<String>,
    resource_manager_endpoint_url: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Session {
    /// Build a session from the file named by `AZURE_AUTH_LOCATION`
    pub fn from_env() -> Result<Self> {
        let path = env::var(AUTH_LOCATION_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                Error::Auth(format!(
                    "{} is not set. Point it at an SDK auth file (az ad sp create-for-rbac --sdk-auth)",
                    AUTH_LOCATION_ENV
                ))
            })?;
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Auth(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: AuthFile = serde_json::from_str(content)
            .map_err(|e| Error::Auth(format!("Can't get authentication info.\n{}", e)))?;

        let subscription_id = match file.subscription_id {
            Some(serde_json::Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
            Some(_) => {
                return Err(Error::Auth(
                    "subscriptionId in credentials file must be a non-empty string".to_string(),
                ))
            }
            None => {
                return Err(Error::Auth(
                    "No subscriptionId in credentials file".to_string(),
                ))
            }
        };

        let authorizer = match (file.tenant_id, file.client_id, file.client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Authorizer::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            },
            _ => Authorizer::AzureCli,
        };

        let endpoints = Endpoints {
            active_directory: file
                .active_directory_endpoint_url
                .unwrap_or_else(|| DEFAULT_AAD_ENDPOINT.to_string()),
            resource_manager: file
                .resource_manager_endpoint_url
                .unwrap_or_else(|| DEFAULT_ARM_ENDPOINT.to_string()),
        };

        Ok(Self {
            subscription_id,
            endpoints,
            authorizer,
        })
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Obtain a bearer token for the resource manager endpoint
    pub async fn access_token(&self, client: &Client) -> Result<String> {
        match &self.authorizer {
            Authorizer::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            } => {
                let url = format!(
                    "{}/{}/oauth2/token",
                    self.endpoints.active_directory.trim_end_matches('/'),
                    tenant_id
                );
                tracing::debug!(%url, client_id = %client_id, "requesting service principal token");

                let response = client
                    .post(&url)
                    .form(&[
                        ("grant_type", "client_credentials"),
                        ("client_id", client_id.as_str()),
                        ("client_secret", client_secret.as_str()),
                        ("resource", self.endpoints.resource_manager.as_str()),
                    ])
                    .send()
                    .await
                    .map_err(|e| Error::Auth(format!("Token request failed: {}", e)))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Auth(format!(
                        "Token request rejected (HTTP {}): {}",
                        status.as_u16(),
                        body.trim()
                    )));
                }

                let token: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::Auth(format!("Failed to parse token response: {}", e)))?;
                Ok(token.access_token)
            }
            Authorizer::AzureCli => {
                tracing::debug!("requesting token from Azure CLI");
                az::get_access_token(&self.endpoints.resource_manager)
                    .await
                    .map_err(|e| match e {
                        Error::Api(ApiError { message, .. }) => Error::Auth(message),
                        other => other,
                    })
            }
        }
    }
}
