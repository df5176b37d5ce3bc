// src/azure/client.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::models::{
    ErrorResponse, GenericResource, GroupResource, NetworkInterface, Page, PublicIpAddress,
    VirtualMachine,
};
use super::{ArmApi, Session};
use crate::error::{ApiError, Error, Result};

const RESOURCES_API_VERSION: &str = "2020-10-01";
const COMPUTE_API_VERSION: &str = "2023-03-01";
const NETWORK_API_VERSION: &str = "2023-05-01";

const VM_RESOURCE_FILTER: &str = "resourceType eq 'Microsoft.Compute/virtualMachines'";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Azure Resource Manager REST client
pub struct ArmClient {
    client: Client,
    session: Session,
    token: OnceCell<String>,
}

impl ArmClient {
    pub fn new(session: Session) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("sshmenu-azure/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::new("build HTTP client", e.to_string()))?;

        Ok(Self {
            client,
            session,
            token: OnceCell::new(),
        })
    }

    /// Bearer token, fetched on first use and reused for the rest of the run
    async fn bearer(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| self.session.access_token(&self.client))
            .await?;
        Ok(token.as_str())
    }

    fn subscription_url(&self, path: &str) -> String {
        format!(
            "{}/subscriptions/{}{}",
            self.session.endpoints.resource_manager_base(),
            self.session.subscription_id,
            path
        )
    }

    fn group_url(&self, group: &str, path: &str) -> String {
        self.subscription_url(&format!(
            "/resourceGroups/{}{}",
            urlencoding::encode(group),
            path
        ))
    }

    /// GET request to the resource manager, decoding ARM error envelopes
    async fn get<T: DeserializeOwned>(&self, operation: &str, url: &str) -> Result<T> {
        let token = self.bearer().await?;
        tracing::debug!(%url, operation, "GET");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::new(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(operation, status.as_u16(), &body).into());
        }

        response
            .json()
            .await
            .map_err(|e| Error::Api(ApiError::new(operation, format!("invalid response: {}", e))))
    }
}

fn error_from_body(operation: &str, status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) => {
            let message = error
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            let err = ApiError::new(operation, message).with_status(status);
            match error.code {
                Some(code) => err.with_code(code),
                None => err,
            }
        }
        Err(_) if body.trim().is_empty() => {
            ApiError::new(operation, "empty error response").with_status(status)
        }
        Err(_) => ApiError::new(operation, body.trim()).with_status(status),
    }
}

#[async_trait]
impl ArmApi for ArmClient {
    async fn resource_groups(&self, next_link: Option<String>) -> Result<Page<GroupResource>> {
        let url = next_link.unwrap_or_else(|| {
            self.subscription_url(&format!(
                "/resourcegroups?api-version={}",
                RESOURCES_API_VERSION
            ))
        });
        self.get("list resource groups", &url).await
    }

    async fn virtual_machine_resources(
        &self,
        group: &str,
        next_link: Option<String>,
    ) -> Result<Page<GenericResource>> {
        let url = next_link.unwrap_or_else(|| {
            self.group_url(
                group,
                &format!(
                    "/resources?$filter={}&api-version={}",
                    urlencoding::encode(VM_RESOURCE_FILTER),
                    RESOURCES_API_VERSION
                ),
            )
        });
        self.get(
            &format!("list virtual machines in resource group '{}'", group),
            &url,
        )
        .await
    }

    async fn virtual_machine(&self, group: &str, name: &str) -> Result<VirtualMachine> {
        let url = self.group_url(
            group,
            &format!(
                "/providers/Microsoft.Compute/virtualMachines/{}?$expand=instanceView&api-version={}",
                urlencoding::encode(name),
                COMPUTE_API_VERSION
            ),
        );
        self.get(&format!("get virtual machine '{}'", name), &url)
            .await
    }

    async fn network_interface(&self, group: &str, name: &str) -> Result<NetworkInterface> {
        let url = self.group_url(
            group,
            &format!(
                "/providers/Microsoft.Network/networkInterfaces/{}?api-version={}",
                urlencoding::encode(name),
                NETWORK_API_VERSION
            ),
        );
        self.get(&format!("get network interface '{}'", name), &url)
            .await
    }

    async fn public_ip_address(&self, group: &str, name: &str) -> Result<PublicIpAddress> {
        let url = self.group_url(
            group,
            &format!(
                "/providers/Microsoft.Network/publicIPAddresses/{}?api-version={}",
                urlencoding::encode(name),
                NETWORK_API_VERSION
            ),
        );
        self.get(&format!("get public IP address '{}'", name), &url)
            .await
    }
}
