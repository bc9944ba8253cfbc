//! reqwest-backed transport for the OpenBB Hub.

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use super::error::Result;
use super::transport::{HubRequest, HubResponse, HubTransport};
use crate::config::HubConfig;

/// HTTP client for the hub.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HubClient {
    client: Client,
    config: HubConfig,
}

impl HubClient {
    pub fn new(config: &HubConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("openbb-hub-core/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }
}

#[async_trait]
impl HubTransport for HubClient {
    async fn send(&self, request: HubRequest) -> Result<HubResponse> {
        let url = self.config.url(&request.path);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(header::ACCEPT, "application/json");

        if let Some(auth) = request.authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            label = request.label,
            method = %request.method,
            path = %request.path,
            status = status,
            "Hub request completed"
        );

        Ok(HubResponse { status, body })
    }
}
