//! HTTP implementations of the service contracts.
//!
//! | Contract      | Request                                         | Response                         |
//! |---------------|-------------------------------------------------|----------------------------------|
//! | taxonomy      | `GET {endpoint}/bl/{term}/descendants`          | `["term", ...]`                  |
//! | normalization | `GET {endpoint}/get_normalized_nodes?curie=ID`  | `{ID: {"id": {"label": ...}}}`   |
//! | search        | `POST {endpoint}/lookup?string=TEXT&limit=N`    | `{ID: ["synonym", ...], ...}`    |
//!
//! Search results are ranked by the order of the response object's keys, so
//! the body is decoded into an [`IndexMap`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{EntitySearch, Normalizer, Taxonomy};
use crate::config::RemoteServiceConfig;
use crate::error::{GrammarError, ServiceKind};

/// Describe a transport failure for the service it was addressed to.
fn transport_error(service: ServiceKind, error: reqwest::Error) -> GrammarError {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("failed to connect: {error}")
    } else if error.is_decode() {
        format!("failed to decode response: {error}")
    } else {
        format!("request failed: {error}")
    };
    GrammarError::external(service, message)
}

/// A configured HTTP client for one collaborator.
#[derive(Clone, Debug)]
struct ServiceClient {
    service: ServiceKind,
    config: RemoteServiceConfig,
    client: reqwest::Client,
}

impl ServiceClient {
    fn new(service: ServiceKind, config: RemoteServiceConfig) -> Result<Self, GrammarError> {
        config.endpoint_url()?;

        let mut client_builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            client_builder = client_builder.timeout(Duration::from_secs(timeout));
        }
        let client = client_builder
            .build()
            .map_err(|e| transport_error(service, e))?;

        Ok(Self {
            service,
            config,
            client,
        })
    }

    /// Send a request and decode a successful JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GrammarError> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(self.service, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GrammarError::external(
                self.service,
                format!("unexpected status {status}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| transport_error(self.service, e))
    }
}

/// A biolink lookup service.
#[derive(Clone, Debug)]
pub struct RemoteTaxonomy {
    inner: ServiceClient,
}

impl RemoteTaxonomy {
    pub fn new(config: RemoteServiceConfig) -> Result<Self, GrammarError> {
        Ok(Self {
            inner: ServiceClient::new(ServiceKind::Taxonomy, config)?,
        })
    }
}

#[async_trait]
impl Taxonomy for RemoteTaxonomy {
    async fn descendants(&self, root: &str) -> Result<Vec<String>, GrammarError> {
        let url = self.inner.config.url(&format!("bl/{root}/descendants"));
        tracing::debug!(%url, "fetching taxonomy descendants");
        self.inner.send(self.inner.client.get(&url)).await
    }
}

#[derive(Debug, Deserialize)]
struct NormalizedNode {
    id: NormalizedIdentifier,
}

#[derive(Debug, Deserialize)]
struct NormalizedIdentifier {
    identifier: String,
    #[serde(default)]
    label: Option<String>,
}

/// A node normalization service.
#[derive(Clone, Debug)]
pub struct RemoteNormalizer {
    inner: ServiceClient,
}

impl RemoteNormalizer {
    pub fn new(config: RemoteServiceConfig) -> Result<Self, GrammarError> {
        Ok(Self {
            inner: ServiceClient::new(ServiceKind::Normalization, config)?,
        })
    }
}

#[async_trait]
impl Normalizer for RemoteNormalizer {
    async fn label(&self, identifier: &str) -> Result<String, GrammarError> {
        let url = self.inner.config.url("get_normalized_nodes");
        let request = self
            .inner
            .client
            .get(&url)
            .query(&[("curie", identifier)]);
        let mut nodes: HashMap<String, Option<NormalizedNode>> = self.inner.send(request).await?;

        let node = nodes
            .remove(identifier)
            .flatten()
            .ok_or_else(|| GrammarError::UnrecognizedEntity {
                text: identifier.to_string(),
            })?;

        // Some identifiers normalize without a label; the preferred
        // identifier is still a readable stand-in.
        Ok(node.id.label.unwrap_or(node.id.identifier))
    }
}

/// A name lookup service.
#[derive(Clone, Debug)]
pub struct RemoteSearch {
    inner: ServiceClient,
}

impl RemoteSearch {
    pub fn new(config: RemoteServiceConfig) -> Result<Self, GrammarError> {
        Ok(Self {
            inner: ServiceClient::new(ServiceKind::Search, config)?,
        })
    }
}

#[async_trait]
impl EntitySearch for RemoteSearch {
    async fn search(&self, text: &str, limit: usize) -> Result<Vec<String>, GrammarError> {
        let url = self.inner.config.url("lookup");
        let limit = limit.to_string();
        let request = self
            .inner
            .client
            .post(&url)
            .query(&[("string", text), ("limit", limit.as_str())]);
        let candidates: IndexMap<String, serde_json::Value> = self.inner.send(request).await?;
        Ok(candidates.into_keys().collect())
    }
}
