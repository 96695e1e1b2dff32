//! Read-only access to existing class objects
//!
//! Provides a trait-based abstraction so the default-class checks can be
//! tested against mocked listings while production lists through the
//! Kubernetes API.

use async_trait::async_trait;
use kube::api::{Api, ListParams};
use kube::Client;

#[cfg(test)]
use mockall::automock;

use aigateway_common::crd::{AiGatewayClass, ModelRouterClass};
use aigateway_common::Error;

/// Trait abstracting the class listings the admission webhooks depend on
///
/// Listings are never cached: every call reflects what the API server
/// returns at that moment.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClassKubeClient: Send + Sync {
    /// List all AiGatewayClasses in the cluster
    async fn list_ai_gateway_classes(&self) -> Result<Vec<AiGatewayClass>, Error>;

    /// List all ModelRouterClasses in the cluster
    async fn list_model_router_classes(&self) -> Result<Vec<ModelRouterClass>, Error>;
}

/// Real Kubernetes client implementation
pub struct ClassKubeClientImpl {
    client: Client,
}

impl ClassKubeClientImpl {
    /// Create a new ClassKubeClientImpl wrapping the given client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClassKubeClient for ClassKubeClientImpl {
    async fn list_ai_gateway_classes(&self) -> Result<Vec<AiGatewayClass>, Error> {
        let api: Api<AiGatewayClass> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_model_router_classes(&self) -> Result<Vec<ModelRouterClass>, Error> {
        let api: Api<ModelRouterClass> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }
}
