//! AiGateway CRD types
//!
//! An `AiGateway` exposes a set of AI models behind a single endpoint. Each
//! model is named by two discrete fields, `name` and `provider`.

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::Condition;

/// Desired state of an AI gateway
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "agentic-layer.ai",
    version = "v1alpha1",
    kind = "AiGateway",
    plural = "aigateways",
    namespaced,
    status = "AiGatewayStatus",
    printcolumn = r#"{"name":"Class","type":"string","jsonPath":".spec.aiGatewayClassName"}"#,
    printcolumn = r#"{"name":"Port","type":"integer","jsonPath":".spec.port"}"#,
    printcolumn = r#"{"name":"URL","type":"string","jsonPath":".status.url"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AiGatewaySpec {
    /// AiGatewayClass that handles this gateway
    ///
    /// Only needed when more than one class exists in the cluster; otherwise
    /// the default class applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_gateway_class_name: Option<String>,

    /// Port the gateway is exposed on (1-65535). Zero means unset and is
    /// replaced with 4000 at admission.
    #[serde(default)]
    #[schemars(range(min = 1, max = 65535), default = "super::default_port")]
    pub port: i32,

    /// AI models made available through the gateway
    #[serde(default)]
    pub ai_models: Vec<AiModel>,
}

/// A model served by an AiGateway
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiModel {
    /// Model identifier (e.g., "gpt-4", "claude-3-opus")
    #[serde(default)]
    pub name: String,

    /// AI provider (e.g., "openai", "anthropic", "azure")
    #[serde(default)]
    pub provider: String,
}

/// Observed state of an AiGateway
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiGatewayStatus {
    /// Current conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Cluster-local URL of the gateway
    /// (`http://{name}.{namespace}.svc.cluster.local:{port}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AiGateway {
    /// Cluster-local URL the gateway is reachable on
    ///
    /// Objects without a namespace are addressed in `default`.
    pub fn cluster_url(&self) -> String {
        format!(
            "http://{}.{}.svc.cluster.local:{}",
            self.name_any(),
            self.namespace().as_deref().unwrap_or("default"),
            self.spec.port
        )
    }
}
