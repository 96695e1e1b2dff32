//! ModelRouter CRD types
//!
//! A `ModelRouter` routes requests across AI models named in compound
//! `provider/model-name` form (e.g. `openai/gpt-4`).

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::Condition;

/// Desired state of a model router
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "agentic-layer.ai",
    version = "v1alpha1",
    kind = "ModelRouter",
    plural = "modelrouters",
    namespaced,
    status = "ModelRouterStatus",
    printcolumn = r#"{"name":"Type","type":"string","jsonPath":".spec.type"}"#,
    printcolumn = r#"{"name":"Port","type":"integer","jsonPath":".spec.port"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ModelRouterSpec {
    /// Router implementation handling this router (e.g., "litellm")
    ///
    /// Free-form so other operators can add implementations.
    #[serde(default, rename = "type")]
    pub type_: String,

    /// ModelRouterClass that handles this router
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_router_class_name: Option<String>,

    /// Port the router is exposed on (1-65535). Zero means unset and is
    /// replaced with 4000 at admission.
    #[serde(default)]
    #[schemars(range(min = 1, max = 65535), default = "super::default_port")]
    pub port: i32,

    /// AI models made available through the router
    #[serde(default)]
    pub ai_models: Vec<RouterModel>,
}

/// A model served by a ModelRouter
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct RouterModel {
    /// Model in `provider/model-name` form.
    /// See <https://docs.litellm.ai/docs/providers> for supported providers.
    #[serde(default)]
    pub name: String,
}

/// Observed state of a ModelRouter
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ModelRouterStatus {
    /// Current conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}
