//! ModelRouterClass CRD types

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of a model router class
///
/// Cluster-scoped. `modelrouter.kubernetes.io/is-default-class: "true"` marks
/// the default class of the router family.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "agentic-layer.ai",
    version = "v1alpha1",
    kind = "ModelRouterClass",
    plural = "modelrouterclasses",
    status = "ModelRouterClassStatus",
    printcolumn = r#"{"name":"Controller","type":"string","jsonPath":".spec.controller"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ModelRouterClassSpec {
    /// Name of the controller that handles routers of this class
    pub controller: String,
}

/// Observed state of a ModelRouterClass
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ModelRouterClassStatus {}
