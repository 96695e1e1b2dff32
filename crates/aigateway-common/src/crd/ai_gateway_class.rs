//! AiGatewayClass CRD types

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of an AI gateway class
///
/// Cluster-scoped. Marking a class with
/// `aigateway.kubernetes.io/is-default-class: "true"` makes it the class used
/// by AiGateways that do not name one.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "agentic-layer.ai",
    version = "v1alpha1",
    kind = "AiGatewayClass",
    plural = "aigatewayclasses",
    status = "AiGatewayClassStatus",
    printcolumn = r#"{"name":"Controller","type":"string","jsonPath":".spec.controller"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AiGatewayClassSpec {
    /// Name of the controller that handles gateways of this class
    pub controller: String,
}

/// Observed state of an AiGatewayClass
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct AiGatewayClassStatus {}
