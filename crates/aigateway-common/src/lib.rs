//! Common types for the AI gateway operator: CRDs, errors, and utilities

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod kube_utils;
pub mod model_ref;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// API group shared by every CRD served by this operator
pub const API_GROUP: &str = "agentic-layer.ai";

/// Port assigned to AiGateway and ModelRouter instances that leave it unset
pub const DEFAULT_PORT: i32 = 4000;

/// Separator between provider and model name in compound model identifiers
pub const PROVIDER_MODEL_SEPARATOR: char = '/';

/// Annotation marking an AiGatewayClass as the default class
pub const AI_GATEWAY_DEFAULT_CLASS_ANNOTATION: &str = "aigateway.kubernetes.io/is-default-class";

/// Annotation marking a ModelRouterClass as the default class
pub const MODEL_ROUTER_DEFAULT_CLASS_ANNOTATION: &str =
    "modelrouter.kubernetes.io/is-default-class";

/// Only this exact value of a default-class annotation marks a class as default
pub const DEFAULT_CLASS_ANNOTATION_VALUE: &str = "true";

/// Default HTTPS port for the admission webhook server
pub const DEFAULT_WEBHOOK_PORT: u16 = 9443;
