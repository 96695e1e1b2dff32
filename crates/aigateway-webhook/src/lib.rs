//! Admission webhooks for AiGateway, ModelRouter and their class kinds
//!
//! Instance kinds get a defaulter (unset port) and a validator (spec rules).
//! Class kinds get a validator enforcing at most one default class per
//! family. [`server`] exposes all of them over HTTPS.

#![deny(missing_docs)]

pub mod admission;
pub mod ai_gateway;
pub mod ai_gateway_class;
pub mod client;
pub mod default_class;
pub mod model_router;
pub mod model_router_class;
pub mod review;
pub mod server;

pub use admission::{AdmissionObject, CustomDefaulter, CustomValidator, Warnings};
pub use ai_gateway::{validate_ai_gateway, AiGatewayDefaulter, AiGatewayValidator};
pub use ai_gateway_class::AiGatewayClassValidator;
pub use client::{ClassKubeClient, ClassKubeClientImpl};
pub use model_router::{validate_model_router, ModelRouterDefaulter, ModelRouterValidator};
pub use model_router_class::ModelRouterClassValidator;
pub use server::{start_webhook_server, webhook_router, ServerConfig, WebhookState};
