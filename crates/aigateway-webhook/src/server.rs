//! HTTPS admission server
//!
//! Serves one validating path per kind and one mutating path per instance
//! kind, plus `/healthz`. Paths follow the
//! `/{validate,mutate}-<group>-<version>-<kind>` convention used by the
//! webhook configurations.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_server::tls_rustls::RustlsConfig;
use kube::api::DynamicObject;
use kube::core::admission::AdmissionReview;
use tracing::info;

use aigateway_common::{Error, DEFAULT_WEBHOOK_PORT};

use crate::ai_gateway::{AiGatewayDefaulter, AiGatewayValidator};
use crate::ai_gateway_class::AiGatewayClassValidator;
use crate::client::ClassKubeClient;
use crate::model_router::{ModelRouterDefaulter, ModelRouterValidator};
use crate::model_router_class::ModelRouterClassValidator;
use crate::review::{mutate_review, validate_review};

/// Validating path for AiGateway
pub const VALIDATE_AI_GATEWAY_PATH: &str = "/validate-agentic-layer-ai-v1alpha1-aigateway";
/// Validating path for AiGatewayClass
pub const VALIDATE_AI_GATEWAY_CLASS_PATH: &str =
    "/validate-agentic-layer-ai-v1alpha1-aigatewayclass";
/// Validating path for ModelRouter
pub const VALIDATE_MODEL_ROUTER_PATH: &str = "/validate-agentic-layer-ai-v1alpha1-modelrouter";
/// Validating path for ModelRouterClass
pub const VALIDATE_MODEL_ROUTER_CLASS_PATH: &str =
    "/validate-agentic-layer-ai-v1alpha1-modelrouterclass";
/// Mutating path for AiGateway
pub const MUTATE_AI_GATEWAY_PATH: &str = "/mutate-agentic-layer-ai-v1alpha1-aigateway";
/// Mutating path for ModelRouter
pub const MUTATE_MODEL_ROUTER_PATH: &str = "/mutate-agentic-layer-ai-v1alpha1-modelrouter";

type Review = AdmissionReview<DynamicObject>;

/// Admission components shared by all handlers
pub struct WebhookState {
    ai_gateway: AiGatewayValidator,
    ai_gateway_defaulter: AiGatewayDefaulter,
    ai_gateway_class: AiGatewayClassValidator,
    model_router: ModelRouterValidator,
    model_router_defaulter: ModelRouterDefaulter,
    model_router_class: ModelRouterClassValidator,
}

impl WebhookState {
    /// Build every admission component; class validators list through `client`
    pub fn new(client: Arc<dyn ClassKubeClient>) -> Self {
        Self {
            ai_gateway: AiGatewayValidator,
            ai_gateway_defaulter: AiGatewayDefaulter,
            ai_gateway_class: AiGatewayClassValidator::new(client.clone()),
            model_router: ModelRouterValidator,
            model_router_defaulter: ModelRouterDefaulter,
            model_router_class: ModelRouterClassValidator::new(client),
        }
    }
}

/// Build the admission router
pub fn webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(VALIDATE_AI_GATEWAY_PATH, post(validate_ai_gateway))
        .route(VALIDATE_AI_GATEWAY_CLASS_PATH, post(validate_ai_gateway_class))
        .route(VALIDATE_MODEL_ROUTER_PATH, post(validate_model_router))
        .route(VALIDATE_MODEL_ROUTER_CLASS_PATH, post(validate_model_router_class))
        .route(MUTATE_AI_GATEWAY_PATH, post(mutate_ai_gateway))
        .route(MUTATE_MODEL_ROUTER_PATH, post(mutate_model_router))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

async fn validate_ai_gateway(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<Review>,
) -> Json<Review> {
    Json(validate_review(&state.ai_gateway, review).await)
}

async fn validate_ai_gateway_class(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<Review>,
) -> Json<Review> {
    Json(validate_review(&state.ai_gateway_class, review).await)
}

async fn validate_model_router(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<Review>,
) -> Json<Review> {
    Json(validate_review(&state.model_router, review).await)
}

async fn validate_model_router_class(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<Review>,
) -> Json<Review> {
    Json(validate_review(&state.model_router_class, review).await)
}

async fn mutate_ai_gateway(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<Review>,
) -> Json<Review> {
    Json(mutate_review(&state.ai_gateway_defaulter, review))
}

async fn mutate_model_router(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<Review>,
) -> Json<Review> {
    Json(mutate_review(&state.model_router_defaulter, review))
}

/// Webhook server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to bind the server
    pub addr: SocketAddr,
    /// PEM certificate chain presented to the API server
    pub cert_path: PathBuf,
    /// PEM private key for `cert_path`
    pub key_path: PathBuf,
}

impl ServerConfig {
    /// Serve on all interfaces at `port`, with `tls.crt`/`tls.key` from `cert_dir`
    pub fn new(port: u16, cert_dir: impl Into<PathBuf>) -> Self {
        let cert_dir = cert_dir.into();
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            cert_path: cert_dir.join("tls.crt"),
            key_path: cert_dir.join("tls.key"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WEBHOOK_PORT, "/tmp/k8s-webhook-server/serving-certs")
    }
}

/// Start the admission webhook server; runs until the listener fails
pub async fn start_webhook_server(
    config: ServerConfig,
    client: Arc<dyn ClassKubeClient>,
) -> Result<(), Error> {
    let app = webhook_router(Arc::new(WebhookState::new(client)));

    let tls_config = RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
        .await
        .map_err(|e| {
            Error::config(format!(
                "TLS config error ({}): {}",
                config.cert_path.display(),
                e
            ))
        })?;

    info!(addr = %config.addr, "Starting admission webhook server");

    axum_server::bind_rustls(config.addr, tls_config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

    Ok(())
}
