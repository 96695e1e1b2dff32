//! AiGateway admission: port defaulting and spec validation
//!
//! Gateway models use the discrete-field form: `name` and `provider` are
//! separate and each must be non-empty.

use async_trait::async_trait;
use kube::ResourceExt;
use tracing::info;

use aigateway_common::crd::AiGateway;
use aigateway_common::{Error, Result};

use crate::admission::{default_port, AdmissionObject, CustomDefaulter, CustomValidator, Warnings};

const KIND: &str = "AiGateway";

/// Defaulting webhook for AiGateway
#[derive(Clone, Copy, Debug, Default)]
pub struct AiGatewayDefaulter;

impl CustomDefaulter for AiGatewayDefaulter {
    fn apply_defaults(&self, obj: &mut AdmissionObject) -> Result<()> {
        let gateway = obj.downcast_mut::<AiGateway>()?;
        info!(kind = KIND, name = %gateway.name_any(), "Defaulting for AiGateway");

        default_port(&mut gateway.spec.port);
        Ok(())
    }
}

/// Validating webhook for AiGateway
#[derive(Clone, Copy, Debug, Default)]
pub struct AiGatewayValidator;

#[async_trait]
impl CustomValidator for AiGatewayValidator {
    async fn validate_create(&self, obj: &AdmissionObject) -> Result<Warnings> {
        let gateway = obj.downcast::<AiGateway>()?;
        info!(
            kind = KIND,
            name = %gateway.name_any(),
            operation = "create",
            "Validation for AiGateway upon creation"
        );
        validate_ai_gateway(gateway)?;
        Ok(Warnings::new())
    }

    async fn validate_update(
        &self,
        _old: &AdmissionObject,
        new: &AdmissionObject,
    ) -> Result<Warnings> {
        let gateway = new.downcast::<AiGateway>()?;
        info!(
            kind = KIND,
            name = %gateway.name_any(),
            operation = "update",
            "Validation for AiGateway upon update"
        );
        validate_ai_gateway(gateway)?;
        Ok(Warnings::new())
    }

    async fn validate_delete(&self, obj: &AdmissionObject) -> Result<Warnings> {
        let gateway = obj.downcast::<AiGateway>()?;
        info!(
            kind = KIND,
            name = %gateway.name_any(),
            operation = "delete",
            "Validation for AiGateway upon deletion"
        );
        Ok(Warnings::new())
    }
}

/// Check an AiGateway's spec; the first broken rule is reported
///
/// Rules, in order: port is positive, at least one model is listed, and
/// every model has a non-empty name and a non-empty provider.
pub fn validate_ai_gateway(gateway: &AiGateway) -> Result<()> {
    let name = gateway.name_any();
    let spec = &gateway.spec;

    if spec.port <= 0 {
        return Err(Error::spec_violation_for_field(
            KIND,
            name,
            "spec.port",
            format!("aiGateway port must be positive, got: {}", spec.port),
        ));
    }

    if spec.ai_models.is_empty() {
        return Err(Error::spec_violation_for_field(
            KIND,
            name,
            "spec.aiModels",
            "no AI models specified in AiGateway",
        ));
    }

    for (i, model) in spec.ai_models.iter().enumerate() {
        if model.name.is_empty() {
            return Err(Error::spec_violation_for_field(
                KIND,
                name,
                format!("spec.aiModels[{}].name", i),
                "AI model name cannot be empty",
            ));
        }
        if model.provider.is_empty() {
            return Err(Error::spec_violation_for_field(
                KIND,
                name,
                format!("spec.aiModels[{}].provider", i),
                format!("AI model provider cannot be empty (model {:?})", model.name),
            ));
        }
    }

    Ok(())
}
