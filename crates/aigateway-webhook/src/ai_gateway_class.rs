//! AiGatewayClass admission: at most one default class

use std::sync::Arc;

use async_trait::async_trait;
use kube::ResourceExt;
use tracing::info;

use aigateway_common::crd::AiGatewayClass;
use aigateway_common::Error;

use crate::admission::{AdmissionObject, CustomValidator, Warnings};
use crate::client::ClassKubeClient;
use crate::default_class::ensure_single_default;

/// Validating webhook for AiGatewayClass
pub struct AiGatewayClassValidator {
    client: Arc<dyn ClassKubeClient>,
}

impl AiGatewayClassValidator {
    /// Create a validator that lists existing classes through `client`
    pub fn new(client: Arc<dyn ClassKubeClient>) -> Self {
        Self { client }
    }

    async fn validate(&self, obj: &AdmissionObject, operation: &str) -> Result<Warnings, Error> {
        let class = obj.downcast::<AiGatewayClass>()?;
        info!(
            kind = "AiGatewayClass",
            name = %class.name_any(),
            operation,
            "Validating AiGatewayClass"
        );

        ensure_single_default(class, || self.client.list_ai_gateway_classes()).await?;
        Ok(Warnings::new())
    }
}

#[async_trait]
impl CustomValidator for AiGatewayClassValidator {
    async fn validate_create(&self, obj: &AdmissionObject) -> Result<Warnings, Error> {
        self.validate(obj, "create").await
    }

    async fn validate_update(
        &self,
        _old: &AdmissionObject,
        new: &AdmissionObject,
    ) -> Result<Warnings, Error> {
        self.validate(new, "update").await
    }

    async fn validate_delete(&self, _obj: &AdmissionObject) -> Result<Warnings, Error> {
        Ok(Warnings::new())
    }
}
