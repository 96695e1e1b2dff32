//! ModelRouterClass admission: at most one default class

use std::sync::Arc;

use async_trait::async_trait;
use kube::ResourceExt;
use tracing::info;

use aigateway_common::crd::ModelRouterClass;
use aigateway_common::Error;

use crate::admission::{AdmissionObject, CustomValidator, Warnings};
use crate::client::ClassKubeClient;
use crate::default_class::ensure_single_default;

/// Validating webhook for ModelRouterClass
pub struct ModelRouterClassValidator {
    client: Arc<dyn ClassKubeClient>,
}

impl ModelRouterClassValidator {
    /// Create a validator that lists existing classes through `client`
    pub fn new(client: Arc<dyn ClassKubeClient>) -> Self {
        Self { client }
    }

    async fn validate(&self, obj: &AdmissionObject, operation: &str) -> Result<Warnings, Error> {
        let class = obj.downcast::<ModelRouterClass>()?;
        info!(
            kind = "ModelRouterClass",
            name = %class.name_any(),
            operation,
            "Validating ModelRouterClass"
        );

        ensure_single_default(class, || self.client.list_model_router_classes()).await?;
        Ok(Warnings::new())
    }
}

#[async_trait]
impl CustomValidator for ModelRouterClassValidator {
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
