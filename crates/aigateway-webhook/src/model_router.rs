//! ModelRouter admission: port defaulting and spec validation
//!
//! Router models use the compound form, a single `provider/model-name`
//! identifier per entry.

use async_trait::async_trait;
use kube::ResourceExt;
use tracing::info;

use aigateway_common::crd::ModelRouter;
use aigateway_common::model_ref::ModelRef;
use aigateway_common::{Error, Result};

use crate::admission::{default_port, AdmissionObject, CustomDefaulter, CustomValidator, Warnings};

const KIND: &str = "ModelRouter";

/// Defaulting webhook for ModelRouter
#[derive(Clone, Copy, Debug, Default)]
pub struct ModelRouterDefaulter;

impl CustomDefaulter for ModelRouterDefaulter {
    fn apply_defaults(&self, obj: &mut AdmissionObject) -> Result<()> {
        let router = obj.downcast_mut::<ModelRouter>()?;
        info!(kind = KIND, name = %router.name_any(), "Defaulting for ModelRouter");

        default_port(&mut router.spec.port);
        Ok(())
    }
}

/// Validating webhook for ModelRouter
#[derive(Clone, Copy, Debug, Default)]
pub struct ModelRouterValidator;

#[async_trait]
impl CustomValidator for ModelRouterValidator {
    async fn validate_create(&self, obj: &AdmissionObject) -> Result<Warnings> {
        let router = obj.downcast::<ModelRouter>()?;
        info!(
            kind = KIND,
            name = %router.name_any(),
            operation = "create",
            "Validation for ModelRouter upon creation"
        );
        validate_model_router(router)?;
        Ok(Warnings::new())
    }

    async fn validate_update(
        &self,
        _old: &AdmissionObject,
        new: &AdmissionObject,
    ) -> Result<Warnings> {
        let router = new.downcast::<ModelRouter>()?;
        info!(
            kind = KIND,
            name = %router.name_any(),
            operation = "update",
            "Validation for ModelRouter upon update"
        );
        validate_model_router(router)?;
        Ok(Warnings::new())
    }

    async fn validate_delete(&self, obj: &AdmissionObject) -> Result<Warnings> {
        let router = obj.downcast::<ModelRouter>()?;
        info!(
            kind = KIND,
            name = %router.name_any(),
            operation = "delete",
            "Validation for ModelRouter upon deletion"
        );
        Ok(Warnings::new())
    }
}

/// Check a ModelRouter's spec; the first broken rule is reported
///
/// Rules, in order: port is positive, a router type is set, at least one
/// model is listed, and every model identifier is a non-empty
/// `provider/model-name` with both parts present.
pub fn validate_model_router(router: &ModelRouter) -> Result<()> {
    let name = router.name_any();
    let spec = &router.spec;

    if spec.port <= 0 {
        return Err(Error::spec_violation_for_field(
            KIND,
            name,
            "spec.port",
            format!("modelRouter port must be positive, got: {}", spec.port),
        ));
    }

    if spec.type_.is_empty() {
        return Err(Error::spec_violation_for_field(
            KIND,
            name,
            "spec.type",
            "model router must specify a type",
        ));
    }

    if spec.ai_models.is_empty() {
        return Err(Error::spec_violation_for_field(
            KIND,
            name,
            "spec.aiModels",
            "no AI models specified in ModelRouter",
        ));
    }

    for (i, model) in spec.ai_models.iter().enumerate() {
        let field = format!("spec.aiModels[{}].name", i);
        if model.name.is_empty() {
            return Err(Error::spec_violation_for_field(
                KIND,
                name,
                field,
                "AI model name cannot be empty",
            ));
        }
        if ModelRef::parse(&model.name).is_none() {
            return Err(Error::spec_violation_for_field(
                KIND,
                name,
                field,
                format!(
                    "model {:?} is malformed; format must be 'provider/model-name'",
                    model.name
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aigateway_common::crd::{ModelRouterClass, ModelRouterSpec, RouterModel};

    fn router(type_: &str, port: i32, models: &[&str]) -> ModelRouter {
        let mut router = ModelRouter::new(
            "test-router",
            ModelRouterSpec {
                type_: type_.to_string(),
                model_router_class_name: None,
                port,
                ai_models: models
                    .iter()
                    .map(|name| RouterModel {
                        name: name.to_string(),
                    })
                    .collect(),
            },
        );
        router.metadata.namespace = Some("default".to_string());
        router
    }

    fn message(router: &ModelRouter) -> String {
        validate_model_router(router).unwrap_err().to_string()
    }

    // =========================================================================
    // Defaulting
    // =========================================================================

    #[test]
    fn applies_default_port_without_touching_models() {
        let mut obj: AdmissionObject = router("litellm", 0, &["gpt-4"]).into();
        ModelRouterDefaulter.apply_defaults(&mut obj).unwrap();

        let defaulted = obj.downcast::<ModelRouter>().unwrap();
        assert_eq!(defaulted.spec.port, 4000);
        assert_eq!(defaulted.spec.ai_models[0].name, "gpt-4");
    }

    #[test]
    fn keeps_explicit_port() {
        let mut obj: AdmissionObject = router("litellm", 8080, &[]).into();
        ModelRouterDefaulter.apply_defaults(&mut obj).unwrap();
        assert_eq!(obj.downcast::<ModelRouter>().unwrap().spec.port, 8080);
    }

    #[test]
    fn defaulter_rejects_wrong_kind() {
        let mut obj: AdmissionObject = ModelRouterClass::new("class", Default::default()).into();
        assert!(matches!(
            ModelRouterDefaulter.apply_defaults(&mut obj),
            Err(Error::TypeMismatch { .. })
        ));
    }

    // =========================================================================
    // Validation rules
    // =========================================================================

    #[test]
    fn accepts_well_formed_router() {
        let valid = router(
            "litellm",
            4000,
            &["openai/gpt-4", "anthropic/claude-3-opus", "azure/deployments/gpt-4"],
        );
        assert!(validate_model_router(&valid).is_ok());
    }

    #[test]
    fn rejects_non_positive_port() {
        let msg = message(&router("litellm", -1, &["openai/gpt-4"]));
        assert!(msg.contains("modelRouter port must be positive, got: -1"), "{msg}");
    }

    #[test]
    fn rejects_missing_type() {
        let err = validate_model_router(&router("", 4000, &["openai/gpt-4"])).unwrap_err();
        assert!(err.to_string().contains("model router must specify a type"));
        assert_eq!(err.field(), Some("spec.type"));
    }

    #[test]
    fn rejects_empty_model_list() {
        let msg = message(&router("litellm", 4000, &[]));
        assert!(msg.contains("no AI models specified in ModelRouter"));
    }

    #[test]
    fn rejects_empty_model_name() {
        let msg = message(&router("litellm", 4000, &["openai/gpt-4", ""]));
        assert!(msg.contains("AI model name cannot be empty"));
    }

    #[test]
    fn malformed_identifier_is_quoted_with_expected_format() {
        for bad in ["gpt-4", "openai/", "/gpt-4"] {
            let err = validate_model_router(&router("litellm", 4000, &[bad])).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains(&format!("model \"{}\" is malformed", bad)), "{msg}");
            assert!(msg.contains("provider/model-name"), "{msg}");
            assert_eq!(err.field(), Some("spec.aiModels[0].name"));
        }
    }

    #[test]
    fn first_broken_rule_wins() {
        // port before type
        let msg = message(&router("", 0, &[]));
        assert!(msg.contains("port must be positive"), "{msg}");

        // type before models
        let msg = message(&router("", 4000, &[]));
        assert!(msg.contains("must specify a type"), "{msg}");

        // earlier model before later model
        let err = validate_model_router(&router("litellm", 4000, &["bad", ""])).unwrap_err();
        assert_eq!(err.field(), Some("spec.aiModels[0].name"));
    }

    // =========================================================================
    // Validator
    // =========================================================================

    #[tokio::test]
    async fn defaulted_router_still_fails_on_malformed_model() {
        let mut obj: AdmissionObject = router("litellm", 0, &["gpt-4"]).into();
        ModelRouterDefaulter.apply_defaults(&mut obj).unwrap();

        let err = ModelRouterValidator.validate_create(&obj).await.unwrap_err();
        assert!(err.to_string().contains("model \"gpt-4\" is malformed"));
    }

    #[tokio::test]
    async fn update_checks_new_object_only() {
        let old: AdmissionObject = router("", -1, &[]).into();
        let new: AdmissionObject = router("litellm", 4000, &["openai/gpt-4"]).into();

        assert!(ModelRouterValidator.validate_update(&old, &new).await.is_ok());
        assert!(ModelRouterValidator.validate_update(&new, &old).await.is_err());
    }

    #[tokio::test]
    async fn delete_ignores_spec_but_checks_kind() {
        let invalid: AdmissionObject = router("", -1, &[]).into();
        assert!(ModelRouterValidator.validate_delete(&invalid).await.is_ok());

        let wrong: AdmissionObject = ModelRouterClass::new("class", Default::default()).into();
        let err = ModelRouterValidator.validate_delete(&wrong).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected a ModelRouter object but got ModelRouterClass"
        );
    }
}
