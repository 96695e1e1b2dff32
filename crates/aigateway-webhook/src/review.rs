//! AdmissionReview dispatch
//!
//! Turns an incoming review into calls on a [`CustomValidator`] or
//! [`CustomDefaulter`] and packs the outcome back into a response. The
//! operation decides which payload is handed over:
//!
//! | operation | validator call                         | defaulter |
//! |-----------|----------------------------------------|-----------|
//! | CREATE    | `validate_create(object)`              | yes       |
//! | UPDATE    | `validate_update(oldObject, object)`   | yes       |
//! | DELETE    | `validate_delete(oldObject)`           | no        |
//! | CONNECT   | allowed                                | no        |

use json_patch::{AddOperation, Patch, PatchOperation};
use jsonptr::PointerBuf;
use kube::api::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use serde_json::Value;
use tracing::{debug, error, warn};

use aigateway_common::Error;

use crate::admission::{AdmissionObject, CustomDefaulter, CustomValidator};

/// Run a validating review through `validator`
pub async fn validate_review(
    validator: &dyn CustomValidator,
    review: AdmissionReview<DynamicObject>,
) -> AdmissionReview<DynamicObject> {
    match review.try_into() {
        Ok(req) => validate_request(validator, &req).await.into_review(),
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            AdmissionResponse::invalid(e.to_string()).into_review()
        }
    }
}

/// Run a mutating review through `defaulter`
pub fn mutate_review(
    defaulter: &dyn CustomDefaulter,
    review: AdmissionReview<DynamicObject>,
) -> AdmissionReview<DynamicObject> {
    match review.try_into() {
        Ok(req) => mutate_request(defaulter, &req).into_review(),
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            AdmissionResponse::invalid(e.to_string()).into_review()
        }
    }
}

/// Decide a single validating request
pub async fn validate_request(
    validator: &dyn CustomValidator,
    req: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let outcome = match req.operation {
        Operation::Create => {
            let obj = payload(req.object.as_ref(), req);
            validator.validate_create(&obj).await
        }
        Operation::Update => {
            let old = payload(req.old_object.as_ref(), req);
            let new = payload(req.object.as_ref(), req);
            validator.validate_update(&old, &new).await
        }
        Operation::Delete => {
            let obj = payload(req.old_object.as_ref(), req);
            validator.validate_delete(&obj).await
        }
        Operation::Connect => Ok(Vec::new()),
    };

    match outcome {
        Ok(warnings) => {
            let mut response = AdmissionResponse::from(req);
            if !warnings.is_empty() {
                response.warnings = Some(warnings);
            }
            response
        }
        Err(e) => deny(req, e),
    }
}

/// Decide a single mutating request
///
/// Only CREATE and UPDATE are defaulted; anything else is allowed untouched.
pub fn mutate_request(
    defaulter: &dyn CustomDefaulter,
    req: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    if !matches!(req.operation, Operation::Create | Operation::Update) {
        return AdmissionResponse::from(req);
    }

    let mut obj = payload(req.object.as_ref(), req);
    let raw = req.object.as_ref().map(|o| &o.data).unwrap_or(&Value::Null);
    let patch = match defaulted_patch(defaulter, &mut obj, raw) {
        Ok(patch) => patch,
        Err(e) => return deny(req, e),
    };

    if patch.0.is_empty() {
        debug!(uid = %req.uid, kind = %req.kind.kind, "Nothing to default");
        return AdmissionResponse::from(req);
    }

    debug!(
        uid = %req.uid,
        kind = %req.kind.kind,
        name = %req.name,
        patch_ops = patch.0.len(),
        "Applying defaults"
    );

    match AdmissionResponse::from(req).with_patch(patch) {
        Ok(response) => response,
        Err(e) => {
            error!(uid = %req.uid, error = %e, "Failed to serialize patch");
            AdmissionResponse::from(req).deny(format!("patch serialization error: {e}"))
        }
    }
}

/// Apply `defaulter` to `obj` and return the JSON patch it amounts to
///
/// The patch is computed over the decoded form of the object, where unset
/// fields already hold their zero value, while the API server applies it to
/// `raw`, the submitted payload, where they may be absent. Replacements are
/// therefore emitted as adds, which create or overwrite the member alike.
/// When `raw` has no `spec` at all, the whole defaulted spec is added.
pub fn defaulted_patch(
    defaulter: &dyn CustomDefaulter,
    obj: &mut AdmissionObject,
    raw: &Value,
) -> Result<Patch, Error> {
    let before = obj.to_value()?;
    defaulter.apply_defaults(obj)?;
    let after = obj.to_value()?;

    let diff = json_patch::diff(&before, &after);
    if diff.0.is_empty() {
        return Ok(diff);
    }

    if raw.get("spec").map_or(true, Value::is_null) {
        return Ok(Patch(vec![PatchOperation::Add(AddOperation {
            path: PointerBuf::from_tokens(["spec"]),
            value: after["spec"].clone(),
        })]));
    }

    let ops = diff
        .0
        .into_iter()
        .map(|op| match op {
            PatchOperation::Replace(replace) => PatchOperation::Add(AddOperation {
                path: replace.path,
                value: replace.value,
            }),
            other => other,
        })
        .collect();
    Ok(Patch(ops))
}

fn payload(obj: Option<&DynamicObject>, req: &AdmissionRequest<DynamicObject>) -> AdmissionObject {
    match obj {
        Some(obj) => AdmissionObject::from_dynamic(obj),
        None => AdmissionObject::Malformed {
            kind: req.kind.kind.clone(),
            reason: format!(
                "{:?} request for {} carries no object",
                req.operation, req.kind.kind
            ),
        },
    }
}

fn deny(req: &AdmissionRequest<DynamicObject>, e: Error) -> AdmissionResponse {
    if e.is_rejection() {
        warn!(
            uid = %req.uid,
            kind = %req.kind.kind,
            name = %req.name,
            operation = ?req.operation,
            reason = %e,
            "Denying admission request"
        );
    } else {
        error!(
            uid = %req.uid,
            kind = %req.kind.kind,
            name = %req.name,
            operation = ?req.operation,
            error = %e,
            "Admission check failed, denying"
        );
    }
    AdmissionResponse::from(req).deny(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai_gateway::{AiGatewayDefaulter, AiGatewayValidator};
    use crate::ai_gateway_class::AiGatewayClassValidator;
    use crate::client::MockClassKubeClient;
    use crate::model_router::ModelRouterDefaulter;
    use serde_json::json;
    use std::sync::Arc;

    fn review(operation: &str, object: Option<Value>, old_object: Option<Value>) -> Value {
        let kind = object
            .as_ref()
            .or(old_object.as_ref())
            .and_then(|o| o["kind"].as_str())
            .unwrap_or("AiGateway")
            .to_string();
        json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
                "kind": {"group": "agentic-layer.ai", "version": "v1alpha1", "kind": kind},
                "resource": {"group": "agentic-layer.ai", "version": "v1alpha1", "resource": "aigateways"},
                "name": "gw",
                "namespace": "default",
                "operation": operation,
                "userInfo": {"username": "admin"},
                "object": object,
                "oldObject": old_object,
                "dryRun": false
            }
        })
    }

    fn request(value: Value) -> AdmissionRequest<DynamicObject> {
        let review: AdmissionReview<DynamicObject> = serde_json::from_value(value).unwrap();
        review.try_into().unwrap()
    }

    fn gateway(spec: Value) -> Value {
        json!({
            "apiVersion": "agentic-layer.ai/v1alpha1",
            "kind": "AiGateway",
            "metadata": {"name": "gw", "namespace": "default"},
            "spec": spec
        })
    }

    fn gateway_class() -> Value {
        json!({
            "apiVersion": "agentic-layer.ai/v1alpha1",
            "kind": "AiGatewayClass",
            "metadata": {"name": "class"},
            "spec": {"controller": "agentic-layer.ai/litellm"}
        })
    }

    fn valid_spec() -> Value {
        json!({"port": 4000, "aiModels": [{"name": "gpt-4", "provider": "openai"}]})
    }

    fn patch_ops(response: &AdmissionResponse) -> Vec<PatchOperation> {
        let bytes = response.patch.as_ref().expect("response should carry a patch");
        serde_json::from_slice::<Patch>(bytes).unwrap().0
    }

    // =========================================================================
    // Validation dispatch
    // =========================================================================

    #[tokio::test]
    async fn create_validates_object() {
        let req = request(review("CREATE", Some(gateway(valid_spec())), None));
        let response = validate_request(&AiGatewayValidator, &req).await;
        assert!(response.allowed);
        assert!(response.warnings.is_none());

        let req = request(review("CREATE", Some(gateway(json!({"port": -1}))), None));
        let response = validate_request(&AiGatewayValidator, &req).await;
        assert!(!response.allowed);
        assert!(response.result.message.contains("port must be positive, got: -1"));
    }

    #[tokio::test]
    async fn update_validates_new_object_only() {
        let req = request(review(
            "UPDATE",
            Some(gateway(valid_spec())),
            Some(gateway(json!({"port": -1}))),
        ));
        assert!(validate_request(&AiGatewayValidator, &req).await.allowed);
    }

    #[tokio::test]
    async fn delete_uses_old_object() {
        let req = request(review("DELETE", None, Some(gateway(json!({"port": -1})))));
        assert!(validate_request(&AiGatewayValidator, &req).await.allowed);

        let req = request(review("DELETE", None, Some(gateway_class())));
        let response = validate_request(&AiGatewayValidator, &req).await;
        assert!(!response.allowed);
        assert!(response
            .result
            .message
            .contains("expected a AiGateway object but got AiGatewayClass"));
    }

    #[tokio::test]
    async fn class_delete_without_object_is_allowed() {
        let mut mock = MockClassKubeClient::new();
        mock.expect_list_ai_gateway_classes().times(0);
        let validator = AiGatewayClassValidator::new(Arc::new(mock));

        let mut value = review("DELETE", None, None);
        value["request"]["kind"]["kind"] = json!("AiGatewayClass");
        let req = request(value);
        assert!(validate_request(&validator, &req).await.allowed);
    }

    #[tokio::test]
    async fn missing_object_on_create_is_denied() {
        let req = request(review("CREATE", None, None));
        let response = validate_request(&AiGatewayValidator, &req).await;
        assert!(!response.allowed);
        assert!(response.result.message.contains("carries no object"));
    }

    #[tokio::test]
    async fn unparseable_review_is_invalid() {
        let review: AdmissionReview<DynamicObject> = serde_json::from_value(json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview"
        }))
        .unwrap();

        let out = validate_review(&AiGatewayValidator, review).await;
        let response = out.response.unwrap();
        assert!(!response.allowed);
    }

    // =========================================================================
    // Mutation dispatch
    // =========================================================================

    #[test]
    fn defaulting_emits_add_for_absent_port() {
        let req = request(review(
            "CREATE",
            Some(gateway(json!({"aiModels": [{"name": "gpt-4", "provider": "openai"}]}))),
            None,
        ));
        let response = mutate_request(&AiGatewayDefaulter, &req);
        assert!(response.allowed);

        let ops = patch_ops(&response);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            PatchOperation::Add(add) => {
                assert_eq!(add.path, PointerBuf::from_tokens(["spec", "port"]));
                assert_eq!(add.value, json!(4000));
            }
            other => panic!("expected add operation, got {:?}", other),
        }
    }

    #[test]
    fn patch_applies_to_raw_payload() {
        let raw = gateway(json!({"aiModels": [{"name": "gpt-4", "provider": "openai"}]}));
        let req = request(review("CREATE", Some(raw.clone()), None));
        let response = mutate_request(&AiGatewayDefaulter, &req);

        let mut patched = raw;
        json_patch::patch(&mut patched, &patch_ops(&response)).unwrap();
        assert_eq!(patched["spec"]["port"], json!(4000));
    }

    #[test]
    fn gateway_without_spec_gets_whole_spec_added() {
        let mut raw = gateway(json!({}));
        raw.as_object_mut().unwrap().remove("spec");
        let req = request(review("CREATE", Some(raw.clone()), None));
        let response = mutate_request(&AiGatewayDefaulter, &req);
        assert!(response.allowed);

        let ops = patch_ops(&response);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            PatchOperation::Add(add) => assert_eq!(add.path, PointerBuf::from_tokens(["spec"])),
            other => panic!("expected add, got {other:?}"),
        }

        let mut patched = raw;
        json_patch::patch(&mut patched, &ops).unwrap();
        assert_eq!(patched["spec"]["port"], json!(4000));
    }

    #[test]
    fn explicit_port_yields_no_patch() {
        let req = request(review(
            "UPDATE",
            Some(gateway(valid_spec())),
            Some(gateway(valid_spec())),
        ));
        let response = mutate_request(&AiGatewayDefaulter, &req);
        assert!(response.allowed);
        assert!(response.patch.is_none());
    }

    #[test]
    fn delete_is_never_mutated() {
        let req = request(review("DELETE", None, Some(gateway(json!({})))));
        let response = mutate_request(&AiGatewayDefaulter, &req);
        assert!(response.allowed);
        assert!(response.patch.is_none());
    }

    #[test]
    fn defaulter_on_wrong_kind_is_denied() {
        let req = request(review("CREATE", Some(gateway(valid_spec())), None));
        let response = mutate_request(&ModelRouterDefaulter, &req);
        assert!(!response.allowed);
        assert!(response
            .result
            .message
            .contains("expected a ModelRouter object but got AiGateway"));
    }
}
