//! Error types for the AI gateway operator
//!
//! Admission outcomes fall into two groups. Policy rejections
//! (`TypeMismatch`, `SpecViolation`, `SingletonConflict`) mean the submitted
//! object is wrong and must be corrected by the caller. Infrastructure
//! failures (`ListFailed`, `Kube`) mean the decision could not be made; the
//! webhook still rejects, since an unverified invariant is never admitted.

use thiserror::Error;

/// Main error type for AI gateway operator operations
#[derive(Debug, Error)]
pub enum Error {
    /// Admission payload is not the kind the handler was registered for
    #[error("expected a {expected} object but got {actual}")]
    TypeMismatch {
        /// Kind the handler accepts
        expected: String,
        /// Kind actually received
        actual: String,
    },

    /// A structural rule on the object's spec is broken
    #[error("invalid {kind} '{name}': {message}")]
    SpecViolation {
        /// Kind of the rejected object
        kind: String,
        /// Name of the rejected object
        name: String,
        /// The invalid field path (e.g., "spec.aiModels[0].name")
        field: Option<String>,
        /// Description of what's invalid, including the offending value
        message: String,
    },

    /// Another object of the same class kind is already marked default
    #[error(
        "metadata.annotations[{annotation}]: Invalid value: \"true\": another {kind} '{existing}' \
         already has the default class annotation set to 'true'. \
         Only one {kind} can be marked as default"
    )]
    SingletonConflict {
        /// Class kind whose singleton rule was broken
        kind: String,
        /// Name of the existing default object
        existing: String,
        /// Reserved annotation key of the class family
        annotation: String,
    },

    /// Listing existing objects failed, so the invariant could not be checked
    #[error("failed to list {kind} resources: {source}")]
    ListFailed {
        /// Kind that was being listed
        kind: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Kubernetes API error
    #[error("kubernetes error: {source}")]
    Kube {
        /// The underlying kube-rs error
        #[from]
        source: kube::Error,
    },

    /// The admission review was malformed or is missing its object
    #[error("invalid admission request: {0}")]
    InvalidRequest(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal/operational error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a spec violation for an object with the offending field path
    pub fn spec_violation_for_field(
        kind: impl Into<String>,
        name: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::SpecViolation {
            kind: kind.into(),
            name: name.into(),
            field: Some(field.into()),
            message: msg.into(),
        }
    }

    /// Create a default-singleton conflict naming the existing default object
    pub fn singleton_conflict(
        kind: impl Into<String>,
        existing: impl Into<String>,
        annotation: impl Into<String>,
    ) -> Self {
        Self::SingletonConflict {
            kind: kind.into(),
            existing: existing.into(),
            annotation: annotation.into(),
        }
    }

    /// Wrap a failure of the listing capability
    pub fn list_failed(kind: impl Into<String>, source: Error) -> Self {
        Self::ListFailed {
            kind: kind.into(),
            source: Box::new(source),
        }
    }

    /// Create an invalid admission request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is a policy decision about the submitted object
    ///
    /// Returns false for infrastructure failures, where the object may well
    /// be valid but could not be checked.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. }
                | Self::SpecViolation { .. }
                | Self::SingletonConflict { .. }
                | Self::InvalidRequest(_)
        )
    }

    /// The invalid field path, if the error carries one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SpecViolation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_both_kinds() {
        let err = Error::type_mismatch("AiGatewayClass", "AiGateway");
        assert_eq!(
            err.to_string(),
            "expected a AiGatewayClass object but got AiGateway"
        );
        assert!(err.is_rejection());
    }

    #[test]
    fn spec_violation_carries_field_path() {
        let err = Error::spec_violation_for_field(
            "ModelRouter",
            "router",
            "spec.port",
            "modelRouter port must be positive, got: -1",
        );
        assert_eq!(err.field(), Some("spec.port"));
        assert!(err.to_string().contains("got: -1"));
        assert!(err.to_string().contains("router"));
    }

    #[test]
    fn singleton_conflict_names_existing_object() {
        let err = Error::singleton_conflict(
            "AiGatewayClass",
            "existing-default-class",
            "aigateway.kubernetes.io/is-default-class",
        );
        let msg = err.to_string();
        assert!(msg.contains("another AiGatewayClass 'existing-default-class'"));
        assert!(msg.contains("Only one AiGatewayClass can be marked as default"));
        assert!(msg.contains("metadata.annotations[aigateway.kubernetes.io/is-default-class]"));
    }

    #[test]
    fn list_failure_is_not_a_rejection() {
        let err = Error::list_failed("ModelRouterClass", Error::internal("connection refused"));
        assert!(!err.is_rejection());
        assert_eq!(
            err.to_string(),
            "failed to list ModelRouterClass resources: internal error: connection refused"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn kube_errors_convert() {
        let kube_err = kube::Error::Api(kube::error::ErrorResponse {
            status: "Failure".to_string(),
            message: "forbidden".to_string(),
            reason: "Forbidden".to_string(),
            code: 403,
        });
        let err: Error = kube_err.into();
        assert!(matches!(err, Error::Kube { .. }));
        assert!(!err.is_rejection());
    }

    #[test]
    fn json_errors_convert_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: crate::Result<()> = Err(json_err.into());
        let err = err.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(!err.is_rejection());
        assert!(err.field().is_none());
    }
}
