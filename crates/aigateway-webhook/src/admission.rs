//! Admission payloads and the validator/defaulter contracts
//!
//! The API server hands the webhook an untyped object. It is decoded once into
//! [`AdmissionObject`], a tagged union over the kinds this operator owns, and
//! each admission component asks for the kind it handles with
//! [`AdmissionObject::downcast`]. Asking for the wrong kind is the only way to
//! get [`Error::TypeMismatch`].

use async_trait::async_trait;
use kube::api::DynamicObject;
use kube::{Resource, ResourceExt};

use aigateway_common::crd::{AiGateway, AiGatewayClass, ModelRouter, ModelRouterClass};
use aigateway_common::{Error, API_GROUP, DEFAULT_PORT};

/// Non-fatal admission warnings
///
/// Part of the response contract, but no component here ever produces one.
pub type Warnings = Vec<String>;

/// A decoded admission payload
#[derive(Clone, Debug)]
pub enum AdmissionObject {
    /// An `AiGateway`
    AiGateway(AiGateway),
    /// An `AiGatewayClass`
    AiGatewayClass(AiGatewayClass),
    /// A `ModelRouter`
    ModelRouter(ModelRouter),
    /// A `ModelRouterClass`
    ModelRouterClass(ModelRouterClass),
    /// A kind from another API group, or one this operator does not define
    Other {
        /// Kind reported by the payload's type metadata
        kind: String,
    },
    /// A payload that could not be decoded into its declared kind
    Malformed {
        /// Kind reported by the request
        kind: String,
        /// Why decoding failed
        reason: String,
    },
}

impl AdmissionObject {
    /// Decode an untyped admission payload
    ///
    /// Never fails: payloads that cannot be decoded become
    /// [`AdmissionObject::Malformed`] so that paths which ignore the payload
    /// (class deletion) still succeed.
    pub fn from_dynamic(obj: &DynamicObject) -> Self {
        let Some(types) = obj.types.as_ref() else {
            return Self::Malformed {
                kind: String::new(),
                reason: "object has no apiVersion/kind".to_string(),
            };
        };

        let group = types
            .api_version
            .split_once('/')
            .map(|(group, _)| group)
            .unwrap_or_default();
        if group != API_GROUP {
            return Self::Other {
                kind: types.kind.clone(),
            };
        }

        let decoded = match types.kind.as_str() {
            "AiGateway" => decode(obj).map(Self::AiGateway),
            "AiGatewayClass" => decode(obj).map(Self::AiGatewayClass),
            "ModelRouter" => decode(obj).map(Self::ModelRouter),
            "ModelRouterClass" => decode(obj).map(Self::ModelRouterClass),
            _ => {
                return Self::Other {
                    kind: types.kind.clone(),
                }
            }
        };

        decoded.unwrap_or_else(|e| Self::Malformed {
            kind: types.kind.clone(),
            reason: format!("failed to decode {}: {}", types.kind, e),
        })
    }

    /// Kind of the payload, as reported in type mismatch errors
    pub fn kind(&self) -> &str {
        match self {
            Self::AiGateway(_) => "AiGateway",
            Self::AiGatewayClass(_) => "AiGatewayClass",
            Self::ModelRouter(_) => "ModelRouter",
            Self::ModelRouterClass(_) => "ModelRouterClass",
            Self::Other { kind } | Self::Malformed { kind, .. } => kind,
        }
    }

    /// Name of the payload object, if it was decoded
    pub fn name(&self) -> Option<String> {
        match self {
            Self::AiGateway(o) => Some(o.name_any()),
            Self::AiGatewayClass(o) => Some(o.name_any()),
            Self::ModelRouter(o) => Some(o.name_any()),
            Self::ModelRouterClass(o) => Some(o.name_any()),
            Self::Other { .. } | Self::Malformed { .. } => None,
        }
    }

    /// Borrow the payload as kind `K`
    pub fn downcast<K: AdmissionKind>(&self) -> Result<&K, Error> {
        self.check_decoded()?;
        K::from_object(self).ok_or_else(|| Error::type_mismatch(K::kind(&()), self.kind()))
    }

    /// Mutably borrow the payload as kind `K`
    pub fn downcast_mut<K: AdmissionKind>(&mut self) -> Result<&mut K, Error> {
        self.check_decoded()?;
        let actual = self.kind().to_string();
        K::from_object_mut(self).ok_or_else(|| Error::type_mismatch(K::kind(&()), actual))
    }

    /// Serialize the decoded payload back to JSON
    pub fn to_value(&self) -> Result<serde_json::Value, Error> {
        let value = match self {
            Self::AiGateway(o) => serde_json::to_value(o)?,
            Self::AiGatewayClass(o) => serde_json::to_value(o)?,
            Self::ModelRouter(o) => serde_json::to_value(o)?,
            Self::ModelRouterClass(o) => serde_json::to_value(o)?,
            Self::Other { kind } => {
                return Err(Error::invalid_request(format!(
                    "cannot serialize unsupported kind {}",
                    kind
                )))
            }
            Self::Malformed { reason, .. } => return Err(Error::invalid_request(reason.clone())),
        };
        Ok(value)
    }

    fn check_decoded(&self) -> Result<(), Error> {
        match self {
            Self::Malformed { reason, .. } => Err(Error::invalid_request(reason.clone())),
            _ => Ok(()),
        }
    }
}

/// Decode through JSON; an absent or null `spec` reads as `{}`
fn decode<K: serde::de::DeserializeOwned>(obj: &DynamicObject) -> Result<K, serde_json::Error> {
    let mut value = serde_json::to_value(obj)?;
    if let Some(fields) = value.as_object_mut() {
        if fields.get("spec").map_or(true, serde_json::Value::is_null) {
            fields.insert("spec".to_string(), serde_json::json!({}));
        }
    }
    serde_json::from_value(value)
}

/// A kind that can be carried in an [`AdmissionObject`]
pub trait AdmissionKind: Resource<DynamicType = ()> + Sized {
    /// Borrow the payload if it holds this kind
    fn from_object(obj: &AdmissionObject) -> Option<&Self>;
    /// Mutably borrow the payload if it holds this kind
    fn from_object_mut(obj: &mut AdmissionObject) -> Option<&mut Self>;
}

macro_rules! admission_kind {
    ($kind:ident) => {
        impl AdmissionKind for $kind {
            fn from_object(obj: &AdmissionObject) -> Option<&Self> {
                match obj {
                    AdmissionObject::$kind(o) => Some(o),
                    _ => None,
                }
            }

            fn from_object_mut(obj: &mut AdmissionObject) -> Option<&mut Self> {
                match obj {
                    AdmissionObject::$kind(o) => Some(o),
                    _ => None,
                }
            }
        }

        impl From<$kind> for AdmissionObject {
            fn from(o: $kind) -> Self {
                AdmissionObject::$kind(o)
            }
        }
    };
}

admission_kind!(AiGateway);
admission_kind!(AiGatewayClass);
admission_kind!(ModelRouter);
admission_kind!(ModelRouterClass);

/// Validating admission for one kind
///
/// Each call returns the (always empty) warnings on acceptance, or the reason
/// for rejection. Implementations hold no mutable state and may be called
/// concurrently.
#[async_trait]
pub trait CustomValidator: Send + Sync {
    /// Validate an object about to be created
    async fn validate_create(&self, obj: &AdmissionObject) -> Result<Warnings, Error>;

    /// Validate an update; only the new object is inspected
    async fn validate_update(
        &self,
        old: &AdmissionObject,
        new: &AdmissionObject,
    ) -> Result<Warnings, Error>;

    /// Validate an object about to be deleted
    async fn validate_delete(&self, obj: &AdmissionObject) -> Result<Warnings, Error>;
}

/// Mutating admission for one kind
pub trait CustomDefaulter: Send + Sync {
    /// Fill unset fields of the object in place
    fn apply_defaults(&self, obj: &mut AdmissionObject) -> Result<(), Error>;
}

/// Set an unset (zero) port to [`DEFAULT_PORT`]
///
/// Negative ports are left for validation to reject. Returns whether the
/// port was changed.
pub fn default_port(port: &mut i32) -> bool {
    if *port == 0 {
        *port = DEFAULT_PORT;
        true
    } else {
        false
    }
}
