//! Custom Resource Definitions for the AI gateway operator
//!
//! Two parallel families share the same shape: an instance kind that lists
//! AI models and a port (`AiGateway`, `ModelRouter`) and a cluster-scoped
//! class kind naming the controller that implements it (`AiGatewayClass`,
//! `ModelRouterClass`). At most one class per family may carry the family's
//! default-class annotation.

mod ai_gateway;
mod ai_gateway_class;
mod model_router;
mod model_router_class;
mod types;

pub use ai_gateway::{AiGateway, AiGatewaySpec, AiGatewayStatus, AiModel};
pub use ai_gateway_class::{AiGatewayClass, AiGatewayClassSpec, AiGatewayClassStatus};
pub use model_router::{ModelRouter, ModelRouterSpec, ModelRouterStatus, RouterModel};
pub use model_router_class::{ModelRouterClass, ModelRouterClassSpec, ModelRouterClassStatus};
pub use types::{Condition, ConditionStatus};

use kube::{Resource, ResourceExt};

use crate::{DEFAULT_CLASS_ANNOTATION_VALUE, DEFAULT_PORT};

/// Schema default for instance ports
fn default_port() -> i32 {
    DEFAULT_PORT
}

/// A class kind whose objects may be marked as the family default
pub trait DefaultClass: Resource<DynamicType = ()> + Sized {
    /// Reserved annotation key marking an object of this kind as default
    const DEFAULT_ANNOTATION: &'static str;

    /// Whether this object carries the default annotation set to exactly `"true"`
    fn is_default_class(&self) -> bool {
        self.annotations()
            .get(Self::DEFAULT_ANNOTATION)
            .is_some_and(|v| v == DEFAULT_CLASS_ANNOTATION_VALUE)
    }
}

impl DefaultClass for AiGatewayClass {
    const DEFAULT_ANNOTATION: &'static str = crate::AI_GATEWAY_DEFAULT_CLASS_ANNOTATION;
}

impl DefaultClass for ModelRouterClass {
    const DEFAULT_ANNOTATION: &'static str = crate::MODEL_ROUTER_DEFAULT_CLASS_ANNOTATION;
}
