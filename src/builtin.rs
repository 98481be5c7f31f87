//! Argument schemas of the stock architecture patterns.
//!
//! Only the argument shapes live here; what each pattern does with its
//! arguments belongs to the host that runs it.

use crate::descriptor::Descriptor;
use crate::error::ShapeMismatch;
use crate::impl_from_value_for_schema;
use crate::pattern::{PatternRegistry, RegistryError};
use crate::schema;
use crate::value::{Schema, StructValue};

pub const SAGA: &str = "saga";
pub const LAYERED: &str = "layered";
pub const REVERSE_PROXY: &str = "reverse-proxy";
pub const SERVICE_REGISTRY: &str = "service-registry";

// ————————————————————————————————————————————————————————————————————————————
// SAGA
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaStep {
    pub service: String,
    pub command: String,
    pub on_error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaArguments {
    pub orchestrator: String,
    pub item: Vec<SagaStep>,
}

impl Schema for SagaStep {
    fn descriptor() -> Descriptor {
        schema!(ArgumentActionItem {
            "service": Descriptor::string(),
            "command": Descriptor::string(),
            "onError": Descriptor::string(),
        })
    }
    fn from_fields(mut fields: StructValue) -> Result<Self, ShapeMismatch> {
        Ok(Self {
            service: fields.take("service")?,
            command: fields.take("command")?,
            on_error: fields.take("onError")?,
        })
    }
}

impl Schema for SagaArguments {
    fn descriptor() -> Descriptor {
        schema!(SagaArguments {
            "orchestrator": Descriptor::string(),
            "item": Descriptor::list(SagaStep::descriptor()),
        })
    }
    fn from_fields(mut fields: StructValue) -> Result<Self, ShapeMismatch> {
        Ok(Self { orchestrator: fields.take("orchestrator")?, item: fields.take("item")? })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LAYERED
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    /// Comma separated element identifiers.
    pub elements: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredArguments {
    pub layer: Vec<Layer>,
}

impl Schema for Layer {
    fn descriptor() -> Descriptor {
        schema!(LayerArgument {
            "name": Descriptor::string(),
            "elements": Descriptor::string(),
        })
    }
    fn from_fields(mut fields: StructValue) -> Result<Self, ShapeMismatch> {
        Ok(Self { name: fields.take("name")?, elements: fields.take("elements")? })
    }
}

impl Schema for LayeredArguments {
    fn descriptor() -> Descriptor {
        schema!(LayeredArguments { "layer": Descriptor::list(Layer::descriptor()) })
    }
    fn from_fields(mut fields: StructValue) -> Result<Self, ShapeMismatch> {
        Ok(Self { layer: fields.take("layer")? })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// REVERSE PROXY / SERVICE REGISTRY
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseProxyArguments {
    pub target: String,
}

impl Schema for ReverseProxyArguments {
    fn descriptor() -> Descriptor {
        schema!(ReverseProxyArguments { "target": Descriptor::string() })
    }
    fn from_fields(mut fields: StructValue) -> Result<Self, ShapeMismatch> {
        Ok(Self { target: fields.take("target")? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryQuery {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistryArguments {
    pub registry: String,
    pub connected_services: String,
    pub query: Vec<RegistryQuery>,
}

impl Schema for RegistryQuery {
    fn descriptor() -> Descriptor {
        schema!(ArgumentQueryItem {
            "source": Descriptor::string(),
            "destination": Descriptor::string(),
        })
    }
    fn from_fields(mut fields: StructValue) -> Result<Self, ShapeMismatch> {
        Ok(Self { source: fields.take("source")?, destination: fields.take("destination")? })
    }
}

impl Schema for ServiceRegistryArguments {
    fn descriptor() -> Descriptor {
        schema!(ServiceRegistryArguments {
            "registry": Descriptor::string(),
            "connectedServices": Descriptor::string(),
            "query": Descriptor::list(RegistryQuery::descriptor()),
        })
    }
    fn from_fields(mut fields: StructValue) -> Result<Self, ShapeMismatch> {
        Ok(Self {
            registry: fields.take("registry")?,
            connected_services: fields.take("connectedServices")?,
            query: fields.take("query")?,
        })
    }
}

impl_from_value_for_schema!(SagaStep, Layer, RegistryQuery);

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

/// Registry holding every stock pattern schema.
pub fn registry() -> Result<PatternRegistry, RegistryError> {
    PatternRegistry::new()
        .register_schema(
            SAGA,
            SagaArguments::descriptor(),
            Some("Orchestrated saga: the orchestrator calls each item's service with its command, and its onError command in reverse order on failure."),
        )?
        .register_schema(
            LAYERED,
            LayeredArguments::descriptor(),
            Some("Layered architecture: each layer may only use elements of the layer directly below it."),
        )?
        .register_schema(
            REVERSE_PROXY,
            ReverseProxyArguments::descriptor(),
            Some("Routes every relationship to the target through a generated reverse proxy."),
        )?
        .register_schema(SERVICE_REGISTRY, ServiceRegistryArguments::descriptor(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ParserFactory;
    use crate::lookup::params;

    #[test]
    fn all_stock_schemas_compile() {
        let registry = registry().unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, [SAGA, LAYERED, REVERSE_PROXY, SERVICE_REGISTRY]);
    }

    #[test]
    fn binds_typed_saga() {
        let p = params([
            ("orchestrator", "orders"),
            ("item.0.service", "payments"),
            ("item.0.command", "charge"),
            ("item.0.onError", "refund"),
            ("item.1.service", "stock"),
            ("item.1.command", "reserve"),
            ("item.1.onError", "release"),
        ]);
        let args: SagaArguments = ParserFactory::new().bind(&p).unwrap();
        assert_eq!(args.orchestrator, "orders");
        assert_eq!(args.item.len(), 2);
        assert_eq!(args.item[1], SagaStep {
            service: "stock".into(),
            command: "reserve".into(),
            on_error: "release".into(),
        });
    }

    #[test]
    fn saga_step_missing_on_error_is_incomplete() {
        let p = params([
            ("orchestrator", "orders"),
            ("item.0.service", "payments"),
            ("item.0.command", "charge"),
        ]);
        let err = ParserFactory::new().bind::<SagaArguments>(&p).unwrap_err();
        assert_eq!(err.to_string(), "error raised during parse: required field 'onError' for 'item.0' not specified");
    }

    #[test]
    fn service_registry_params_shape() {
        let info = registry().unwrap().info(SERVICE_REGISTRY).unwrap();
        assert_eq!(
            serde_json::to_value(&info.params).unwrap(),
            serde_json::json!([
                {"name": "registry", "optional": false},
                {"name": "connectedServices", "optional": false},
                {"name": "query", "fields": [
                    {"name": "source", "optional": false},
                    {"name": "destination", "optional": false},
                ]},
            ])
        );
        assert_eq!(info.docs, "");
    }
}
