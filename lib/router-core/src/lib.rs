//! Core service model and external service conversion
//!
//! This library provides:
//! - The internal service model (services, ports, instances) used by routing
//! - Conversion of ExternalService descriptors into that model
//! - Lookups over converted instances
//! - Loading of ExternalService manifests

pub mod endpoint;
pub mod error;
pub mod external;
pub mod loader;
pub mod model;
pub mod protocol;
pub mod query;

pub use endpoint::NetworkEndpoint;
pub use error::{CoreError, Result};
pub use external::{
    convert_endpoint, convert_external_service, convert_instances, convert_port, convert_services,
    ExternalServiceConverter,
};
pub use loader::load_external_services;
pub use model::{AuthenticationPolicy, Labels, Port, PortList, Resolution, Service, ServiceInstance};
pub use protocol::{DefaultProtocolParser, Protocol, ProtocolParser};
