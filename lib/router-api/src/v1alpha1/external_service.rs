use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ExternalService describes a service that lives outside the mesh
/// (a SaaS API, a legacy VM fleet, a CIDR range) so it can be routed to
/// like any in-mesh service
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "router.datum.net",
    version = "v1alpha1",
    kind = "ExternalService",
    plural = "externalservices",
    namespaced,
    derive = "Default",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Discovery","type":"string","jsonPath":".spec.discovery"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ExternalServiceSpec {
    /// Hostnames, IP addresses or CIDR blocks served by this external service
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Ports exposed by the external service
    #[serde(default)]
    pub ports: Vec<PortSpec>,

    /// How endpoint addresses are obtained
    #[serde(default)]
    pub discovery: Discovery,

    /// Explicit endpoints; when empty and discovery is DNS the hosts are used
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<ExternalEndpoint>,
}

/// A named port declared on an external service
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PortSpec {
    /// Port name, unique within the service
    pub name: String,

    /// Port number
    pub number: u32,

    /// Protocol name: HTTP, HTTPS, HTTP2, GRPC, TCP, TLS, UDP, MONGO, REDIS, MYSQL
    #[serde(default)]
    pub protocol: String,
}

/// Endpoint discovery mode for an external service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Discovery {
    /// Traffic is forwarded to the address the client asked for
    #[default]
    None,
    /// Endpoints are resolved through DNS
    Dns,
    /// Endpoints are listed explicitly
    Static,
    /// Any value this version does not know about
    #[serde(other)]
    Unrecognized,
}

/// An explicitly declared endpoint of an external service
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExternalEndpoint {
    /// IP address or hostname of the endpoint
    pub address: String,

    /// Per-port overrides keyed by port name (0 keeps the declared port)
    #[serde(default)]
    pub ports: BTreeMap<String, u32>,

    /// Labels attached to instances built from this endpoint
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ExternalEndpoint {
    /// Port override for the given port name, if one is declared
    pub fn port_override(&self, port_name: &str) -> Option<u32> {
        self.ports.get(port_name).copied()
    }
}
