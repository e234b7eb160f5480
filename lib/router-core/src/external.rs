//! Conversion of ExternalService descriptors into the internal service model
//!
//! Every operation here is total: unknown protocols, unparsable addresses and
//! zero port overrides resolve to a fallback instead of an error.

use crate::{
    AuthenticationPolicy, DefaultProtocolParser, Labels, NetworkEndpoint, Port, PortList,
    ProtocolParser, Resolution, Service, ServiceInstance,
};
use ipnetwork::IpNetwork;
use router_api::{Discovery, ExternalEndpoint, ExternalServiceSpec, PortSpec};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Converts external service descriptors using an injected protocol table
#[derive(Clone, Debug, Default)]
pub struct ExternalServiceConverter<P = DefaultProtocolParser> {
    protocols: P,
}

impl<P: ProtocolParser> ExternalServiceConverter<P> {
    pub fn new(protocols: P) -> Self {
        Self { protocols }
    }

    /// Convert one declared port
    pub fn convert_port(&self, spec: &PortSpec) -> Port {
        Port {
            name: spec.name.clone(),
            // Declared numbers are assumed to be in range
            port: spec.number as u16,
            protocol: self.protocols.parse(&spec.protocol),
            authentication_policy: AuthenticationPolicy::None,
        }
    }

    /// Expand a descriptor into one service per host, in host order
    pub fn convert_services(&self, spec: &ExternalServiceSpec) -> Vec<Arc<Service>> {
        let resolution = resolution_for(spec.discovery);
        let ports: PortList = spec.ports.iter().map(|p| self.convert_port(p)).collect();

        let services: Vec<Arc<Service>> = spec
            .hosts
            .iter()
            .map(|host| {
                let (hostname, address) = classify_host(host);
                Arc::new(Service {
                    mesh_external: true,
                    hostname,
                    address,
                    ports: ports.clone(),
                    resolution,
                })
            })
            .collect();

        debug!(
            "Expanded external service into {} services with {} ports ({:?})",
            services.len(),
            ports.len(),
            resolution
        );
        services
    }

    /// Build the instance of `service` on `service_port` for an explicit endpoint
    pub fn convert_endpoint(
        &self,
        service: &Arc<Service>,
        service_port: &PortSpec,
        endpoint: &ExternalEndpoint,
    ) -> ServiceInstance {
        // A zero override means "not set"
        let port = match endpoint.port_override(&service_port.name) {
            Some(number) if number != 0 => number,
            _ => service_port.number,
        };

        ServiceInstance {
            endpoint: NetworkEndpoint {
                address: endpoint.address.clone(),
                port: port as u16,
                service_port: self.convert_port(service_port),
            },
            service: Arc::clone(service),
            labels: Labels::from(endpoint.labels.clone()),
        }
    }

    /// All instances implied by a descriptor.
    ///
    /// Ordered by service (host order), then port (declaration order), then
    /// synthesized DNS instances, then explicit endpoints.
    pub fn convert_instances(&self, spec: &ExternalServiceSpec) -> Vec<ServiceInstance> {
        let services = self.convert_services(spec);
        self.instances_of(spec, &services)
    }

    /// Services and instances of a descriptor from a single expansion, so every
    /// instance shares its `Service` with the returned service list
    pub fn convert(&self, spec: &ExternalServiceSpec) -> (Vec<Arc<Service>>, Vec<ServiceInstance>) {
        let services = self.convert_services(spec);
        let instances = self.instances_of(spec, &services);
        (services, instances)
    }

    /// Instances of already expanded `services`, in the order of [`Self::convert_instances`]
    fn instances_of(
        &self,
        spec: &ExternalServiceSpec,
        services: &[Arc<Service>],
    ) -> Vec<ServiceInstance> {
        let synthesize = spec.endpoints.is_empty() && spec.discovery == Discovery::Dns;

        let mut out = Vec::new();
        for service in services {
            for service_port in &spec.ports {
                if synthesize {
                    self.synthesize_dns_instances(&mut out, spec, service, service_port);
                }
                for endpoint in &spec.endpoints {
                    out.push(self.convert_endpoint(service, service_port, endpoint));
                }
            }
        }
        out
    }

    /// Emit one instance per descriptor host for a DNS service without endpoints.
    ///
    /// Runs once per (service, port) pair and walks every host each time, so a
    /// descriptor yields hosts * ports * hosts instances on this path.
    fn synthesize_dns_instances(
        &self,
        out: &mut Vec<ServiceInstance>,
        spec: &ExternalServiceSpec,
        service: &Arc<Service>,
        service_port: &PortSpec,
    ) {
        debug!(
            "Synthesizing DNS endpoints for {} port {} from {} hosts",
            service.hostname,
            service_port.name,
            spec.hosts.len()
        );

        // TODO: hoist this walk out of the per-service loop once consumers no
        // longer depend on the repeated instances
        for host in &spec.hosts {
            out.push(ServiceInstance {
                endpoint: NetworkEndpoint {
                    address: host.clone(),
                    port: service_port.number as u16,
                    service_port: self.convert_port(service_port),
                },
                service: Arc::clone(service),
                labels: Labels::new(),
            });
        }
    }
}

/// Resolution mode for a discovery mode
pub fn resolution_for(discovery: Discovery) -> Resolution {
    match discovery {
        Discovery::None => Resolution::Passthrough,
        Discovery::Dns => Resolution::DnsLoadBalancing,
        Discovery::Static => Resolution::ClientSideLoadBalancing,
        Discovery::Unrecognized => Resolution::default(),
    }
}

/// Split a host token into (hostname, address).
///
/// Literal IPs and CIDR blocks keep the token as the address and get a
/// hostname with `/` replaced by `_` so it is safe in metric names.
/// Anything else is treated as a DNS name.
fn classify_host(host: &str) -> (String, Option<String>) {
    if is_cidr(host) || host.parse::<IpAddr>().is_ok() {
        (host.replace('/', "_"), Some(host.to_string()))
    } else {
        (host.to_string(), None)
    }
}

fn is_cidr(host: &str) -> bool {
    // IpNetwork also accepts bare addresses and signed prefixes; a CIDR needs
    // a "/" followed by decimal digits only
    match host.split_once('/') {
        Some((_, prefix)) if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) => {
            host.parse::<IpNetwork>().is_ok()
        }
        _ => false,
    }
}

/// Convert one declared port with the built-in protocol table
pub fn convert_port(spec: &PortSpec) -> Port {
    ExternalServiceConverter::<DefaultProtocolParser>::default().convert_port(spec)
}

/// Expand a descriptor into one service per host with the built-in protocol table
pub fn convert_services(spec: &ExternalServiceSpec) -> Vec<Arc<Service>> {
    ExternalServiceConverter::<DefaultProtocolParser>::default().convert_services(spec)
}

/// Build an instance for an explicit endpoint with the built-in protocol table
pub fn convert_endpoint(
    service: &Arc<Service>,
    service_port: &PortSpec,
    endpoint: &ExternalEndpoint,
) -> ServiceInstance {
    ExternalServiceConverter::<DefaultProtocolParser>::default()
        .convert_endpoint(service, service_port, endpoint)
}

/// All instances implied by a descriptor, using the built-in protocol table
pub fn convert_instances(spec: &ExternalServiceSpec) -> Vec<ServiceInstance> {
    ExternalServiceConverter::<DefaultProtocolParser>::default().convert_instances(spec)
}

/// Services and the instances that share them, using the built-in protocol table
pub fn convert_external_service(
    spec: &ExternalServiceSpec,
) -> (Vec<Arc<Service>>, Vec<ServiceInstance>) {
    ExternalServiceConverter::<DefaultProtocolParser>::default().convert(spec)
}
