//! Internal service model consumed by routing and config generation

use crate::{NetworkEndpoint, Protocol};
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

/// Authentication policy applied to a service port.
///
/// External services never carry a per-port policy, so `None` is the only value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AuthenticationPolicy {
    #[default]
    None,
}

/// A named port exposed by a service
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Port {
    pub name: String,
    pub port: u16,
    pub protocol: Protocol,
    pub authentication_policy: AuthenticationPolicy,
}

/// Ordered, read-only list of ports shared by every service built from one descriptor
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortList(Arc<[Port]>);

impl PortList {
    /// Look up a port by name
    pub fn get(&self, name: &str) -> Option<&Port> {
        self.0.iter().find(|p| p.name == name)
    }

    /// Whether both lists share the same allocation
    pub fn ptr_eq(&self, other: &PortList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for PortList {
    type Target = [Port];

    fn deref(&self) -> &[Port] {
        &self.0
    }
}

impl From<Vec<Port>> for PortList {
    fn from(ports: Vec<Port>) -> Self {
        Self(ports.into())
    }
}

impl FromIterator<Port> for PortList {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How the instances of a service are resolved at request time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The proxy load-balances across the known instance addresses
    #[default]
    ClientSideLoadBalancing,
    /// The proxy resolves the hostname through DNS and balances across the answers
    DnsLoadBalancing,
    /// Traffic goes to the destination address requested by the caller
    Passthrough,
}

/// A logical service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Service {
    /// Defined outside the mesh
    pub mesh_external: bool,
    /// DNS name, or a metrics-safe label derived from a literal address
    pub hostname: String,
    /// Routable literal IP or CIDR, set only when the host itself is one
    pub address: Option<String>,
    pub ports: PortList,
    pub resolution: Resolution,
}

impl Service {
    /// Look up one of the service's ports by name
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }
}

/// Key/value labels attached to a service instance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// True when every label in `self` is present with the same value in `other`.
    /// An empty set is a subset of anything.
    pub fn is_subset_of(&self, other: &Labels) -> bool {
        self.0
            .iter()
            .all(|(k, v)| other.0.get(k).is_some_and(|ov| ov == v))
    }
}

impl From<BTreeMap<String, String>> for Labels {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One routable realization of a service port
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceInstance {
    pub endpoint: NetworkEndpoint,
    pub service: Arc<Service>,
    pub labels: Labels,
}
