//! Datum Router API types and CRDs for Kubernetes integration
//!
//! This library defines the custom resources consumed by the router control plane:
//! - ExternalService: Services outside the mesh (hostnames, IPs or CIDR ranges)
//!   with their ports, discovery mode and optional explicit endpoints

pub mod v1alpha1;

pub use v1alpha1::{Discovery, ExternalEndpoint, ExternalService, ExternalServiceSpec, PortSpec};
