//! Network endpoint of a service instance
use crate::Port;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkEndpoint {
    pub address: String,
    pub port: u16,
    /// The service port this endpoint realizes
    pub service_port: Port,
}
