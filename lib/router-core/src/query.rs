//! Lookups over converted service instances

use crate::{Labels, ServiceInstance};
use std::collections::HashSet;

/// Instances of `hostname`, restricted to `port_names` (empty means every port)
/// and to instances whose labels match at least one of `selectors`
/// (empty means no label restriction)
pub fn instances_for<'a>(
    instances: &'a [ServiceInstance],
    hostname: &str,
    port_names: &[&str],
    selectors: &[Labels],
) -> Vec<&'a ServiceInstance> {
    instances
        .iter()
        .filter(|i| i.service.hostname == hostname)
        .filter(|i| {
            port_names.is_empty() || port_names.contains(&i.endpoint.service_port.name.as_str())
        })
        .filter(|i| selectors.is_empty() || selectors.iter().any(|s| s.is_subset_of(&i.labels)))
        .collect()
}

/// Instances whose endpoint address is one of `addresses`
pub fn host_instances<'a>(
    instances: &'a [ServiceInstance],
    addresses: &HashSet<String>,
) -> Vec<&'a ServiceInstance> {
    instances
        .iter()
        .filter(|i| addresses.contains(&i.endpoint.address))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert_instances;
    use router_api::{Discovery, ExternalEndpoint, ExternalServiceSpec, PortSpec};
    use std::collections::BTreeMap;

    fn sample() -> Vec<ServiceInstance> {
        let labels = |env: &str| BTreeMap::from([("env".to_string(), env.to_string())]);
        let spec = ExternalServiceSpec {
            hosts: vec!["db.example.com".to_string(), "cache.example.com".to_string()],
            ports: vec![
                PortSpec {
                    name: "mysql".to_string(),
                    number: 3306,
                    protocol: "MYSQL".to_string(),
                },
                PortSpec {
                    name: "metrics".to_string(),
                    number: 9104,
                    protocol: "HTTP".to_string(),
                },
            ],
            discovery: Discovery::Static,
            endpoints: vec![
                ExternalEndpoint {
                    address: "10.0.0.1".to_string(),
                    ports: BTreeMap::new(),
                    labels: labels("prod"),
                },
                ExternalEndpoint {
                    address: "10.0.0.2".to_string(),
                    ports: BTreeMap::new(),
                    labels: labels("staging"),
                },
            ],
        };
        convert_instances(&spec)
    }

    #[test]
    fn test_instances_for_hostname() {
        let instances = sample();
        assert_eq!(instances.len(), 8);

        let db = instances_for(&instances, "db.example.com", &[], &[]);
        assert_eq!(db.len(), 4);
        assert!(db.iter().all(|i| i.service.hostname == "db.example.com"));

        assert!(instances_for(&instances, "unknown.example.com", &[], &[]).is_empty());
    }

    #[test]
    fn test_instances_for_ports() {
        let instances = sample();
        let mysql = instances_for(&instances, "db.example.com", &["mysql"], &[]);
        assert_eq!(mysql.len(), 2);
        assert!(mysql.iter().all(|i| i.endpoint.port == 3306));
    }

    #[test]
    fn test_instances_for_labels() {
        let instances = sample();
        let prod: Labels = [("env", "prod")].into_iter().collect();
        let staging: Labels = [("env", "staging")].into_iter().collect();
        let dev: Labels = [("env", "dev")].into_iter().collect();

        let matched = instances_for(&instances, "cache.example.com", &["metrics"], &[prod.clone()]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].endpoint.address, "10.0.0.1");

        let either = instances_for(&instances, "cache.example.com", &[], &[prod, staging]);
        assert_eq!(either.len(), 4);

        assert!(instances_for(&instances, "cache.example.com", &[], &[dev]).is_empty());
    }

    #[test]
    fn test_host_instances() {
        let instances = sample();
        let addresses = HashSet::from(["10.0.0.2".to_string()]);

        let found = host_instances(&instances, &addresses);
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|i| i.labels.get("env") == Some("staging")));

        assert!(host_instances(&instances, &HashSet::new()).is_empty());
    }
}
