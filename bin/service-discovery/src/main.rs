use anyhow::Result;
use router_api::ExternalService;
use router_core::{convert_external_service, load_external_services, Service, ServiceInstance};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting service-discovery daemon...");

    let config = Config::from_env()?;
    info!(
        "Watching {} every {:?}",
        config.manifest_path.display(),
        config.interval
    );

    let mut ticker = tokio::time::interval(config.interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match discover_services(&config.manifest_path) {
                    Ok(snapshot) => {
                        info!(
                            "Converted {} external services into {} services and {} instances",
                            snapshot.descriptors,
                            snapshot.services.len(),
                            snapshot.instances.len()
                        );
                    }
                    Err(e) => {
                        error!("Error discovering services: {}", e);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, exiting...");
                return Ok(());
            }
        }
    }
}

/// Result of one conversion pass over the manifest file
#[derive(Debug, Default)]
struct Snapshot {
    descriptors: usize,
    services: Vec<Arc<Service>>,
    instances: Vec<ServiceInstance>,
}

fn discover_services(path: &Path) -> Result<Snapshot> {
    let external_services = load_external_services(path)?;
    Ok(convert_all(&external_services))
}

fn convert_all(external_services: &[ExternalService]) -> Snapshot {
    let mut snapshot = Snapshot {
        descriptors: external_services.len(),
        ..Default::default()
    };

    for external in external_services {
        let name = external.metadata.name.as_deref().unwrap_or("unknown");
        let namespace = external.metadata.namespace.as_deref().unwrap_or("default");

        let (services, instances) = convert_external_service(&external.spec);
        debug!(
            "ExternalService {}/{} has {} services and {} instances",
            namespace,
            name,
            services.len(),
            instances.len()
        );

        for instance in &instances {
            debug!(
                "  {} -> {}:{} ({})",
                instance.service.hostname,
                instance.endpoint.address,
                instance.endpoint.port,
                instance.endpoint.service_port.protocol
            );
        }

        snapshot.services.extend(services);
        snapshot.instances.extend(instances);
    }

    snapshot
}
