//! Loading ExternalService manifests from disk

use crate::{CoreError, Result};
use router_api::ExternalService;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

const EXTERNAL_SERVICE_KIND: &str = "ExternalService";

/// Parse a YAML stream of one or more `ExternalService` documents.
///
/// Empty documents are ignored and documents of any other kind are skipped.
pub fn parse_external_services(manifest: &str) -> Result<Vec<ExternalService>> {
    let mut services = Vec::new();

    for document in serde_yaml::Deserializer::from_str(manifest) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }

        match value.get("kind").and_then(|k| k.as_str()) {
            Some(EXTERNAL_SERVICE_KIND) | None => {}
            Some(other) => {
                warn!("Skipping manifest of kind {}", other);
                continue;
            }
        }

        services.push(serde_yaml::from_value(value)?);
    }

    Ok(services)
}

/// Parse a JSON array of `ExternalService` objects
pub fn parse_external_services_json(manifest: &str) -> Result<Vec<ExternalService>> {
    Ok(serde_json::from_str(manifest)?)
}

/// Load ExternalService manifests from a `.json` or YAML file
pub fn load_external_services(path: impl AsRef<Path>) -> Result<Vec<ExternalService>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let services = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_external_services_json(&contents)?,
        _ => parse_external_services(&contents)?,
    };

    debug!("Loaded {} external services from {}", services.len(), path.display());
    Ok(services)
}
