//! Resource Type Registry - Load the human name to provider type map
//!
//! The map is embedded in the binary as JSON and parsed once on first access.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource type map (compiled into the binary)
const RESOURCE_TYPES_FILE: &str = include_str!("../resources/resource_types.json");

/// Root structure of resources/resource_types.json
#[derive(Debug, Clone, Deserialize)]
struct ResourceTypeMap {
    /// Lower-case plural name -> provider type id
    #[serde(default)]
    resource_types: HashMap<String, String>,
}

static REGISTRY: OnceLock<ResourceTypeMap> = OnceLock::new();

/// Get the resource type map (loads from embedded JSON on first access)
fn get_registry() -> &'static ResourceTypeMap {
    REGISTRY.get_or_init(|| {
        serde_json::from_str(RESOURCE_TYPES_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded resource type JSON: {}", e))
    })
}

/// Look up the provider type for a human-readable, lower-case plural name
pub fn provider_type(name: &str) -> Option<&'static str> {
    get_registry()
        .resource_types
        .get(name)
        .map(|s| s.as_str())
}

/// All known human-readable names, sorted (for help output)
pub fn known_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = get_registry()
        .resource_types
        .keys()
        .map(|s| s.as_str())
        .collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        assert!(!get_registry().resource_types.is_empty());
    }

    #[test]
    fn test_web_app_aliases() {
        for name in ["web apps", "webapps", "app services"] {
            assert_eq!(provider_type(name), Some("Microsoft.Web/sites"));
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(provider_type("Virtual Machines"), None);
        assert_eq!(provider_type("virtual machine"), None);
        assert_eq!(
            provider_type("virtual machines"),
            Some("Microsoft.Compute/virtualMachines")
        );
    }

    #[test]
    fn test_known_names_sorted() {
        let names = known_names();
        assert_eq!(names.len(), 14);
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }
}
