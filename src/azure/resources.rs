//! Azure Resources
//!
//! Functions for listing resource groups and resources, and for reading
//! App Service state.

use super::client::{AzureClient, RESOURCES_API_VERSION, WEB_API_VERSION};
use anyhow::{Context, Result};
use serde_json::Value;

/// Provider type of App Service web apps
pub const WEB_SITES_TYPE: &str = "Microsoft.Web/sites";

/// Resource group information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    pub name: String,
    pub location: String,
}

impl ResourceGroup {
    pub fn new(name: &str, location: &str) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
        }
    }
}

impl From<&Value> for ResourceGroup {
    fn from(value: &Value) -> Self {
        Self {
            name: str_field(value, "name"),
            location: str_field(value, "location"),
        }
    }
}

/// Generic ARM resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Hierarchical id, `/subscriptions/{sub}/resourceGroups/{rg}/providers/...`
    pub id: String,
    pub name: String,
    pub resource_type: String,
    pub location: String,
}

impl Resource {
    pub fn new(id: &str, name: &str, resource_type: &str, location: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            location: location.to_string(),
        }
    }

    /// Name of the owning resource group, taken from the id
    pub fn resource_group(&self) -> Option<&str> {
        let mut segments = self.id.split('/');
        segments
            .by_ref()
            .find(|s| s.eq_ignore_ascii_case("resourceGroups"))?;
        segments.next().filter(|s| !s.is_empty())
    }
}

impl From<&Value> for Resource {
    fn from(value: &Value) -> Self {
        Self {
            id: str_field(value, "id"),
            name: str_field(value, "name"),
            resource_type: str_field(value, "type"),
            location: str_field(value, "location"),
        }
    }
}

/// App Service site, reduced to what status checks need
#[derive(Debug, Clone)]
pub struct WebApp {
    pub state: String,
}

impl From<&Value> for WebApp {
    fn from(value: &Value) -> Self {
        Self {
            state: value
                .get("properties")
                .and_then(|p| p.get("state"))
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_string(),
        }
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("-")
        .to_string()
}

fn value_items<T>(response: &Value) -> Vec<T>
where
    T: for<'a> From<&'a Value>,
{
    response
        .get("value")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().map(T::from).collect())
        .unwrap_or_default()
}

/// List all resource groups in the subscription (first page only)
pub async fn list_resource_groups(client: &AzureClient) -> Result<Vec<ResourceGroup>> {
    let url = client.subscription_url("resourcegroups", RESOURCES_API_VERSION);
    let response = client
        .get(&url)
        .await
        .context("Failed to list resource groups")?;
    Ok(value_items(&response))
}

/// List all resources in the subscription (first page only)
pub async fn list_resources(client: &AzureClient) -> Result<Vec<Resource>> {
    let url = client.subscription_url("resources", RESOURCES_API_VERSION);
    let response = client
        .get(&url)
        .await
        .context("Failed to list resources")?;
    Ok(value_items(&response))
}

/// Fetch a single web app
pub async fn get_web_app(client: &AzureClient, resource_group: &str, name: &str) -> Result<WebApp> {
    let url = client.provider_url(
        resource_group,
        &format!("{}/{}", WEB_SITES_TYPE, urlencoding::encode(name)),
        WEB_API_VERSION,
    );
    let response = client
        .get(&url)
        .await
        .with_context(|| format!("Failed to get web app {}", name))?;
    Ok(WebApp::from(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_from_json() {
        let value = json!({
            "id": "/subscriptions/s/resourceGroups/rg-web/providers/Microsoft.Web/sites/shop",
            "name": "shop",
            "type": "Microsoft.Web/sites",
            "location": "westeurope",
            "kind": "app"
        });
        let resource = Resource::from(&value);
        assert_eq!(resource.name, "shop");
        assert_eq!(resource.resource_type, WEB_SITES_TYPE);
        assert_eq!(resource.resource_group(), Some("rg-web"));
    }

    #[test]
    fn test_missing_fields_default_to_dash() {
        let group = ResourceGroup::from(&json!({ "name": "rg" }));
        assert_eq!(group.location, "-");
    }

    #[test]
    fn test_resource_group_segment_is_case_insensitive() {
        let resource = Resource::new(
            "/subscriptions/s/resourcegroups/lower/providers/Microsoft.Storage/storageAccounts/st",
            "st",
            "Microsoft.Storage/storageAccounts",
            "eastus",
        );
        assert_eq!(resource.resource_group(), Some("lower"));
    }

    #[test]
    fn test_resource_group_missing() {
        let resource = Resource::new("/subscriptions/s", "x", "t", "l");
        assert_eq!(resource.resource_group(), None);
        let resource = Resource::new("/subscriptions/s/resourceGroups/", "x", "t", "l");
        assert_eq!(resource.resource_group(), None);
    }

    #[test]
    fn test_web_app_state() {
        let app = WebApp::from(&json!({ "name": "shop", "properties": { "state": "Stopped" } }));
        assert_eq!(app.state, "Stopped");
        let app = WebApp::from(&json!({ "name": "shop" }));
        assert_eq!(app.state, "Unknown");
    }

    #[test]
    fn test_value_items_without_value_is_empty() {
        let items: Vec<ResourceGroup> = value_items(&json!({}));
        assert!(items.is_empty());
    }
}
