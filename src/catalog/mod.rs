//! Resource catalog
//!
//! Holds the resource groups and resources fetched once at startup and
//! answers list, filter and status questions against that snapshot.
//!
//! The resource type registry maps human-readable type names to provider types.

mod registry;

pub use registry::{known_names, provider_type};

use crate::azure::client::AzureClient;
use crate::azure::resources::{self, Resource, ResourceGroup, WEB_SITES_TYPE};
use anyhow::{Context, Result};
use std::fmt::Write;

/// Immutable view of the subscription taken at startup
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub resource_groups: Vec<ResourceGroup>,
    pub resources: Vec<Resource>,
}

impl CatalogSnapshot {
    pub fn new(resource_groups: Vec<ResourceGroup>, resources: Vec<Resource>) -> Self {
        Self {
            resource_groups,
            resources,
        }
    }

    /// Fetch resource groups and resources from Resource Manager
    pub async fn load(client: &AzureClient) -> Result<Self> {
        let resource_groups = resources::list_resource_groups(client).await?;
        let resources = resources::list_resources(client).await?;

        tracing::info!(
            "Loaded {} resource groups and {} resources",
            resource_groups.len(),
            resources.len()
        );

        Ok(Self::new(resource_groups, resources))
    }
}

/// Read-only accessor over a [`CatalogSnapshot`]
#[derive(Debug, Clone)]
pub struct Catalog {
    snapshot: CatalogSnapshot,
}

impl Catalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn resource_groups(&self) -> &[ResourceGroup] {
        &self.snapshot.resource_groups
    }

    pub fn resources(&self) -> &[Resource] {
        &self.snapshot.resources
    }

    /// Resources whose provider type equals `type_id` exactly, in snapshot order
    pub fn list_resources_of_type(&self, type_id: &str) -> Vec<&Resource> {
        self.snapshot
            .resources
            .iter()
            .filter(|r| r.resource_type == type_id)
            .collect()
    }

    /// First resource named `name` (case-insensitive), optionally restricted to a provider type
    pub fn find_resource(&self, name: &str, provider_type: Option<&str>) -> Option<&Resource> {
        let name = name.to_lowercase();
        self.snapshot.resources.iter().find(|r| {
            r.name.to_lowercase() == name && provider_type.map_or(true, |t| r.resource_type == t)
        })
    }

    /// Numbered listing of every resource group
    pub fn format_resource_groups(&self) -> String {
        let mut out = String::new();
        for (i, rg) in self.snapshot.resource_groups.iter().enumerate() {
            let _ = writeln!(out, "{}. Name: {}, Location: {}", i + 1, rg.name, rg.location);
        }
        out
    }

    /// Status line for a single resource
    ///
    /// Only App Service sites expose a state; other types get an explicit
    /// "not supported" answer instead of a lookup.
    pub async fn get_status(&self, client: &AzureClient, resource: &Resource) -> Result<String> {
        if resource.resource_type != WEB_SITES_TYPE {
            tracing::debug!("No status lookup for type {}", resource.resource_type);
            return Ok(format!(
                "Status lookup is not supported for resources of type {}",
                resource.resource_type
            ));
        }

        let resource_group = resource
            .resource_group()
            .with_context(|| format!("No resource group in resource id {}", resource.id))?;

        let web_app = resources::get_web_app(client, resource_group, &resource.name).await?;
        Ok(format!("Status: {}", web_app.state))
    }
}

/// Numbered listing of name, type and location for each resource
pub fn format_resources<'a, I>(list: I) -> String
where
    I: IntoIterator<Item = &'a Resource>,
{
    let mut out = String::new();
    for (i, r) in list.into_iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. Name: {}, Type: {}, Location: {}",
            i + 1,
            r.name,
            r.resource_type,
            r.location
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(CatalogSnapshot::new(
            vec![
                ResourceGroup::new("rg-web", "westeurope"),
                ResourceGroup::new("rg-data", "northeurope"),
            ],
            vec![
                Resource::new(
                    "/subscriptions/s/resourceGroups/rg-web/providers/Microsoft.Web/sites/shop",
                    "shop",
                    "Microsoft.Web/sites",
                    "westeurope",
                ),
                Resource::new(
                    "/subscriptions/s/resourceGroups/rg-data/providers/Microsoft.Storage/storageAccounts/shopdata",
                    "shopdata",
                    "Microsoft.Storage/storageAccounts",
                    "northeurope",
                ),
                Resource::new(
                    "/subscriptions/s/resourceGroups/rg-web/providers/Microsoft.Web/sites/blog",
                    "Blog",
                    "Microsoft.Web/sites",
                    "westeurope",
                ),
            ],
        ))
    }

    #[test]
    fn test_format_resource_groups() {
        assert_eq!(
            sample().format_resource_groups(),
            "1. Name: rg-web, Location: westeurope\n2. Name: rg-data, Location: northeurope\n"
        );
    }

    #[test]
    fn test_format_empty() {
        let catalog = Catalog::new(CatalogSnapshot::default());
        assert_eq!(catalog.format_resource_groups(), "");
        assert_eq!(format_resources(catalog.resources()), "");
    }

    #[test]
    fn test_list_resources_of_type_preserves_order() {
        let catalog = sample();
        let sites = catalog.list_resources_of_type("Microsoft.Web/sites");
        let names: Vec<&str> = sites.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["shop", "Blog"]);
        assert!(catalog.list_resources_of_type("microsoft.web/sites").is_empty());
    }

    #[test]
    fn test_format_resources() {
        let catalog = sample();
        let out = format_resources(catalog.list_resources_of_type("Microsoft.Storage/storageAccounts"));
        assert_eq!(
            out,
            "1. Name: shopdata, Type: Microsoft.Storage/storageAccounts, Location: northeurope\n"
        );
    }

    #[test]
    fn test_find_resource() {
        let catalog = sample();
        assert_eq!(catalog.find_resource("blog", None).map(|r| r.name.as_str()), Some("Blog"));
        assert!(catalog
            .find_resource("shop", Some("Microsoft.Storage/storageAccounts"))
            .is_none());
        assert!(catalog.find_resource("missing", None).is_none());
    }

    #[test]
    fn test_find_resource_folds_unicode_case() {
        let catalog = Catalog::new(CatalogSnapshot::new(
            vec![],
            vec![Resource::new(
                "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/cafe",
                "CAFÉ-Ÿ",
                "Microsoft.Web/sites",
                "westeurope",
            )],
        ));
        let found = catalog.find_resource(&"CAFÉ-Ÿ".to_lowercase(), Some("Microsoft.Web/sites"));
        assert_eq!(found.map(|r| r.name.as_str()), Some("CAFÉ-Ÿ"));
        assert!(catalog.find_resource("café-ÿ", None).is_some());
    }

    fn offline_client() -> AzureClient {
        use crate::azure::auth::{AzureCredentials, CredentialSource};
        let creds = AzureCredentials::new(CredentialSource::Static("t".to_string()));
        AzureClient::new(creds, "s", "http://127.0.0.1:9").unwrap()
    }

    #[tokio::test]
    async fn test_unsupported_type_without_resource_group() {
        let catalog = sample();
        let orphan = Resource::new(
            "/providers/Microsoft.KeyVault/vaults/kv",
            "kv",
            "Microsoft.KeyVault/vaults",
            "eastus",
        );
        assert_eq!(
            catalog.get_status(&offline_client(), &orphan).await.unwrap(),
            "Status lookup is not supported for resources of type Microsoft.KeyVault/vaults"
        );
    }

    #[tokio::test]
    async fn test_web_app_without_resource_group_is_an_error() {
        let catalog = sample();
        let orphan = Resource::new("/providers/Microsoft.Web/sites/x", "x", "Microsoft.Web/sites", "eastus");
        let err = catalog.get_status(&offline_client(), &orphan).await.unwrap_err();
        assert!(err.to_string().contains("No resource group"));
    }
}
