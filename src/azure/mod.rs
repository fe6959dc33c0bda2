//! Azure API interaction module
//!
//! This module provides the core functionality for talking to Azure Resource
//! Manager, including authentication, the HTTP client, and resource listing.
//!
//! # Module Structure
//!
//! - [`auth`] - Token acquisition (static token, service principal, Azure CLI)
//! - [`client`] - Resource Manager client and URL helpers
//! - [`http`] - HTTP utilities shared with the language service client
//! - [`resources`] - Resource group, resource and web app models and listing
//!
//! # Example
//!
//! ```ignore
//! use azassist::azure::{auth, client::AzureClient, resources};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let creds = auth::AzureCredentials::new(auth::CredentialSource::AzureCli);
//!     let client = AzureClient::new(creds, "sub-id", "https://management.azure.com")?;
//!     let groups = resources::list_resource_groups(&client).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod resources;
