//! Query interpreter
//!
//! Turns free text into an answer: the language service classifies the
//! query, [`Command`] resolves intent and entities, and the catalog
//! produces the text. Nothing is kept between queries.

mod command;

pub use command::{Command, Subject};

use crate::azure::client::AzureClient;
use crate::catalog::{format_resources, Catalog};
use crate::nlu::{ConversationClient, Prediction};
use anyhow::Result;

/// Answer for anything that can't be mapped to a catalog operation
pub const NOT_UNDERSTOOD: &str = "Sorry, I don't understand the request";

/// Answer for a status check on a name that isn't in the catalog
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

pub struct QueryInterpreter {
    nlu: ConversationClient,
    azure: AzureClient,
    catalog: Catalog,
}

impl QueryInterpreter {
    pub fn new(nlu: ConversationClient, azure: AzureClient, catalog: Catalog) -> Self {
        Self {
            nlu,
            azure,
            catalog,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Classify `text` and answer it
    ///
    /// Unrecognized queries produce a fixed sentence; only failures of the
    /// language service or Resource Manager are returned as errors.
    pub async fn process_query(&self, text: &str) -> Result<String> {
        let prediction = self.nlu.analyze(text).await?;
        self.answer(&prediction).await
    }

    /// Answer an already classified query
    pub async fn answer(&self, prediction: &Prediction) -> Result<String> {
        let command = Command::from_prediction(prediction);
        tracing::info!("Dispatching {:?}", command);
        self.execute(&command).await
    }

    pub async fn execute(&self, command: &Command) -> Result<String> {
        let catalog = &self.catalog;

        let answer = match command {
            Command::List(Subject::ResourceGroups) => catalog.format_resource_groups(),
            Command::List(Subject::AllResources) => format_resources(catalog.resources()),
            Command::List(Subject::Kind { provider_type, .. }) => {
                format_resources(catalog.list_resources_of_type(provider_type))
            }
            Command::Count(Subject::ResourceGroups) => {
                format!("You have {} resource groups", catalog.resource_groups().len())
            }
            Command::Count(Subject::AllResources) => {
                format!("You have {} resources", catalog.resources().len())
            }
            Command::Count(Subject::Kind {
                label,
                provider_type,
            }) => format!(
                "You have {} resources of type {}",
                catalog.list_resources_of_type(provider_type).len(),
                label
            ),
            Command::List(Subject::Unrecognized(descriptor))
            | Command::Count(Subject::Unrecognized(descriptor)) => {
                tracing::debug!("Unrecognized type descriptor {:?}", descriptor);
                NOT_UNDERSTOOD.to_string()
            }
            Command::CheckStatus {
                provider_type,
                target,
            } => match catalog.find_resource(target, *provider_type) {
                Some(resource) => catalog.get_status(&self.azure, resource).await?,
                None => RESOURCE_NOT_FOUND.to_string(),
            },
            Command::NotUnderstood => NOT_UNDERSTOOD.to_string(),
        };

        Ok(answer)
    }
}
