//! Resolution of a prediction into a command
//!
//! Intent and type descriptor are resolved into tagged variants here so the
//! dispatcher can match on them exhaustively.

use crate::catalog;
use crate::nlu::{Intent, Prediction};

/// What a type descriptor refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// "resource groups"
    ResourceGroups,
    /// "resources"
    AllResources,
    /// An entry of the resource type map
    Kind {
        label: String,
        provider_type: &'static str,
    },
    /// Anything else, kept for logging
    Unrecognized(String),
}

impl Subject {
    /// Resolve a lower-cased descriptor
    pub fn resolve(descriptor: &str) -> Self {
        match descriptor {
            "resource groups" => Subject::ResourceGroups,
            "resources" => Subject::AllResources,
            other => match catalog::provider_type(other) {
                Some(provider_type) => Subject::Kind {
                    label: other.to_string(),
                    provider_type,
                },
                None => Subject::Unrecognized(other.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(Subject),
    Count(Subject),
    CheckStatus {
        /// Provider type to narrow the search, if the query named one
        provider_type: Option<&'static str>,
        target: String,
    },
    NotUnderstood,
}

impl Command {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        match prediction.intent() {
            Intent::ListResources => {
                Command::List(Subject::resolve(&prediction.first_entity_text().unwrap_or_default()))
            }
            Intent::CountResources => {
                Command::Count(Subject::resolve(&prediction.first_entity_text().unwrap_or_default()))
            }
            Intent::CheckStatus => {
                let target = prediction.entity_text("target").unwrap_or_default();
                let descriptor = prediction.entity_text("type").map(|t| pluralize(&t));

                match descriptor.as_deref().map(Subject::resolve) {
                    None | Some(Subject::AllResources) => Command::CheckStatus {
                        provider_type: None,
                        target,
                    },
                    Some(Subject::Kind { provider_type, .. }) => Command::CheckStatus {
                        provider_type: Some(provider_type),
                        target,
                    },
                    Some(Subject::ResourceGroups) | Some(Subject::Unrecognized(_)) => {
                        Command::NotUnderstood
                    }
                }
            }
            Intent::Unknown => Command::NotUnderstood,
        }
    }
}

/// Append "s" unless the word already ends with one
fn pluralize(word: &str) -> String {
    if word.is_empty() || word.ends_with('s') {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
