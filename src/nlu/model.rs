//! Conversation analysis request and response types

use serde::{Deserialize, Serialize};

/// Classified purpose of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ListResources,
    CountResources,
    CheckStatus,
    Unknown,
}

impl Intent {
    /// Map a project intent label onto a known intent
    pub fn from_label(label: &str) -> Self {
        match label {
            "ListResources" => Intent::ListResources,
            "CountResources" => Intent::CountResources,
            "CheckStatus" => Intent::CheckStatus,
            _ => Intent::Unknown,
        }
    }
}

/// Labeled span extracted from a query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entity {
    pub category: String,
    pub text: String,
}

impl Entity {
    pub fn new(category: &str, text: &str) -> Self {
        Self {
            category: category.to_string(),
            text: text.to_string(),
        }
    }
}

/// Conversation project prediction
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub top_intent: Option<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Prediction {
    pub fn new(top_intent: &str, entities: Vec<Entity>) -> Self {
        Self {
            top_intent: Some(top_intent.to_string()),
            entities,
        }
    }

    /// Intent to act on; a prediction without entities carries nothing to act on
    pub fn intent(&self) -> Intent {
        if self.entities.is_empty() {
            return Intent::Unknown;
        }
        self.top_intent
            .as_deref()
            .map(Intent::from_label)
            .unwrap_or(Intent::Unknown)
    }

    /// Lower-cased text of the first entity in `category`
    pub fn entity_text(&self, category: &str) -> Option<String> {
        self.entities
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.text.to_lowercase())
    }

    /// Lower-cased text of the first entity, whatever its category
    pub fn first_entity_text(&self) -> Option<String> {
        self.entities.first().map(|e| e.text.to_lowercase())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeResponse {
    pub result: AnalyzeResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeResult {
    #[serde(default)]
    pub query: Option<String>,
    pub prediction: Prediction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalyzeRequest<'a> {
    pub kind: &'static str,
    pub analysis_input: AnalysisInput<'a>,
    pub parameters: AnalysisParameters<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalysisInput<'a> {
    pub conversation_item: ConversationItem<'a>,
    pub is_logging_enabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConversationItem<'a> {
    pub participant_id: &'static str,
    pub id: &'static str,
    pub modality: &'static str,
    pub language: &'static str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalysisParameters<'a> {
    pub project_name: &'a str,
    pub deployment_name: &'a str,
    pub verbose: bool,
}

impl<'a> AnalyzeRequest<'a> {
    pub fn conversation(text: &'a str, project_name: &'a str, deployment_name: &'a str) -> Self {
        Self {
            kind: "Conversation",
            analysis_input: AnalysisInput {
                conversation_item: ConversationItem {
                    participant_id: "1",
                    id: "1",
                    modality: "text",
                    language: "en",
                    text,
                },
                is_logging_enabled: false,
            },
            parameters: AnalysisParameters {
                project_name,
                deployment_name,
                verbose: true,
            },
        }
    }
}
