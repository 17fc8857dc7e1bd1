use serde::{Deserialize, Serialize};

use crate::numeric_id;

// ============================================================================
// ID Type
// ============================================================================

numeric_id!(
    /// Идентификатор топика (организации / субъекта учёта)
    TopicId
);

// ============================================================================
// Aggregate
// ============================================================================

/// Имя топика или credential, в порядке актуальности
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub credential_id: Option<i64>,
}

/// Topic in its formatted (display) shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub source_id: String,
    #[serde(rename = "type")]
    pub topic_type: String,
    #[serde(default)]
    pub names: Vec<Name>,
    #[serde(default)]
    pub create_timestamp: Option<String>,
    #[serde(default)]
    pub update_timestamp: Option<String>,
}

impl Topic {
    /// Text of the first name, if any
    pub fn primary_name(&self) -> Option<&str> {
        self.names.first().map(|n| n.text.as_str())
    }
}
