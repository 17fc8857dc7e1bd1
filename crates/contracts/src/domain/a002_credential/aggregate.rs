use serde::{Deserialize, Serialize};

use crate::domain::a001_topic::{Name, TopicId};
use crate::numeric_id;

numeric_id!(
    /// Идентификатор credential
    CredentialId
);

/// Издатель (issuer) типа credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerRef {
    pub id: i64,
    pub name: String,
}

/// Тип credential с издателем
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialTypeRef {
    pub id: i64,
    pub description: String,
    pub issuer: IssuerRef,
}

/// Строка результата поиска credentials по топику
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSearchResult {
    pub id: CredentialId,
    pub topic_id: TopicId,
    pub credential_type: CredentialTypeRef,
    /// ISO date (`YYYY-MM-DD`) or RFC 3339 timestamp
    pub effective_date: Option<String>,
    pub revoked: bool,
    pub revoked_date: Option<String>,
    pub inactive: bool,
    pub latest: bool,
    #[serde(default)]
    pub names: Vec<Name>,
}

impl CredentialSearchResult {
    pub fn display_name(&self) -> Option<&str> {
        self.names.first().map(|n| n.text.as_str())
    }
}

/// Подсказка автодополнения по имени
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSuggestion {
    pub id: i64,
    pub text: String,
    pub topic_id: TopicId,
    pub credential_id: Option<CredentialId>,
}
