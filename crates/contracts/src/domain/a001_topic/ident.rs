//! Record identifiers for topics
//!
//! A topic is addressed either by its numeric id or by its source pair
//! `ident/{type}/{source_id}`. Route parameters `sourceType`/`sourceId`
//! map onto [`TopicIdent`]; the backend parses the same strings back with
//! [`TopicLookup::parse`].

use super::aggregate::TopicId;
use crate::domain::common::AggregateId;

/// Route type that means "the id is a bare record id"
pub const DIRECT_ID_TYPE: &str = "_";

const IDENT_PREFIX: &str = "ident";

/// Identifier parts taken from the route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicIdent {
    pub source_type: Option<String>,
    pub source_id: Option<String>,
}

impl TopicIdent {
    /// Empty strings are treated the same as missing parameters.
    pub fn new(source_type: Option<&str>, source_id: Option<&str>) -> Self {
        let clean = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            source_type: clean(source_type),
            source_id: clean(source_id),
        }
    }

    /// Composite identifier string, if one can be computed.
    ///
    /// `default_type` is used when the route carries no type. The sentinel
    /// type `_` yields the bare id.
    pub fn resolve(&self, default_type: Option<&str>) -> Option<String> {
        let source_id = self.source_id.as_deref()?;
        if self.source_type.as_deref() == Some(DIRECT_ID_TYPE) {
            return Some(source_id.to_string());
        }
        let source_type = self
            .source_type
            .as_deref()
            .or(default_type.filter(|s| !s.is_empty()))?;
        Some(format!("{}/{}/{}", IDENT_PREFIX, source_type, source_id))
    }
}

/// Parsed form of an identifier string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicLookup {
    ById(TopicId),
    BySource { topic_type: String, source_id: String },
}

impl TopicLookup {
    pub fn parse(ident: &str) -> Result<Self, String> {
        let ident = ident.trim_matches('/');
        let parts: Vec<&str> = ident.split('/').collect();
        match parts.as_slice() {
            [IDENT_PREFIX, topic_type, source_id]
                if !topic_type.is_empty() && !source_id.is_empty() =>
            {
                Ok(TopicLookup::BySource {
                    topic_type: topic_type.to_string(),
                    source_id: source_id.to_string(),
                })
            }
            [id] => TopicId::from_string(id).map(TopicLookup::ById),
            _ => Err(format!("Invalid topic identifier: {}", ident)),
        }
    }

    pub fn to_ident(&self) -> String {
        match self {
            TopicLookup::ById(id) => id.as_string(),
            TopicLookup::BySource {
                topic_type,
                source_id,
            } => format!("{}/{}/{}", IDENT_PREFIX, topic_type, source_id),
        }
    }
}
