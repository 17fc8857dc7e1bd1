//! Credential filter criteria
//!
//! [`CredentialFilter`] is what the topic page sends; [`CredentialSearchParams`]
//! is what the search endpoint receives and turns into typed
//! [`CredentialCriteria`].

use serde::{Deserialize, Serialize};

use crate::domain::a001_topic::TopicId;
use crate::domain::common::AggregateId;

// ============================================================================
// Status filter (any / true / false)
// ============================================================================

/// Tri-state filter over a boolean credential flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Any,
    True,
    False,
}

impl StatusFilter {
    /// Absent parameter gives `default`; an empty value means no constraint.
    pub fn parse(value: Option<&str>, default: StatusFilter) -> Result<Self, String> {
        match value.map(str::trim) {
            None => Ok(default),
            Some("") | Some("any") => Ok(StatusFilter::Any),
            Some("true") => Ok(StatusFilter::True),
            Some("false") => Ok(StatusFilter::False),
            Some(other) => Err(format!(
                "Invalid status filter '{}', expected any, true or false",
                other
            )),
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            StatusFilter::Any => "any",
            StatusFilter::True => "true",
            StatusFilter::False => "false",
        }
    }

    pub fn matches(&self, flag: bool) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::True => flag,
            StatusFilter::False => !flag,
        }
    }
}

// ============================================================================
// Client side filter
// ============================================================================

/// Criteria the topic page sends with its credential list request.
///
/// `revoked` is `"false"` when only current credentials are shown and empty
/// when revoked ones are included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialFilter {
    pub topic_id: String,
    pub revoked: String,
}

impl CredentialFilter {
    pub fn for_topic(topic_id: TopicId, only_active: bool) -> Self {
        Self {
            topic_id: topic_id.as_string(),
            revoked: if only_active {
                StatusFilter::False.as_param().to_string()
            } else {
                String::new()
            },
        }
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("topic_id".to_string(), self.topic_id.clone()),
            ("revoked".to_string(), self.revoked.clone()),
        ]
    }
}

// ============================================================================
// Server side parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    EffectiveDate,
    RevokedDate,
}

/// Sort order for credential search, e.g. `-effective_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialOrdering {
    pub field: OrderField,
    pub descending: bool,
}

impl Default for CredentialOrdering {
    fn default() -> Self {
        Self {
            field: OrderField::EffectiveDate,
            descending: true,
        }
    }
}

impl CredentialOrdering {
    pub fn parse(value: Option<&str>) -> Result<Self, String> {
        let raw = match value.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(v) => v,
        };
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match name {
            "effective_date" => OrderField::EffectiveDate,
            "revoked_date" => OrderField::RevokedDate,
            other => return Err(format!("Unknown ordering field: {}", other)),
        };
        Ok(Self { field, descending })
    }
}

/// Credential category constraint, written `type::value` in query strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    pub category_type: String,
    pub value: String,
}

impl CategoryFilter {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.split_once("::") {
            Some((category_type, value))
                if !category_type.trim().is_empty() && !value.trim().is_empty() =>
            {
                Ok(Self {
                    category_type: category_type.trim().to_string(),
                    value: value.trim().to_string(),
                })
            }
            _ => Err(format!(
                "Invalid category filter '{}', expected type::value",
                raw
            )),
        }
    }

    pub fn as_param(&self) -> String {
        format!("{}::{}", self.category_type, self.value)
    }
}

/// Query string of `GET /api/v2/search/credential/topic` and its `/facets`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialSearchParams {
    #[serde(default)]
    pub topic_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub credential_type_id: Option<String>,
    #[serde(default)]
    pub issuer_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub revoked: Option<String>,
    #[serde(default)]
    pub inactive: Option<String>,
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default)]
    pub ordering: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
}

/// Typed search criteria
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialCriteria {
    pub topic_id: Option<TopicId>,
    pub name: Option<String>,
    pub credential_type_id: Option<i64>,
    pub issuer_id: Option<i64>,
    pub category: Option<CategoryFilter>,
    pub revoked: StatusFilter,
    pub inactive: StatusFilter,
    pub latest: StatusFilter,
    pub ordering: CredentialOrdering,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl CredentialSearchParams {
    pub fn criteria(&self) -> Result<CredentialCriteria, String> {
        let topic_id = non_empty(&self.topic_id)
            .map(TopicId::from_string)
            .transpose()?;
        let credential_type_id = non_empty(&self.credential_type_id)
            .map(i64::from_string)
            .transpose()?;
        let issuer_id = non_empty(&self.issuer_id)
            .map(i64::from_string)
            .transpose()?;
        Ok(CredentialCriteria {
            topic_id,
            name: non_empty(&self.name).map(str::to_string),
            credential_type_id,
            issuer_id,
            category: non_empty(&self.category)
                .map(CategoryFilter::parse)
                .transpose()?,
            revoked: StatusFilter::parse(self.revoked.as_deref(), StatusFilter::False)?,
            inactive: StatusFilter::parse(self.inactive.as_deref(), StatusFilter::False)?,
            latest: StatusFilter::parse(self.latest.as_deref(), StatusFilter::True)?,
            ordering: CredentialOrdering::parse(self.ordering.as_deref())?,
        })
    }
}

/// Query string of `GET /api/v2/search/autocomplete`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutocompleteParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub revoked: Option<String>,
    #[serde(default)]
    pub inactive: Option<String>,
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl AutocompleteParams {
    pub fn term(&self) -> Option<&str> {
        non_empty(&self.q)
    }

    pub fn category(&self) -> Result<Option<CategoryFilter>, String> {
        non_empty(&self.category).map(CategoryFilter::parse).transpose()
    }

    /// `(revoked, inactive, latest)`
    pub fn statuses(&self) -> Result<(StatusFilter, StatusFilter, StatusFilter), String> {
        Ok((
            StatusFilter::parse(self.revoked.as_deref(), StatusFilter::False)?,
            StatusFilter::parse(self.inactive.as_deref(), StatusFilter::Any)?,
            StatusFilter::parse(self.latest.as_deref(), StatusFilter::True)?,
        ))
    }
}
