//! Startup data: loads the JSON seed file into an empty database.
//!
//! ```json
//! { "topics": [ { "source_id": "BC0000001", "type": "registration",
//!     "names": [{"text": "Acme"}],
//!     "credentials": [ { "credential_type": {...}, "effective_date": "2019-05-01",
//!                        "names": [{"text": "Acme"}],
//!                        "categories": [{"type": "entity_type", "value": "BC"}] } ] } ] }
//! ```
//!
//! The whole file goes in one transaction: any failing row leaves the
//! database empty.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::domain::a002_credential::CredentialTypeRef;
use sea_orm::{ConnectionTrait, TransactionTrait};
use serde::Deserialize;

use crate::domain::a001_topic::repository as topic_repository;
use crate::domain::a002_credential::repository::{self as credential_repository, NewCredential};
use crate::shared::data::db::get_connection;

#[derive(Debug, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub topics: Vec<SeedTopic>,
}

#[derive(Debug, Deserialize)]
pub struct SeedTopic {
    pub source_id: String,
    #[serde(rename = "type")]
    pub topic_type: String,
    #[serde(default)]
    pub create_timestamp: Option<String>,
    /// Names not tied to any credential
    #[serde(default)]
    pub names: Vec<SeedName>,
    #[serde(default)]
    pub credentials: Vec<SeedCredential>,
}

#[derive(Debug, Deserialize)]
pub struct SeedName {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCredential {
    pub credential_type: CredentialTypeRef,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub revoked_date: Option<String>,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default = "default_latest")]
    pub latest: bool,
    #[serde(default)]
    pub names: Vec<SeedName>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    #[serde(rename = "type")]
    pub category_type: String,
    pub value: String,
}

fn default_latest() -> bool {
    true
}

pub fn parse_seed(contents: &str) -> Result<SeedData> {
    serde_json::from_str(contents).context("Invalid seed file")
}

/// Counts of inserted rows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedStats {
    pub topics: usize,
    pub credentials: usize,
    pub names: usize,
    pub categories: usize,
}

/// Inserts every row of `data` through `db` (pool or transaction)
pub async fn apply_seed<C: ConnectionTrait>(db: &C, data: &SeedData) -> Result<SeedStats> {
    let mut stats = SeedStats::default();

    for topic in &data.topics {
        let topic_id = topic_repository::insert(
            db,
            &topic.topic_type,
            &topic.source_id,
            topic.create_timestamp.clone(),
        )
        .await
        .with_context(|| format!("Failed to insert topic {}/{}", topic.topic_type, topic.source_id))?;
        stats.topics += 1;

        for name in &topic.names {
            topic_repository::insert_name(db, topic_id, None, &name.text, name.language.clone())
                .await?;
            stats.names += 1;
        }

        for credential in &topic.credentials {
            let credential_id = credential_repository::insert(
                db,
                &NewCredential {
                    topic_id,
                    credential_type: credential.credential_type.clone(),
                    effective_date: credential.effective_date.clone(),
                    revoked: credential.revoked,
                    revoked_date: credential.revoked_date.clone(),
                    inactive: credential.inactive,
                    latest: credential.latest,
                },
            )
            .await?;
            stats.credentials += 1;

            for name in &credential.names {
                topic_repository::insert_name(
                    db,
                    topic_id,
                    Some(credential_id.value()),
                    &name.text,
                    name.language.clone(),
                )
                .await?;
                stats.names += 1;
            }

            for category in &credential.categories {
                credential_repository::insert_category(
                    db,
                    credential_id,
                    &category.category_type,
                    &category.value,
                )
                .await?;
                stats.categories += 1;
            }
        }
    }

    Ok(stats)
}

/// Loads `path` when the topic table is empty. A missing file is not an error.
pub async fn seed_if_empty(path: &Path) -> Result<Option<SeedStats>> {
    let existing = topic_repository::count().await?;
    if existing > 0 {
        tracing::info!("Database has {} topics, seed skipped", existing);
        return Ok(None);
    }
    if !path.exists() {
        tracing::warn!("Seed file not found: {}", path.display());
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read seed file {}", path.display()))?;
    let data = parse_seed(&contents)?;

    let txn = get_connection().begin().await?;
    let stats = match apply_seed(&txn, &data).await {
        Ok(stats) => stats,
        Err(e) => {
            txn.rollback().await?;
            tracing::error!("Seed {} rolled back: {:#}", path.display(), e);
            return Err(e);
        }
    };
    txn.commit().await?;

    tracing::info!(
        "Seeded {} topics, {} credentials, {} names, {} categories from {}",
        stats.topics,
        stats.credentials,
        stats.names,
        stats.categories,
        path.display()
    );
    Ok(Some(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_defaults() {
        let data = parse_seed(
            r#"{"topics": [{
                "source_id": "BC0000001",
                "type": "registration",
                "credentials": [{
                    "credential_type": {"id": 1, "description": "Registration", "issuer": {"id": 1, "name": "Registries"}},
                    "names": [{"text": "Acme Holdings Ltd."}]
                }]
            }]}"#,
        )
        .unwrap();
        let topic = &data.topics[0];
        assert_eq!(topic.topic_type, "registration");
        assert!(topic.names.is_empty());
        let credential = &topic.credentials[0];
        assert!(credential.latest);
        assert!(!credential.revoked);
        assert!(!credential.inactive);
        assert_eq!(credential.names[0].text, "Acme Holdings Ltd.");
        assert!(credential.categories.is_empty());
    }

    #[test]
    fn test_parse_seed_categories() {
        let data = parse_seed(
            r#"{"topics": [{
                "source_id": "BC0000002",
                "type": "registration",
                "credentials": [{
                    "credential_type": {"id": 1, "description": "Registration", "issuer": {"id": 1, "name": "Registries"}},
                    "categories": [{"type": "entity_type", "value": "BC"}]
                }]
            }]}"#,
        )
        .unwrap();
        let category = &data.topics[0].credentials[0].categories[0];
        assert_eq!(category.category_type, "entity_type");
        assert_eq!(category.value, "BC");
    }

    #[test]
    fn test_parse_seed_rejects_garbage() {
        assert!(parse_seed("{\"topics\": 5}").is_err());
    }
}
