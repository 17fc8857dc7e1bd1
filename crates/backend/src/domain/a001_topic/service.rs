use super::repository::{self, names};
use crate::domain::a002_credential::repository as credential_repository;
use contracts::domain::a001_topic::{Name, Topic, TopicId, TopicLookup};

/// Names shown for a topic: its own names and names of credentials that are not revoked
pub fn visible_names(all: Vec<names::Model>, revoked_credentials: &[i64]) -> Vec<Name> {
    all.into_iter()
        .filter(|n| {
            n.credential_id
                .map_or(true, |id| !revoked_credentials.contains(&id))
        })
        .map(Into::into)
        .collect()
}

/// Топик в форматированном виде (с именами)
pub async fn get_formatted(lookup: &TopicLookup) -> anyhow::Result<Option<Topic>> {
    let model = match lookup {
        TopicLookup::ById(id) => repository::get_by_id(*id).await?,
        TopicLookup::BySource {
            topic_type,
            source_id,
        } => repository::get_by_source(topic_type, source_id).await?,
    };
    let Some(model) = model else {
        return Ok(None);
    };

    let revoked = credential_repository::revoked_ids_for_topic(TopicId(model.id)).await?;
    let names = visible_names(repository::names_for_topic(model.id).await?, &revoked);
    Ok(Some(model.into_topic(names)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(id: i64, credential_id: Option<i64>) -> names::Model {
        names::Model {
            id,
            topic_id: 1,
            credential_id,
            text: format!("name {}", id),
            language: None,
        }
    }

    #[test]
    fn test_names_of_revoked_credentials_are_hidden() {
        let names = visible_names(vec![name(1, None), name(2, Some(10)), name(3, Some(11))], &[10]);
        let ids: Vec<i64> = names.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(names[1].credential_id, Some(11));
    }
}
