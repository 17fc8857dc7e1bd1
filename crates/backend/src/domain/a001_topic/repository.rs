use chrono::{SecondsFormat, Utc};
use contracts::domain::a001_topic::{Name, Topic, TopicId};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_topic")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub source_id: String,
    #[sea_orm(column_name = "type")]
    pub topic_type: String,
    pub create_timestamp: Option<String>,
    pub update_timestamp: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_topic(self, names: Vec<Name>) -> Topic {
        Topic {
            id: TopicId(self.id),
            source_id: self.source_id,
            topic_type: self.topic_type,
            names,
            create_timestamp: self.create_timestamp,
            update_timestamp: self.update_timestamp,
        }
    }
}

/// Имена топиков и credentials (`a001_topic_name`)
pub mod names {
    use contracts::domain::a001_topic::Name;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a001_topic_name")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub topic_id: i64,
        pub credential_id: Option<i64>,
        pub text: String,
        pub language: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Name {
        fn from(m: Model) -> Self {
            Name {
                id: m.id,
                text: m.text,
                language: m.language,
                credential_id: m.credential_id,
            }
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn get_by_id(id: TopicId) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find_by_id(id.value()).one(conn()).await?)
}

pub async fn get_by_source(topic_type: &str, source_id: &str) -> anyhow::Result<Option<Model>> {
    let result = Entity::find()
        .filter(Column::TopicType.eq(topic_type))
        .filter(Column::SourceId.eq(source_id))
        .one(conn())
        .await?;
    Ok(result)
}

pub async fn count() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

/// All names of a topic, oldest first
pub async fn names_for_topic(topic_id: i64) -> anyhow::Result<Vec<names::Model>> {
    let items = names::Entity::find()
        .filter(names::Column::TopicId.eq(topic_id))
        .order_by_asc(names::Column::Id)
        .all(conn())
        .await?;
    Ok(items)
}

pub async fn names_for_credentials(credential_ids: &[i64]) -> anyhow::Result<Vec<names::Model>> {
    if credential_ids.is_empty() {
        return Ok(Vec::new());
    }
    let items = names::Entity::find()
        .filter(names::Column::CredentialId.is_in(credential_ids.iter().copied()))
        .order_by_asc(names::Column::Id)
        .all(conn())
        .await?;
    Ok(items)
}

/// Без `create_timestamp` топик получает текущее время (UTC).
/// `db` is the pool or an open transaction.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    topic_type: &str,
    source_id: &str,
    create_timestamp: Option<String>,
) -> anyhow::Result<TopicId> {
    let created = create_timestamp
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        source_id: Set(source_id.to_string()),
        topic_type: Set(topic_type.to_string()),
        update_timestamp: Set(Some(created.clone())),
        create_timestamp: Set(Some(created)),
    };
    let model = active.insert(db).await?;
    Ok(TopicId(model.id))
}

pub async fn insert_name<C: ConnectionTrait>(
    db: &C,
    topic_id: TopicId,
    credential_id: Option<i64>,
    text: &str,
    language: Option<String>,
) -> anyhow::Result<i64> {
    let active = names::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        topic_id: Set(topic_id.value()),
        credential_id: Set(credential_id),
        text: Set(text.to_string()),
        language: Set(language),
    };
    let model = active.insert(db).await?;
    Ok(model.id)
}
