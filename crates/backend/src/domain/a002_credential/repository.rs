use contracts::domain::a001_topic::{Name, TopicId};
use contracts::domain::a002_credential::{
    CategoryFilter, CredentialCriteria, CredentialId, CredentialSearchResult, CredentialTypeRef,
    FacetCount, FacetCounts, IssuerRef, NameSuggestion, OrderField, StatusFilter,
};
use contracts::shared::pagination::PageWindow;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;

use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select, Set,
};

use crate::domain::a001_topic::repository as topic_repository;
use crate::domain::a001_topic::repository::names;
use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_credential")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub topic_id: i64,
    pub credential_type_id: i64,
    pub credential_type_description: String,
    pub issuer_id: i64,
    pub issuer_name: String,
    pub effective_date: Option<String>,
    pub revoked: bool,
    pub revoked_date: Option<String>,
    pub inactive: bool,
    pub latest: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_search_result(self, names: Vec<Name>) -> CredentialSearchResult {
        CredentialSearchResult {
            id: CredentialId(self.id),
            topic_id: TopicId(self.topic_id),
            credential_type: CredentialTypeRef {
                id: self.credential_type_id,
                description: self.credential_type_description,
                issuer: IssuerRef {
                    id: self.issuer_id,
                    name: self.issuer_name,
                },
            },
            effective_date: self.effective_date,
            revoked: self.revoked,
            revoked_date: self.revoked_date,
            inactive: self.inactive,
            latest: self.latest,
            names,
        }
    }
}

/// Категории credential (`a002_credential_category`), фильтр и facets
pub mod categories {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a002_credential_category")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub credential_id: i64,
        #[sea_orm(column_name = "type")]
        pub category_type: String,
        pub value: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Credential fields accepted by [`insert`]
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub topic_id: TopicId,
    pub credential_type: CredentialTypeRef,
    pub effective_date: Option<String>,
    pub revoked: bool,
    pub revoked_date: Option<String>,
    pub inactive: bool,
    pub latest: bool,
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn status_condition(column: Column, filter: StatusFilter) -> Option<Condition> {
    match filter {
        StatusFilter::Any => None,
        StatusFilter::True => Some(Condition::all().add(column.eq(true))),
        StatusFilter::False => Some(Condition::all().add(column.eq(false))),
    }
}

fn with_statuses(
    mut query: Select<Entity>,
    revoked: StatusFilter,
    inactive: StatusFilter,
    latest: StatusFilter,
) -> Select<Entity> {
    let conditions = [
        status_condition(Column::Revoked, revoked),
        status_condition(Column::Inactive, inactive),
        status_condition(Column::Latest, latest),
    ];
    for condition in conditions.into_iter().flatten() {
        query = query.filter(condition);
    }
    query
}

/// `name` matches a credential name (substring) or the topic source id (exact)
fn name_condition(term: &str) -> Condition {
    Condition::any()
        .add(
            Column::Id.in_subquery(
                Query::select()
                    .column(names::Column::CredentialId)
                    .from(names::Entity)
                    .and_where(names::Column::Text.contains(term))
                    .and_where(Expr::col(names::Column::CredentialId).is_not_null())
                    .to_owned(),
            ),
        )
        .add(
            Column::TopicId.in_subquery(
                Query::select()
                    .column(topic_repository::Column::Id)
                    .from(topic_repository::Entity)
                    .and_where(Expr::col(topic_repository::Column::SourceId).eq(term))
                    .to_owned(),
            ),
        )
}

fn category_condition(category: &CategoryFilter) -> Condition {
    Condition::all().add(
        Column::Id.in_subquery(
            Query::select()
                .column(categories::Column::CredentialId)
                .from(categories::Entity)
                .and_where(categories::Column::CategoryType.eq(category.category_type.as_str()))
                .and_where(categories::Column::Value.eq(category.value.as_str()))
                .to_owned(),
        ),
    )
}

fn filtered(criteria: &CredentialCriteria) -> Select<Entity> {
    let mut query = Entity::find();
    if let Some(topic_id) = criteria.topic_id {
        query = query.filter(Column::TopicId.eq(topic_id.value()));
    }
    if let Some(type_id) = criteria.credential_type_id {
        query = query.filter(Column::CredentialTypeId.eq(type_id));
    }
    if let Some(issuer_id) = criteria.issuer_id {
        query = query.filter(Column::IssuerId.eq(issuer_id));
    }
    if let Some(category) = criteria.category.as_ref() {
        query = query.filter(category_condition(category));
    }
    if let Some(term) = criteria.name.as_deref() {
        query = query.filter(name_condition(term));
    }
    with_statuses(query, criteria.revoked, criteria.inactive, criteria.latest)
}

pub async fn count(criteria: &CredentialCriteria) -> anyhow::Result<u64> {
    Ok(filtered(criteria).count(conn()).await?)
}

/// One page of credentials matching `criteria`
pub async fn search(
    criteria: &CredentialCriteria,
    window: &PageWindow,
) -> anyhow::Result<Vec<Model>> {
    let order = if criteria.ordering.descending {
        Order::Desc
    } else {
        Order::Asc
    };
    let column = match criteria.ordering.field {
        OrderField::EffectiveDate => Column::EffectiveDate,
        OrderField::RevokedDate => Column::RevokedDate,
    };
    let items = filtered(criteria)
        .order_by(column, order.clone())
        .order_by(Column::Id, order)
        .offset(window.offset())
        .limit(window.page_size)
        .all(conn())
        .await?;
    Ok(items)
}

/// Largest count first, ties by value
fn sorted_facet<V: ToString>(rows: Vec<(V, i64)>) -> Vec<FacetCount> {
    let mut facet: Vec<FacetCount> = rows
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count: u64::try_from(count).unwrap_or(0),
        })
        .collect();
    facet.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    facet
}

async fn count_by(criteria: &CredentialCriteria, column: Column) -> anyhow::Result<Vec<FacetCount>> {
    let rows: Vec<(i64, i64)> = filtered(criteria)
        .select_only()
        .column(column)
        .column_as(Expr::col(Column::Id).count(), "count")
        .group_by(column)
        .into_tuple()
        .all(conn())
        .await?;
    Ok(sorted_facet(rows))
}

/// Facet counts over every credential matching `criteria`
pub async fn facet_counts(criteria: &CredentialCriteria) -> anyhow::Result<FacetCounts> {
    let credential_ids = filtered(criteria)
        .select_only()
        .column(Column::Id)
        .into_query();
    let rows: Vec<(String, String, i64)> = categories::Entity::find()
        .select_only()
        .column(categories::Column::CategoryType)
        .column(categories::Column::Value)
        .column_as(Expr::col(categories::Column::Id).count(), "count")
        .filter(categories::Column::CredentialId.in_subquery(credential_ids))
        .group_by(categories::Column::CategoryType)
        .group_by(categories::Column::Value)
        .into_tuple()
        .all(conn())
        .await?;
    let category = rows
        .into_iter()
        .map(|(category_type, value, count)| (format!("{}::{}", category_type, value), count))
        .collect();

    Ok(FacetCounts {
        category: sorted_facet(category),
        credential_type_id: count_by(criteria, Column::CredentialTypeId).await?,
        issuer_id: count_by(criteria, Column::IssuerId).await?,
    })
}

/// Ids of the revoked credentials of a topic
pub async fn revoked_ids_for_topic(topic_id: TopicId) -> anyhow::Result<Vec<i64>> {
    let items = Entity::find()
        .filter(Column::TopicId.eq(topic_id.value()))
        .filter(Column::Revoked.eq(true))
        .all(conn())
        .await?;
    Ok(items.into_iter().map(|m| m.id).collect())
}

/// Names containing `term` whose credential passes the status filters
pub async fn autocomplete(
    term: &str,
    revoked: StatusFilter,
    inactive: StatusFilter,
    latest: StatusFilter,
    category: Option<&CategoryFilter>,
    limit: u64,
) -> anyhow::Result<Vec<NameSuggestion>> {
    let mut credentials = with_statuses(Entity::find(), revoked, inactive, latest);
    if let Some(category) = category {
        credentials = credentials.filter(category_condition(category));
    }
    let credential_ids = credentials
        .select_only()
        .column(Column::Id)
        .into_query();

    let items = names::Entity::find()
        .filter(names::Column::Text.contains(term))
        .filter(names::Column::CredentialId.in_subquery(credential_ids))
        .order_by_asc(names::Column::Text)
        .order_by_asc(names::Column::Id)
        .limit(limit)
        .all(conn())
        .await?;

    Ok(items
        .into_iter()
        .map(|n| NameSuggestion {
            id: n.id,
            text: n.text,
            topic_id: TopicId(n.topic_id),
            credential_id: n.credential_id.map(CredentialId),
        })
        .collect())
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    credential: &NewCredential,
) -> anyhow::Result<CredentialId> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        topic_id: Set(credential.topic_id.value()),
        credential_type_id: Set(credential.credential_type.id),
        credential_type_description: Set(credential.credential_type.description.clone()),
        issuer_id: Set(credential.credential_type.issuer.id),
        issuer_name: Set(credential.credential_type.issuer.name.clone()),
        effective_date: Set(credential.effective_date.clone()),
        revoked: Set(credential.revoked),
        revoked_date: Set(credential.revoked_date.clone()),
        inactive: Set(credential.inactive),
        latest: Set(credential.latest),
    };
    let model = active.insert(db).await?;
    Ok(CredentialId(model.id))
}

pub async fn insert_category<C: ConnectionTrait>(
    db: &C,
    credential_id: CredentialId,
    category_type: &str,
    value: &str,
) -> anyhow::Result<i64> {
    let active = categories::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        credential_id: Set(credential_id.value()),
        category_type: Set(category_type.to_string()),
        value: Set(value.to_string()),
    };
    let model = active.insert(db).await?;
    Ok(model.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_facet_orders_by_count_then_value() {
        let facet = sorted_facet(vec![(3_i64, 1), (1, 4), (2, 4)]);
        let pairs: Vec<(&str, u64)> = facet.iter().map(|f| (f.value.as_str(), f.count)).collect();
        assert_eq!(pairs, vec![("1", 4), ("2", 4), ("3", 1)]);
    }
}
