use contracts::domain::a001_topic::Topic;

use crate::shared::data_service::RecordModel;

impl RecordModel for Topic {
    fn record_path(ident: &str) -> String {
        format!("/api/v2/topic/{}/formatted", ident)
    }
}
