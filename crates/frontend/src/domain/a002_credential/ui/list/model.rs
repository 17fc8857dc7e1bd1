use contracts::domain::a002_credential::CredentialSearchResult;

use crate::shared::data_service::ListModel;

impl ListModel for CredentialSearchResult {
    fn list_path() -> &'static str {
        "/api/v2/search/credential/topic"
    }
}
