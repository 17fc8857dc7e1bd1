//! Data service: fills loaders from the API
//!
//! Pages talk to a [`DataService`] instead of issuing requests themselves;
//! the service starts a request on the loader and resolves it when the
//! response arrives. Failures end up on the loader stream as [`LoadError`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use wasm_bindgen_futures::spawn_local;

use super::api_utils::{api_url, fetch_json};
use super::config::AppConfig;
use super::fetch::{LoadError, ModelListLoader, ModelLoader};
use contracts::shared::pagination::Page;

/// Model fetched as a single record by identifier
pub trait RecordModel: DeserializeOwned + Clone + 'static {
    fn record_path(ident: &str) -> String;
}

/// Model fetched as a page of records
pub trait ListModel: DeserializeOwned + Clone + 'static {
    fn list_path() -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// The request that defines the page; its failure is the page's failure.
    pub primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub query: BTreeMap<String, String>,
    pub page: Option<u64>,
}

impl ListOptions {
    pub fn with_query(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            query: pairs.into_iter().collect(),
            page: None,
        }
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn query_string(&self) -> String {
        let mut params = self.query.clone();
        if let Some(page) = self.page {
            params.insert("page".to_string(), page.to_string());
        }
        serde_qs::to_string(&params).unwrap_or_default()
    }
}

pub trait DataService {
    fn default_topic_type(&self) -> Option<String>;

    fn load_record<T: RecordModel>(&self, loader: &ModelLoader<T>, ident: &str, options: LoadOptions);

    fn load_list<T: ListModel>(&self, loader: &ModelListLoader<T>, options: ListOptions);
}

/// [`DataService`] over the HTTP API
#[derive(Debug, Clone)]
pub struct HttpDataService {
    config: AppConfig,
}

impl HttpDataService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn list_url(&self, path: &str, options: &ListOptions) -> String {
        let query = options.query_string();
        if query.is_empty() {
            api_url(&self.config.api_base, path)
        } else {
            api_url(&self.config.api_base, &format!("{}?{}", path, query))
        }
    }
}

impl DataService for HttpDataService {
    fn default_topic_type(&self) -> Option<String> {
        self.config.default_topic_type().map(str::to_string)
    }

    fn load_record<T: RecordModel>(&self, loader: &ModelLoader<T>, ident: &str, options: LoadOptions) {
        let Some(ticket) = loader.begin() else {
            return;
        };
        let url = api_url(&self.config.api_base, &T::record_path(ident));
        let loader = loader.clone();
        let ident = ident.to_string();
        spawn_local(async move {
            let outcome = fetch_json::<T>(&url).await;
            if let Err(e) = &outcome {
                report_failure(&ident, e, options.primary);
            }
            loader.resolve(ticket, outcome);
        });
    }

    fn load_list<T: ListModel>(&self, loader: &ModelListLoader<T>, options: ListOptions) {
        let Some(ticket) = loader.begin() else {
            return;
        };
        let url = self.list_url(T::list_path(), &options);
        let loader = loader.clone();
        spawn_local(async move {
            let outcome = fetch_json::<Page<T>>(&url).await;
            if let Err(e) = &outcome {
                report_failure(&url, e, false);
            }
            loader.resolve(ticket, outcome);
        });
    }
}

fn report_failure(target: &str, error: &LoadError, primary: bool) {
    if primary {
        log::error!("failed to load {}: {}", target, error);
    } else {
        log::warn!("failed to load {}: {}", target, error);
    }
}
