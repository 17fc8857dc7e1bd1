//! TopicFormViewModel
//!
//! Flow: a route emission resolves the topic identifier and loads the topic
//! (primary request). Every successful topic load triggers one credential
//! list request filtered by the topic id and the "active only" flag.

use std::cell::RefCell;
use std::rc::Rc;

use contracts::domain::a001_topic::{Name, Topic, TopicIdent};
use contracts::domain::a002_credential::{CredentialFilter, CredentialSearchResult};
use contracts::shared::pagination::Page;

use crate::shared::data_service::{DataService, ListOptions, LoadOptions};
use crate::shared::fetch::{
    EventStream, LoadResult, LoadStatus, ModelListLoader, ModelLoader, Subscription,
};

/// Layout of the credential list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredsFormat {
    #[default]
    Rows,
    Cards,
}

#[derive(Debug, Clone)]
struct TopicFormState {
    source: TopicIdent,
    filter_active: bool,
    show_filters: bool,
    creds_format: CredsFormat,
}

impl Default for TopicFormState {
    fn default() -> Self {
        Self {
            source: TopicIdent::default(),
            filter_active: true,
            show_filters: false,
            creds_format: CredsFormat::Rows,
        }
    }
}

/// Title of a topic: text of its first name
pub fn title_of(topic: Option<&Topic>) -> Option<String> {
    topic.and_then(Topic::primary_name).map(str::to_string)
}

/// Names of a topic, only once it is loaded
pub fn names_of(result: &LoadResult<Topic>) -> Option<Vec<Name>> {
    if result.loaded() {
        result.data.as_ref().map(|t| t.names.clone())
    } else {
        None
    }
}

/// ViewModel for the topic details page
pub struct TopicFormViewModel<S: DataService> {
    service: Rc<S>,
    topic: ModelLoader<Topic>,
    creds: ModelListLoader<CredentialSearchResult>,
    state: Rc<RefCell<TopicFormState>>,
    subscriptions: Rc<RefCell<Vec<Subscription>>>,
}

impl<S: DataService> Clone for TopicFormViewModel<S> {
    fn clone(&self) -> Self {
        Self {
            service: Rc::clone(&self.service),
            topic: self.topic.clone(),
            creds: self.creds.clone(),
            state: Rc::clone(&self.state),
            subscriptions: Rc::clone(&self.subscriptions),
        }
    }
}

impl<S: DataService + 'static> TopicFormViewModel<S> {
    pub fn new(service: Rc<S>) -> Self {
        Self {
            service,
            topic: ModelLoader::new(),
            creds: ModelListLoader::new(),
            state: Rc::new(RefCell::new(TopicFormState::default())),
            subscriptions: Rc::new(RefCell::new(Vec::new())),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Wires the page: topic ready -> credential fetch, route -> topic load.
    pub fn init(&self, routes: &EventStream<TopicIdent>) {
        let vm = self.clone();
        let ready = self.topic.ready().subscribe(move |_| {
            vm.fetch_creds();
        });
        self.hold(ready);

        let vm = self.clone();
        let route = routes.subscribe(move |source| {
            vm.on_route(source.clone());
        });
        self.hold(route);
    }

    /// Applies route parameters and requests the topic.
    ///
    /// Returns the identifier that was requested.
    pub fn on_route(&self, source: TopicIdent) -> Option<String> {
        self.state.borrow_mut().source = source;
        let Some(ident) = self.ident() else {
            let source = self.state.borrow().source.clone();
            log::warn!(
                "topic route without identifier: type={:?}, id={:?}",
                source.source_type,
                source.source_id
            );
            return None;
        };
        log::debug!("loading topic {}", ident);
        self.service
            .load_record(&self.topic, &ident, LoadOptions { primary: true });
        Some(ident)
    }

    /// Releases subscriptions and completes both loaders. Safe to call twice.
    pub fn destroy(&self) {
        let subscriptions: Vec<Subscription> = self.subscriptions.borrow_mut().drain(..).collect();
        drop(subscriptions);
        self.topic.complete();
        self.creds.complete();
    }

    /// Keeps `subscription` alive until [`Self::destroy`].
    pub fn hold(&self, subscription: Subscription) {
        self.subscriptions.borrow_mut().push(subscription);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn ident(&self) -> Option<String> {
        let default_type = self.service.default_topic_type();
        self.state.borrow().source.resolve(default_type.as_deref())
    }

    pub fn title(&self) -> Option<String> {
        self.topic.with_data(title_of)
    }

    pub fn topic(&self) -> Option<Topic> {
        self.topic.data()
    }

    pub fn names(&self) -> Option<Vec<Name>> {
        names_of(&self.topic.result())
    }

    pub fn is_loaded(&self) -> bool {
        self.topic.status() == LoadStatus::Ready
    }

    pub fn is_loading(&self) -> bool {
        self.topic.status() == LoadStatus::Loading
    }

    pub fn result_stream(&self) -> &EventStream<LoadResult<Topic>> {
        self.topic.stream()
    }

    pub fn creds_stream(&self) -> &EventStream<LoadResult<Page<CredentialSearchResult>>> {
        self.creds.stream()
    }

    // ------------------------------------------------------------------
    // Filter
    // ------------------------------------------------------------------

    pub fn filter_active(&self) -> bool {
        self.state.borrow().filter_active
    }

    pub fn filter_active_param(&self) -> &'static str {
        if self.filter_active() {
            "true"
        } else {
            "false"
        }
    }

    /// Sets the "active only" flag and refetches credentials once.
    pub fn set_filter_active(&self, active: bool) -> Option<CredentialFilter> {
        self.state.borrow_mut().filter_active = active;
        self.fetch_creds()
    }

    /// String form of [`Self::set_filter_active`]: only `"true"` is active.
    pub fn set_filter_active_str(&self, value: &str) -> Option<CredentialFilter> {
        self.set_filter_active(value == "true")
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    pub fn toggle_filters(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.show_filters = !state.show_filters;
        state.show_filters
    }

    pub fn show_filters(&self) -> bool {
        self.state.borrow().show_filters
    }

    pub fn creds_format(&self) -> CredsFormat {
        self.state.borrow().creds_format
    }

    pub fn set_creds_format(&self, format: CredsFormat) {
        self.state.borrow_mut().creds_format = format;
    }

    // ------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------

    /// Requests the first page of credentials for the loaded topic.
    ///
    /// Returns the filter used, `None` while no topic is loaded.
    pub fn fetch_creds(&self) -> Option<CredentialFilter> {
        self.request_creds(None)
    }

    pub fn load_creds_page(&self, page: u64) -> Option<CredentialFilter> {
        self.request_creds(Some(page))
    }

    fn request_creds(&self, page: Option<u64>) -> Option<CredentialFilter> {
        if !self.is_loaded() || self.creds.is_completed() {
            return None;
        }
        let topic_id = self.topic.with_data(|t| t.map(|t| t.id))?;
        let filter = CredentialFilter::for_topic(topic_id, self.filter_active());
        let mut options = ListOptions::with_query(filter.query_pairs());
        if let Some(page) = page.filter(|p| *p > 1) {
            options = options.page(page);
        }
        self.service.load_list(&self.creds, options);
        Some(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data_service::{ListModel, RecordModel};
    use crate::shared::fetch::{LoadError, Loader};
    use serde_json::json;

    type Pending = Box<dyn FnOnce(Result<serde_json::Value, LoadError>)>;

    #[derive(Default)]
    struct FakeDataService {
        default_type: Option<String>,
        records: RefCell<Vec<(String, LoadOptions)>>,
        lists: RefCell<Vec<ListOptions>>,
        pending: RefCell<Vec<Pending>>,
    }

    impl FakeDataService {
        fn with_default_type(default_type: &str) -> Self {
            Self {
                default_type: Some(default_type.to_string()),
                ..Default::default()
            }
        }

        fn pending_count(&self) -> usize {
            self.pending.borrow().len()
        }

        /// Completes the `index`-th outstanding request
        fn respond(&self, index: usize, outcome: Result<serde_json::Value, LoadError>) {
            let pending = self.pending.borrow_mut().remove(index);
            pending(outcome);
        }

        fn respond_first(&self, value: serde_json::Value) {
            self.respond(0, Ok(value));
        }

        fn defer<T: Clone + serde::de::DeserializeOwned + 'static>(&self, loader: &Loader<T>) {
            let Some(ticket) = loader.begin() else {
                return;
            };
            let loader = loader.clone();
            self.pending.borrow_mut().push(Box::new(move |outcome| {
                let outcome = outcome.and_then(|v| {
                    serde_json::from_value::<T>(v).map_err(|e| LoadError::other(e.to_string()))
                });
                loader.resolve(ticket, outcome);
            }));
        }
    }

    impl DataService for FakeDataService {
        fn default_topic_type(&self) -> Option<String> {
            self.default_type.clone()
        }

        fn load_record<T: RecordModel>(&self, loader: &ModelLoader<T>, ident: &str, options: LoadOptions) {
            self.records
                .borrow_mut()
                .push((T::record_path(ident), options));
            self.defer(loader);
        }

        fn load_list<T: ListModel>(&self, loader: &ModelListLoader<T>, options: ListOptions) {
            self.lists.borrow_mut().push(options);
            self.defer(loader);
        }
    }

    fn topic_json(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "source_id": format!("BC{:07}", id),
            "type": "registration",
            "names": [{"id": id * 10, "text": name, "language": null, "credential_id": null}],
            "create_timestamp": "2020-01-01T10:00:00Z",
            "update_timestamp": null
        })
    }

    fn empty_page() -> serde_json::Value {
        json!({
            "total": 0, "page_size": 10, "page": 1, "first_index": 0, "last_index": 0,
            "next": null, "previous": null, "results": []
        })
    }

    fn setup(service: FakeDataService) -> (Rc<FakeDataService>, TopicFormViewModel<FakeDataService>, EventStream<TopicIdent>) {
        let service = Rc::new(service);
        let vm = TopicFormViewModel::new(Rc::clone(&service));
        let routes = EventStream::new();
        vm.init(&routes);
        (service, vm, routes)
    }

    fn route(source_type: Option<&str>, source_id: Option<&str>) -> TopicIdent {
        TopicIdent::new(source_type, source_id)
    }

    fn query(options: &ListOptions, key: &str) -> Option<String> {
        options.query.get(key).cloned()
    }

    #[test]
    fn test_route_triggers_primary_load() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("registration"), Some("BC0000001")));

        let records = service.records.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].0,
            "/api/v2/topic/ident/registration/BC0000001/formatted"
        );
        assert!(records[0].1.primary);
        assert!(vm.is_loading());
        assert_eq!(vm.ident().as_deref(), Some("ident/registration/BC0000001"));
    }

    #[test]
    fn test_direct_id_type_uses_bare_id() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("_"), Some("17")));
        assert_eq!(vm.ident().as_deref(), Some("17"));
        assert_eq!(service.records.borrow()[0].0, "/api/v2/topic/17/formatted");
    }

    #[test]
    fn test_missing_id_makes_no_request() {
        let (service, vm, routes) = setup(FakeDataService::with_default_type("registration"));
        routes.emit(&route(Some("registration"), None));
        assert!(service.records.borrow().is_empty());
        assert_eq!(vm.ident(), None);
        assert_eq!(vm.on_route(route(None, Some(""))), None);
    }

    #[test]
    fn test_default_type_applies_without_route_type() {
        let (service, vm, routes) = setup(FakeDataService::with_default_type("registration"));
        routes.emit(&route(None, Some("BC0000001")));
        assert_eq!(vm.ident().as_deref(), Some("ident/registration/BC0000001"));
        assert_eq!(service.records.borrow().len(), 1);
    }

    #[test]
    fn test_no_type_and_no_default_makes_no_request() {
        let (service, _vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(None, Some("BC0000001")));
        assert!(service.records.borrow().is_empty());
    }

    #[test]
    fn test_ready_fetches_active_credentials() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("_"), Some("5")));
        assert!(service.lists.borrow().is_empty());

        service.respond_first(topic_json(5, "Acme Holdings Ltd."));

        let lists = service.lists.borrow();
        assert_eq!(lists.len(), 1);
        assert_eq!(query(&lists[0], "topic_id").as_deref(), Some("5"));
        assert_eq!(query(&lists[0], "revoked").as_deref(), Some("false"));
        assert_eq!(lists[0].page, None);
        assert!(vm.is_loaded());
    }

    #[test]
    fn test_filter_toggle_fetches_once_with_empty_revoked() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("_"), Some("5")));
        service.respond_first(topic_json(5, "Acme Holdings Ltd."));
        assert_eq!(service.lists.borrow().len(), 1);

        let filter = vm.set_filter_active(false).unwrap();
        assert_eq!(filter.topic_id, "5");
        assert_eq!(filter.revoked, "");

        let lists = service.lists.borrow();
        assert_eq!(lists.len(), 2);
        assert_eq!(query(&lists[1], "revoked").as_deref(), Some(""));
        assert!(!vm.filter_active());
        assert_eq!(vm.filter_active_param(), "false");
    }

    #[test]
    fn test_filter_string_setter() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("_"), Some("5")));
        service.respond_first(topic_json(5, "Acme"));

        assert_eq!(vm.set_filter_active_str("false").unwrap().revoked, "");
        assert_eq!(vm.set_filter_active_str("true").unwrap().revoked, "false");
        assert!(vm.filter_active());
        assert_eq!(vm.set_filter_active_str("yes").unwrap().revoked, "");
        // initial fetch plus one per setter call
        assert_eq!(service.lists.borrow().len(), 4);
    }

    #[test]
    fn test_filter_before_topic_loaded_does_nothing() {
        let (service, vm, routes) = setup(FakeDataService::default());
        assert_eq!(vm.set_filter_active(false), None);
        routes.emit(&route(Some("_"), Some("5")));
        assert_eq!(vm.fetch_creds(), None);
        assert!(service.lists.borrow().is_empty());

        // the preference set earlier applies to the first fetch
        service.respond_first(topic_json(5, "Acme"));
        assert_eq!(query(&service.lists.borrow()[0], "revoked").as_deref(), Some(""));
    }

    #[test]
    fn test_names_gated_on_load() {
        let (service, vm, routes) = setup(FakeDataService::default());
        assert_eq!(vm.names(), None);
        assert_eq!(vm.title(), None);

        routes.emit(&route(Some("_"), Some("5")));
        assert_eq!(vm.names(), None);

        service.respond_first(topic_json(5, "Acme Holdings Ltd."));
        let names = vm.names().unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].text, "Acme Holdings Ltd.");
        assert_eq!(vm.title().as_deref(), Some("Acme Holdings Ltd."));
        assert_eq!(vm.topic().map(|t| t.source_id), Some("BC0000005".to_string()));
    }

    #[test]
    fn test_failed_load_keeps_names_empty_and_skips_creds() {
        let (service, vm, routes) = setup(FakeDataService::default());
        let failures = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&failures);
        let _sub = vm.result_stream().subscribe(move |r| {
            if let Some(e) = &r.error {
                seen.borrow_mut().push(e.clone());
            }
        });

        routes.emit(&route(Some("_"), Some("404")));
        service.respond(0, Err(LoadError::http(404, "Record not found")));

        assert_eq!(vm.names(), None);
        assert!(!vm.is_loaded());
        assert!(service.lists.borrow().is_empty());
        assert!(failures.borrow()[0].is_not_found());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("_"), Some("1")));
        routes.emit(&route(Some("_"), Some("2")));
        assert_eq!(service.pending_count(), 2);

        // the first request completes after the second one started
        service.respond_first(topic_json(1, "Old"));
        assert!(vm.is_loading());
        assert_eq!(vm.title(), None);
        assert!(service.lists.borrow().is_empty());

        service.respond_first(topic_json(2, "New"));
        assert_eq!(vm.title().as_deref(), Some("New"));
        let lists = service.lists.borrow();
        assert_eq!(lists.len(), 1);
        assert_eq!(query(&lists[0], "topic_id").as_deref(), Some("2"));
    }

    #[test]
    fn test_creds_stream_receives_page() {
        let (service, vm, routes) = setup(FakeDataService::default());
        let pages = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&pages);
        let _sub = vm.creds_stream().subscribe(move |r| seen.borrow_mut().push(r.status));

        routes.emit(&route(Some("_"), Some("5")));
        service.respond_first(topic_json(5, "Acme"));
        service.respond_first(empty_page());

        assert_eq!(*pages.borrow(), vec![LoadStatus::Loading, LoadStatus::Ready]);
    }

    #[test]
    fn test_load_creds_page() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("_"), Some("5")));
        service.respond_first(topic_json(5, "Acme"));

        vm.load_creds_page(3);
        vm.load_creds_page(1);
        let lists = service.lists.borrow();
        assert_eq!(lists[1].page, Some(3));
        assert_eq!(lists[2].page, None);
    }

    #[test]
    fn test_destroy_is_idempotent_and_stops_loading() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("_"), Some("5")));

        vm.destroy();
        vm.destroy();
        assert_eq!(routes.listener_count(), 0);

        // late response and later routes are ignored
        service.respond_first(topic_json(5, "Acme"));
        assert_eq!(vm.title(), None);
        assert!(service.lists.borrow().is_empty());

        routes.emit(&route(Some("_"), Some("6")));
        assert_eq!(service.records.borrow().len(), 1);
    }

    #[test]
    fn test_display_toggles() {
        let (_service, vm, _routes) = setup(FakeDataService::default());
        assert!(!vm.show_filters());
        assert!(vm.toggle_filters());
        assert!(!vm.toggle_filters());

        assert_eq!(vm.creds_format(), CredsFormat::Rows);
        vm.set_creds_format(CredsFormat::Cards);
        assert_eq!(vm.creds_format(), CredsFormat::Cards);
    }

    #[test]
    fn test_no_credential_requests_after_destroy() {
        let (service, vm, routes) = setup(FakeDataService::default());
        routes.emit(&route(Some("_"), Some("5")));
        service.respond_first(topic_json(5, "Acme"));
        assert_eq!(service.lists.borrow().len(), 1);

        vm.destroy();
        assert_eq!(vm.fetch_creds(), None);
        assert_eq!(vm.set_filter_active(false), None);
        assert_eq!(vm.load_creds_page(2), None);
        assert_eq!(service.lists.borrow().len(), 1);
    }
}
