use std::rc::Rc;

use contracts::domain::a001_topic::{Topic, TopicIdent};
use contracts::domain::a002_credential::CredentialSearchResult;
use contracts::shared::pagination::Page;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use thaw::*;

use super::view_model::{names_of, title_of, CredsFormat, TopicFormViewModel};
use crate::domain::a002_credential::ui::list::CredentialList;
use crate::shared::components::formatted_date::FormattedDate;
use crate::shared::components::ui::{Badge, Checkbox};
use crate::shared::config::AppConfig;
use crate::shared::data_service::HttpDataService;
use crate::shared::date_format::EFFECTIVE_DATE_TIME;
use crate::shared::fetch::{EventStream, LoadResult};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;

fn error_text(result: &LoadResult<Topic>) -> Option<String> {
    result.error.as_ref().map(|e| {
        if e.is_not_found() {
            "Topic not found".to_string()
        } else {
            format!("Topic could not be loaded: {}", e)
        }
    })
}

/// Topic details page: `/topic/:sourceType/:sourceId` or `/topic/:sourceId`
#[component]
pub fn TopicForm() -> impl IntoView {
    let config = use_context::<AppConfig>().unwrap_or_else(AppConfig::from_location);
    let vm = TopicFormViewModel::new(Rc::new(HttpDataService::new(config)));

    // loader streams -> signals
    let topic_result = RwSignal::new(LoadResult::<Topic>::default());
    let creds_result = RwSignal::new(LoadResult::<Page<CredentialSearchResult>>::default());
    vm.hold(vm.result_stream().subscribe(move |r| topic_result.set(r.clone())));
    vm.hold(vm.creds_stream().subscribe(move |r| creds_result.set(r.clone())));

    let filter_active = RwSignal::new(vm.filter_active());
    let show_filters = RwSignal::new(vm.show_filters());
    let cards = RwSignal::new(vm.creds_format() == CredsFormat::Cards);

    let routes = EventStream::<TopicIdent>::new();
    vm.init(&routes);

    let vm = StoredValue::new_local(vm);
    let routes = StoredValue::new_local(routes);

    let params = use_params_map();
    Effect::new(move |_| {
        let source = params.with(|p| {
            TopicIdent::new(p.get("sourceType").as_deref(), p.get("sourceId").as_deref())
        });
        routes.with_value(|r| r.emit(&source));
    });

    on_cleanup(move || {
        vm.try_with_value(|vm| vm.destroy());
    });

    let on_filter_change = Callback::new(move |active: bool| {
        filter_active.set(active);
        vm.with_value(|vm| {
            vm.set_filter_active(active);
        });
    });

    let set_format = move |format: CredsFormat| {
        cards.set(format == CredsFormat::Cards);
        vm.with_value(|vm| vm.set_creds_format(format));
    };

    let on_page_change = Callback::new(move |page: u64| {
        vm.with_value(|vm| {
            vm.load_creds_page(page);
        });
    });

    let title = move || {
        topic_result
            .with(|r| title_of(r.data.as_ref()))
            .unwrap_or_else(|| "Topic".to_string())
    };

    view! {
        <PageFrame page_id="a001_topic--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("topic")}
                    <h1 class="page__title">{title}</h1>
                    {move || topic_result.with(|r| r.data.clone()).map(|t| view! {
                        <Badge variant="primary".to_string()>{t.topic_type.clone()}</Badge>
                        <span class="page__subtitle">{t.source_id.clone()}</span>
                    })}
                </div>
            </div>

            <div class="page__content">
                <Show when=move || topic_result.with(|r| r.loading())>
                    <div class="topic__loading">
                        <Spinner size=SpinnerSize::Small />
                        <span>"Loading topic..."</span>
                    </div>
                </Show>

                {move || topic_result.with(error_text).map(|text| view! {
                    <MessageBar intent=MessageBarIntent::Error>{text}</MessageBar>
                })}

                {move || topic_result.with(names_of).map(|names| view! {
                    <div class="details-section">
                        <h4 class="details-section__title">"Names"</h4>
                        <ul class="topic__names">
                            {names.into_iter().map(|n| view! {
                                <li>
                                    {n.text}
                                    {n.language.map(|lang| view! { <span class="topic__name-lang">{lang}</span> })}
                                </li>
                            }).collect_view()}
                        </ul>
                        {move || topic_result.with(|r| r.data.as_ref().and_then(|t| t.create_timestamp.clone())).map(|ts| view! {
                            <div class="topic__registered">
                                "Registered "
                                <FormattedDate value=Some(ts) format=EFFECTIVE_DATE_TIME />
                            </div>
                        })}
                    </div>
                })}

                <Show when=move || topic_result.with(|r| r.loaded())>
                    <div class="details-section">
                        <div class="details-section__toolbar">
                            <h4 class="details-section__title">"Credentials"</h4>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                size=ButtonSize::Small
                                on_click=move |_| {
                                    let shown = vm.with_value(|vm| vm.toggle_filters());
                                    show_filters.set(shown);
                                }
                            >
                                {icon("filter")}
                                {move || if show_filters.get() { " Hide filters" } else { " Filters" }}
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Transparent
                                size=ButtonSize::Small
                                on_click=move |_| set_format(CredsFormat::Rows)
                                disabled=Signal::derive(move || !cards.get())
                            >
                                {icon("rows")}
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Transparent
                                size=ButtonSize::Small
                                on_click=move |_| set_format(CredsFormat::Cards)
                                disabled=Signal::derive(move || cards.get())
                            >
                                {icon("cards")}
                            </Button>
                        </div>

                        <Show when=move || show_filters.get()>
                            <div class="filter-panel">
                                <Checkbox
                                    label="Show only active credentials".to_string()
                                    checked=filter_active
                                    on_change=on_filter_change
                                    name="filterActive".to_string()
                                />
                            </div>
                        </Show>

                        <CredentialList
                            result=creds_result
                            cards=cards
                            on_page_change=on_page_change
                        />
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fetch::{LoadError, LoadStatus};

    #[test]
    fn test_error_text() {
        let not_found = LoadResult::<Topic> {
            status: LoadStatus::Failed,
            data: None,
            error: Some(LoadError::http(404, "Record not found")),
        };
        assert_eq!(error_text(&not_found).as_deref(), Some("Topic not found"));

        let failed = LoadResult::<Topic> {
            status: LoadStatus::Failed,
            data: None,
            error: Some(LoadError::other("Failed to fetch: offline")),
        };
        assert_eq!(
            error_text(&failed).as_deref(),
            Some("Topic could not be loaded: Failed to fetch: offline")
        );
        assert_eq!(error_text(&LoadResult::default()), None);
    }
}
