//! Credential list of a topic: table rows or cards, with pagination.
//!
//! The list only renders; requests are issued by the owning page through
//! its view model.

mod model;

use contracts::domain::a002_credential::CredentialSearchResult;
use contracts::shared::pagination::Page;
use leptos::prelude::*;
use thaw::*;

use crate::shared::components::card_animated::{stagger_delay, CardAnimated};
use crate::shared::components::formatted_date::FormattedDate;
use crate::shared::components::pagination_controls::{page_count, page_summary, PaginationControls};
use crate::shared::components::ui::CredentialStatusBadge;
use crate::shared::date_format::EFFECTIVE_DATE;
use crate::shared::fetch::LoadResult;

type CredentialPage = Page<CredentialSearchResult>;

fn row_key(item: &CredentialSearchResult) -> i64 {
    item.id.value()
}

fn display_name(item: &CredentialSearchResult) -> String {
    item.display_name().unwrap_or("-").to_string()
}

#[component]
pub fn CredentialList(
    /// Latest state of the credential request
    #[prop(into)]
    result: Signal<LoadResult<CredentialPage>>,
    /// Card layout instead of table rows
    #[prop(into)]
    cards: Signal<bool>,
    on_page_change: Callback<u64>,
) -> impl IntoView {
    let items = Memo::new(move |_| {
        result
            .with(|r| r.data.as_ref().map(|p| p.results.clone()))
            .unwrap_or_default()
    });
    let page = Signal::derive(move || result.with(|r| r.data.as_ref().map_or(1, |p| p.page)));
    let num_pages = Signal::derive(move || {
        result.with(|r| {
            r.data
                .as_ref()
                .map_or(1, |p| page_count(p.total, p.page_size))
        })
    });
    let summary = Signal::derive(move || {
        result.with(|r| {
            r.data
                .as_ref()
                .map(|p| page_summary(p.first_index, p.last_index, p.total))
                .unwrap_or_default()
        })
    });

    view! {
        <div class="credential-list">
            <Show when=move || result.with(|r| r.loading())>
                <div class="credential-list__loading">
                    <Spinner size=SpinnerSize::Small />
                    <span>"Loading credentials..."</span>
                </div>
            </Show>

            {move || result.with(|r| r.error.clone()).map(|e| view! {
                <MessageBar intent=MessageBarIntent::Error>
                    {format!("Credentials could not be loaded: {}", e)}
                </MessageBar>
            })}

            <Show when=move || result.with(|r| r.loaded())>
                <Show
                    when=move || !items.with(|i| i.is_empty())
                    fallback=|| view! {
                        <div class="credential-list__empty">"No credentials found"</div>
                    }
                >
                    <Show
                        when=move || cards.get()
                        fallback=move || view! { <CredentialRows items=items /> }
                    >
                        <CredentialCards items=items />
                    </Show>

                    <PaginationControls
                        page=page
                        num_pages=num_pages
                        summary=summary
                        on_page_change=on_page_change
                    />
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn CredentialRows(items: Memo<Vec<CredentialSearchResult>>) -> impl IntoView {
    view! {
        <Table attr:style="width: 100%;">
            <TableHeader>
                <TableRow>
                    <TableHeaderCell resizable=true min_width=200.0>"Name"</TableHeaderCell>
                    <TableHeaderCell resizable=true min_width=200.0>"Credential type"</TableHeaderCell>
                    <TableHeaderCell resizable=true min_width=160.0>"Issuer"</TableHeaderCell>
                    <TableHeaderCell resizable=true min_width=120.0>"Effective"</TableHeaderCell>
                    <TableHeaderCell resizable=false>"Status"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                <For
                    each=move || items.get()
                    key=row_key
                    children=move |item| {
                        let name = display_name(&item);
                        let description = item.credential_type.description.clone();
                        let issuer_name = item.credential_type.issuer.name.clone();
                        view! {
                            <TableRow>
                                <TableCell>
                                    <TableCellLayout truncate=true>{name}</TableCellLayout>
                                </TableCell>
                                <TableCell>
                                    <TableCellLayout truncate=true>
                                        {description}
                                    </TableCellLayout>
                                </TableCell>
                                <TableCell>
                                    <TableCellLayout truncate=true>
                                        {issuer_name}
                                    </TableCellLayout>
                                </TableCell>
                                <TableCell>
                                    <TableCellLayout>
                                        <FormattedDate value=item.effective_date.clone() format=EFFECTIVE_DATE />
                                    </TableCellLayout>
                                </TableCell>
                                <TableCell>
                                    <TableCellLayout>
                                        <CredentialStatusBadge revoked=item.revoked inactive=item.inactive />
                                    </TableCellLayout>
                                </TableCell>
                            </TableRow>
                        }
                    }
                />
            </TableBody>
        </Table>
    }
}

#[component]
fn CredentialCards(items: Memo<Vec<CredentialSearchResult>>) -> impl IntoView {
    view! {
        <div class="credential-cards">
            {move || {
                items
                    .get()
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let revoked_date = item.revoked_date.clone().filter(|_| item.revoked);
                        view! {
                            <CardAnimated delay_ms=stagger_delay(index) class="credential-card">
                                <div class="credential-card__header">
                                    <span class="credential-card__name">{display_name(&item)}</span>
                                    <CredentialStatusBadge revoked=item.revoked inactive=item.inactive />
                                </div>
                                <div class="credential-card__type">
                                    {item.credential_type.description.clone()}
                                </div>
                                <div class="credential-card__issuer">
                                    {item.credential_type.issuer.name.clone()}
                                </div>
                                <div class="credential-card__dates">
                                    "Effective "
                                    <FormattedDate value=item.effective_date.clone() format=EFFECTIVE_DATE />
                                    {revoked_date.map(|d| view! {
                                        " / revoked "
                                        <FormattedDate value=Some(d) format=EFFECTIVE_DATE />
                                    })}
                                </div>
                            </CardAnimated>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
