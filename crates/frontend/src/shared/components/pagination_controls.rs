use crate::shared::icons::icon;
use leptos::prelude::*;

/// Position summary of a page, e.g. `11-20 of 42`
pub fn page_summary(first_index: u64, last_index: u64, total: u64) -> String {
    if total == 0 {
        "0 of 0".to_string()
    } else {
        format!("{}-{} of {}", first_index, last_index, total)
    }
}

/// Number of pages for `total` rows
pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// PaginationControls: first / previous / next / last over 1-based pages
#[component]
pub fn PaginationControls(
    /// Current page (1-based)
    #[prop(into)]
    page: Signal<u64>,

    /// Total number of pages
    #[prop(into)]
    num_pages: Signal<u64>,

    /// Text shown between the buttons
    #[prop(into)]
    summary: Signal<String>,

    /// Callback with the requested page
    on_page_change: Callback<u64>,
) -> impl IntoView {
    let at_first = move || page.get() <= 1;
    let at_last = move || page.get() >= num_pages.get();

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(1)
                disabled=at_first
                title="First page"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let current = page.get();
                    if current > 1 {
                        on_page_change.run(current - 1);
                    }
                }
                disabled=at_first
                title="Previous page"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">{move || summary.get()}</span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let current = page.get();
                    if current < num_pages.get() {
                        on_page_change.run(current + 1);
                    }
                }
                disabled=at_last
                title="Next page"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(num_pages.get().max(1))
                disabled=at_last
                title="Last page"
            >
                {icon("chevrons-right")}
            </button>
        </div>
    }
}
