//! PageFrame: root wrapper for every routed page.
//!
//! Sets two metadata attributes on the root DOM element:
//!   - `id`                  - `"{entity}--{category}"`, e.g. `"a001_topic--detail"`
//!   - `data-page-category`  - one of the PAGE_CAT_* constants

use super::page_standard::*;
use leptos::prelude::*;

/// Root wrapper that sets standard metadata on a page.
///
/// BEM modifier by category:
/// - `detail` → `page page--detail`
/// - `system` → `page page--system`
#[component]
pub fn PageFrame(
    /// HTML id in format `{entity}--{category}`.
    page_id: &'static str,
    /// One of the PAGE_CAT_* constants from `page_standard`.
    category: &'static str,
    /// Additional CSS classes appended after the base class.
    #[prop(optional)]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    debug_assert!(is_valid_page_id(page_id), "bad page id: {page_id}");
    if !is_known_category(category) {
        log::warn!("page {} declares unknown category '{}'", page_id, category);
    }

    let base_class = match category {
        PAGE_CAT_DETAIL => "page page--detail",
        PAGE_CAT_SYSTEM => "page page--system",
        _ => "page",
    };

    let full_class = if class.is_empty() {
        base_class.to_string()
    } else {
        format!("{base_class} {class}")
    };

    view! {
        <div
            id=page_id
            class=full_class
            data-page-category=category
        >
            {children()}
        </div>
    }
}
