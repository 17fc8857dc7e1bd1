//! `<FormattedDate>`: renders a date value through the app's [`DateFormatter`].

use leptos::prelude::*;

use crate::shared::date_format::DateFormatter;

#[component]
pub fn FormattedDate(
    /// Raw value as returned by the API
    #[prop(into)]
    value: Option<String>,
    /// Named format, alias or pattern; `mediumDate` when omitted
    #[prop(optional, into)]
    format: Option<String>,
) -> impl IntoView {
    let formatter = use_context::<DateFormatter>().unwrap_or_default();
    let text = formatter.display(value.as_deref(), format.as_deref());
    let title = value.unwrap_or_default();

    view! {
        <time class="formatted-date" datetime=title.clone() title=title>
            {text}
        </time>
    }
}
