use crate::routes::routes::AppRoutes;
use crate::shared::config::AppConfig;
use crate::shared::date_format::DateFormatter;
use leptos::prelude::*;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    // One formatter for the whole app, configured from the backend settings.
    provide_context(DateFormatter::from_config(&config));
    provide_context(config);

    view! {
        <AppRoutes />
    }
}
