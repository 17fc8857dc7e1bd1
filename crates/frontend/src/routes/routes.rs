use crate::domain::a001_topic::ui::details::TopicForm;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <PageFrame page_id="system--not-found" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <h1 class="page__title">"Page not found"</h1>
            </div>
        </PageFrame>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <main class="app-main">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/topic/:sourceType/:sourceId") view=TopicForm />
                    <Route path=path!("/topic/:sourceId") view=TopicForm />
                </Routes>
            </main>
        </Router>
    }
}
