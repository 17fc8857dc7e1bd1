//! Topic Details UI Module
//!
//! MVVM layout:
//! - model.rs: how a topic is addressed on the API
//! - view_model.rs: TopicFormViewModel, route handling and the credential fetch chain
//! - view.rs: Leptos component (pure UI)

mod model;
mod view;
mod view_model;

pub use view::TopicForm;
pub use view_model::{CredsFormat, TopicFormViewModel};
