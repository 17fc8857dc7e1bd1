//! Fetch primitives: event streams, subscriptions and loaders

pub mod loader;
pub mod subscription;

pub use loader::{
    LoadError, LoadResult, LoadStatus, Loader, ModelListLoader, ModelLoader, RequestTicket,
};
pub use subscription::{EventStream, Subscription};
