pub mod badge;
pub mod checkbox;

pub use badge::{Badge, CredentialStatusBadge};
pub use checkbox::Checkbox;
