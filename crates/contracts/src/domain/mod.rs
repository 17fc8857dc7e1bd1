pub mod a001_topic;
pub mod a002_credential;
pub mod common;
